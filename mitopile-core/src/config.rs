//! Run options and their file-based configuration.
//!
//! Every option has a default, so a config file only needs the keys it
//! overrides:
//!
//! ```toml
//! [pileup]
//! min_base_quality = 25
//! baq = false
//!
//! [call]
//! call_deletions = true
//! ```
use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::errors::{ConfigError, ConfigResult};

/// Read gates and base-level settings of the pileup stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PileupOptions {
    pub min_mapping_quality: u8,
    pub min_alignment_score: i64,
    pub min_base_quality: u8,
    /// Reads must be strictly longer than this many bases.
    pub min_read_length: usize,
    /// Recalibrate base qualities (BAQ) before counting.
    pub baq: bool,
}

impl Default for PileupOptions {
    fn default() -> Self {
        Self {
            min_mapping_quality: DEFAULT_MIN_MAPPING_QUALITY,
            min_alignment_score: DEFAULT_MIN_ALIGNMENT_SCORE,
            min_base_quality: DEFAULT_MIN_BASE_QUALITY,
            min_read_length: DEFAULT_MIN_READ_LENGTH,
            baq: true,
        }
    }
}

/// Thresholds of the variant classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallOptions {
    /// Alleles must exceed this level to be reported.
    pub min_level: f64,
    /// Substitutions at or above this level are homoplasmic.
    pub homoplasmic_level: f64,
    pub call_deletions: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            min_level: DEFAULT_MIN_LEVEL,
            homoplasmic_level: DEFAULT_HOMOPLASMIC_LEVEL,
            call_deletions: false,
        }
    }
}

impl CallOptions {
    pub fn validate(&self) -> ConfigResult<()> {
        check_level("min_level", self.min_level)?;
        check_level("homoplasmic_level", self.homoplasmic_level)?;
        if self.min_level >= self.homoplasmic_level {
            return Err(ConfigError::InconsistentLevels {
                min_level: self.min_level,
                homoplasmic_level: self.homoplasmic_level,
            });
        }
        Ok(())
    }
}

/// Settings of consensus sequence assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusOptions {
    /// Heteroplasmies at or above this level enter the consensus; it is also
    /// the level substitution-class calls must exceed to conflict with insertions.
    pub level: f64,
}

impl Default for ConsensusOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_CONSENSUS_LEVEL,
        }
    }
}

impl ConsensusOptions {
    pub fn validate(&self) -> ConfigResult<()> {
        check_level("consensus.level", self.level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MitopileConfig {
    pub pileup: PileupOptions,
    pub call: CallOptions,
    pub consensus: ConsensusOptions,
}

impl MitopileConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.call.validate()?;
        self.consensus.validate()
    }

    pub fn to_toml(&self) -> String {
        // plain structs of numbers and bools always serialize
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

impl TryFrom<&Path> for MitopileConfig {
    type Error = ConfigError;

    /// Load a TOML or YAML config, picked by file extension.
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let config: MitopileConfig = match path.extension().and_then(OsStr::to_str) {
            Some("toml") => toml::from_str(&read_to_string(path)?)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&read_to_string(path)?)?,
            _ => return Err(ConfigError::InvalidFileType(path.to_path_buf())),
        };
        config.validate()?;
        Ok(config)
    }
}

fn check_level(name: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::LevelOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::Builder;

    #[rstest]
    fn test_defaults() {
        let config = MitopileConfig::default();
        assert_eq!(config.pileup.min_mapping_quality, 20);
        assert_eq!(config.pileup.min_alignment_score, 30);
        assert_eq!(config.pileup.min_base_quality, 20);
        assert_eq!(config.pileup.baq, true);
        assert_eq!(config.call.call_deletions, false);
        assert_eq!(config.consensus.level, 0.5);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_partial_toml_keeps_defaults() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pileup]\nbaq = false\n\n[call]\ncall_deletions = true").unwrap();

        let config = MitopileConfig::try_from(file.path()).unwrap();
        assert_eq!(config.pileup.baq, false);
        assert_eq!(config.pileup.min_base_quality, 20);
        assert_eq!(config.call.call_deletions, true);
        assert_eq!(config.call.min_level, 0.01);
    }

    #[rstest]
    fn test_yaml_config() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "call:\n  min_level: 0.05\nconsensus:\n  level: 0.7").unwrap();

        let config = MitopileConfig::try_from(file.path()).unwrap();
        assert_eq!(config.call.min_level, 0.05);
        assert_eq!(config.consensus.level, 0.7);
    }

    #[rstest]
    fn test_invalid_extension() {
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        let result = MitopileConfig::try_from(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidFileType(_))));
    }

    #[rstest]
    #[case(1.5, 0.9)]
    #[case(0.95, 0.9)]
    #[case(-0.1, 0.9)]
    fn test_invalid_levels(#[case] min_level: f64, #[case] homoplasmic_level: f64) {
        let options = CallOptions {
            min_level,
            homoplasmic_level,
            call_deletions: false,
        };
        assert!(options.validate().is_err());
    }

    #[rstest]
    fn test_toml_round_trip() {
        let mut config = MitopileConfig::default();
        config.pileup.min_mapping_quality = 30;
        let parsed: MitopileConfig = toml::from_str(&config.to_toml()).unwrap();
        assert_eq!(parsed, config);
    }
}
