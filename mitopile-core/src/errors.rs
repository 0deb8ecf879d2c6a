use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Reference file not found: {0}")]
    NotFound(PathBuf),

    #[error("No FASTA record found in reference: {0}")]
    EmptyReference(String),

    #[error("Malformed FASTA, sequence data before the first header in: {0}")]
    MissingHeader(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file must end in `toml`, `yaml` or `yml`: {0}")]
    InvalidFileType(PathBuf),

    #[error("Option `{name}` must lie in [0, 1], got {value}")]
    LevelOutOfRange { name: &'static str, value: f64 },

    #[error("Minimum level ({min_level}) must be below the homoplasmic level ({homoplasmic_level})")]
    InconsistentLevels {
        min_level: f64,
        homoplasmic_level: f64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type ReferenceResult<T> = std::result::Result<T, ReferenceError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
