use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use super::allele::Allele;
use crate::consts::{DELETION_CHAR, MAJOR_LEVEL};

///
/// What a variant calls at its position.
///
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Call {
    /// A single substituted nucleotide.
    Substitution(Allele),
    Deletion,
    /// Bases inserted directly after the reference base.
    Insertion(String),
}

///
/// Call class, written to output as its numeric code.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VariantType {
    /// Substitution at or above the homoplasmic level.
    Homoplasmy,
    /// Strand-balanced substitution between the minimum and homoplasmic levels.
    Heteroplasmy,
    /// Heteroplasmic-range substitution seen on one strand only.
    LowLevel,
    Deletion,
    Insertion,
}

impl VariantType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Homoplasmy => 1,
            Self::Heteroplasmy => 2,
            Self::LowLevel => 3,
            Self::Deletion => 4,
            Self::Insertion => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Homoplasmy),
            2 => Some(Self::Heteroplasmy),
            3 => Some(Self::LowLevel),
            4 => Some(Self::Deletion),
            5 => Some(Self::Insertion),
            _ => None,
        }
    }

    /// Types 1-4, the ones that compete with insertions during consensus building.
    pub fn is_substitution_class(&self) -> bool {
        !matches!(self, Self::Insertion)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zygosity {
    Major,
    Minor,
}

impl Zygosity {
    pub fn from_level(level: f64) -> Self {
        if level > MAJOR_LEVEL {
            Self::Major
        } else {
            Self::Minor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }
}

impl Display for Zygosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// One variant call at one position of one sample.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// 1-based reference position.
    pub position: u32,
    pub reference: u8,
    pub call: Call,
    pub variant_type: VariantType,
    /// Supporting count over total depth at the position.
    pub level: f64,
    pub coverage_forward: u64,
    pub coverage_reverse: u64,
    pub coverage_total: u64,
}

impl Variant {
    pub fn zygosity(&self) -> Zygosity {
        Zygosity::from_level(self.level)
    }

    pub fn is_insertion(&self) -> bool {
        matches!(self.call, Call::Insertion(_))
    }

    pub fn is_deletion(&self) -> bool {
        matches!(self.call, Call::Deletion)
    }

    pub fn inserted_sequence(&self) -> Option<&str> {
        match &self.call {
            Call::Insertion(sequence) => Some(sequence),
            _ => None,
        }
    }

    ///
    /// Text of the `Variant` column: the substituted base, `D` for a
    /// deletion, or the reference base followed by the inserted bases.
    ///
    pub fn variant_text(&self) -> String {
        match &self.call {
            Call::Substitution(allele) => allele.to_char().to_string(),
            Call::Deletion => DELETION_CHAR.to_string(),
            Call::Insertion(sequence) => format!("{}{}", self.reference as char, sequence),
        }
    }
}
