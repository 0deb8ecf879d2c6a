use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PileupError {
    #[error("Read has no alignment start")]
    MissingAlignmentStart,

    #[error("CIGAR consumes {cigar} read bases but the read has {sequence}")]
    CigarLengthMismatch { cigar: usize, sequence: usize },

    #[error("Read has {qualities} quality scores for {sequence} bases")]
    QualityLengthMismatch { qualities: usize, sequence: usize },

    #[error("Alignment reaches position {position}, beyond the reference length {length}")]
    PositionOutOfRange { position: usize, length: usize },

    #[error("Base quality recalibration failed: {0}")]
    Recalibration(String),

    #[error("Unsupported alignment file (expected .bam or .sam): {0}")]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PileupError>;
