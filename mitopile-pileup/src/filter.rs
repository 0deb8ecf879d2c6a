use std::fmt::{self, Display};
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use mitopile_core::config::PileupOptions;

use crate::read::AlignedRead;

/// Why a read was kept out of the pileup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    MappingQuality,
    Unmapped,
    Duplicate,
    TooShort,
    LowAlignmentScore,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MappingQuality => "BAD-MAPPING",
            Self::Unmapped => "UNMAPPED",
            Self::Duplicate => "DUPLICATE",
            Self::TooShort => "SHORT-READ",
            Self::LowAlignmentScore => "BAD-ALIGNMENT",
        }
    }
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tally of filter decisions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub accepted: u64,
    pub bad_mapping: u64,
    pub unmapped: u64,
    pub duplicate: u64,
    pub short_read: u64,
    pub bad_alignment: u64,
}

impl FilterStats {
    pub fn record(&mut self, reason: RejectionReason) {
        match reason {
            RejectionReason::MappingQuality => self.bad_mapping += 1,
            RejectionReason::Unmapped => self.unmapped += 1,
            RejectionReason::Duplicate => self.duplicate += 1,
            RejectionReason::TooShort => self.short_read += 1,
            RejectionReason::LowAlignmentScore => self.bad_alignment += 1,
        }
    }

    pub fn rejected(&self) -> u64 {
        self.bad_mapping + self.unmapped + self.duplicate + self.short_read + self.bad_alignment
    }

    pub fn count(&self, reason: RejectionReason) -> u64 {
        match reason {
            RejectionReason::MappingQuality => self.bad_mapping,
            RejectionReason::Unmapped => self.unmapped,
            RejectionReason::Duplicate => self.duplicate,
            RejectionReason::TooShort => self.short_read,
            RejectionReason::LowAlignmentScore => self.bad_alignment,
        }
    }
}

impl AddAssign<&FilterStats> for FilterStats {
    fn add_assign(&mut self, other: &FilterStats) {
        self.accepted += other.accepted;
        self.bad_mapping += other.bad_mapping;
        self.unmapped += other.unmapped;
        self.duplicate += other.duplicate;
        self.short_read += other.short_read;
        self.bad_alignment += other.bad_alignment;
    }
}

///
/// Read-level gate applied before recalibration and counting.
///
/// Checks run in a fixed order and the first failing one names the
/// rejection: mapping quality, unmapped flag, duplicate flag, read length,
/// then the `AS` alignment score (a read without `AS` fails that check).
///
#[derive(Debug, Clone)]
pub struct ReadFilter {
    min_mapping_quality: u8,
    min_alignment_score: i64,
    min_read_length: usize,
    stats: FilterStats,
}

impl ReadFilter {
    pub fn new(options: &PileupOptions) -> Self {
        ReadFilter {
            min_mapping_quality: options.min_mapping_quality,
            min_alignment_score: options.min_alignment_score,
            min_read_length: options.min_read_length,
            stats: FilterStats::default(),
        }
    }

    pub fn check(&self, read: &AlignedRead) -> Result<(), RejectionReason> {
        if read.mapping_quality < self.min_mapping_quality {
            return Err(RejectionReason::MappingQuality);
        }
        if read.is_unmapped {
            return Err(RejectionReason::Unmapped);
        }
        if read.is_duplicate {
            return Err(RejectionReason::Duplicate);
        }
        if read.len() <= self.min_read_length {
            return Err(RejectionReason::TooShort);
        }
        match read.alignment_score {
            Some(score) if score >= self.min_alignment_score => Ok(()),
            _ => Err(RejectionReason::LowAlignmentScore),
        }
    }

    /// Check `read` and record the outcome.
    pub fn accept(&mut self, read: &AlignedRead) -> bool {
        match self.check(read) {
            Ok(()) => {
                self.stats.accepted += 1;
                true
            }
            Err(reason) => {
                log::trace!(
                    "Rejected read {} ({})",
                    read.name.as_deref().unwrap_or("*"),
                    reason
                );
                self.stats.record(reason);
                false
            }
        }
    }

    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    pub fn into_stats(self) -> FilterStats {
        self.stats
    }
}
