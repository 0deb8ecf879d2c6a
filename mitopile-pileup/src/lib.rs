//! Pileup aggregation for mitopile.
//!
//! Reads flow through three stages before they reach a counter:
//!
//! 1. [`filter::ReadFilter`] drops reads by mapping quality, flags, length and alignment score
//! 2. a [`recalibration::Recalibrator`] may rewrite base qualities (BAQ)
//! 3. [`aggregator::PileupAggregator`] walks the alignment and updates per-position counters
//!
//! [`pipeline`] wires the stages together for one read stream or many files,
//! and [`bam`] turns BAM/SAM records into [`read::AlignedRead`]s.

pub mod aggregator;
pub mod bam;
pub mod errors;
pub mod filter;
pub mod pipeline;
pub mod read;
pub mod recalibration;

// re-exports
pub use aggregator::{AggregatorStats, PileupAggregator};
pub use errors::PileupError;
pub use filter::{FilterStats, ReadFilter, RejectionReason};
pub use pipeline::{PileupStats, aggregate_files, pileup_reads};
pub use read::AlignedRead;
pub use recalibration::{NoopRecalibrator, Recalibrator};
