//! Variant calling for mitopile.
//!
//! Turns an aggregated [`mitopile_core::models::Pileup`] into typed variant
//! calls per sample, and those calls into one consensus sequence per sample.
//!
//! # Example
//!
//! ```
//! use mitopile_call::{ConsensusBuilder, VariantClassifier};
//! use mitopile_core::models::{Allele, PositionCounter, Sample, SampleId, Strand};
//! use mitopile_core::{CallOptions, ConsensusOptions, Reference};
//!
//! let reference = Reference::from_bytes("chrM", b"ACGT");
//!
//! let mut counter = PositionCounter::new();
//! for _ in 0..10 {
//!     counter.add_base(Strand::Forward, Allele::T, 30);
//! }
//!
//! let classifier = VariantClassifier::new(CallOptions::default());
//! let mut sample = Sample::new(SampleId::from("sample1"));
//! sample.extend(classifier.classify(2, &counter, b'C'));
//!
//! let consensus = ConsensusBuilder::new(ConsensusOptions::default()).build(&sample, &reference);
//! assert_eq!(consensus.sequence, "ATGT");
//! ```

pub mod classifier;
pub mod consensus;
pub mod errors;
pub mod io;

// re-exports
pub use classifier::{VariantClassifier, call_pileup};
pub use consensus::{Consensus, ConsensusBuilder, build_consensus};
pub use errors::VariantFileError;
