//! Core models for mitopile.
//!
//! This crate holds the data types shared by the pileup and calling stages:
//!
//! - [`models::PositionCounter`]: strand-separated allele counts and quality sums for one position
//! - [`models::Pileup`]: an owned map of (sample, position) keys to counters, mergeable across workers
//! - [`models::Variant`] and [`models::Sample`]: typed, leveled variant calls grouped per sample
//! - [`reference::Reference`]: a 1-indexed reference sequence loaded from FASTA
//! - [`config`]: option structs with defaults, loadable from TOML or YAML
//!
//! # Example
//!
//! ```
//! use mitopile_core::models::{Allele, Pileup, PositionKey, SampleId, Strand};
//!
//! let sample = SampleId::from("sample1");
//! let mut pileup = Pileup::new();
//! pileup
//!     .counter_mut(PositionKey::new(sample.clone(), 73))
//!     .add_base(Strand::Forward, Allele::G, 30);
//!
//! assert_eq!(pileup.get(&PositionKey::new(sample, 73)).unwrap().depth(), 1);
//! ```

pub mod config;
pub mod consts;
pub mod errors;
pub mod models;
pub mod reference;
pub mod utils;

// re-exports
pub use config::{CallOptions, ConsensusOptions, MitopileConfig, PileupOptions};
pub use reference::Reference;
