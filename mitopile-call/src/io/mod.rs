//! Text formats written and read by mitopile.
//!
//! - [`variants`]: the tab-separated variant table, readable back into samples
//! - [`raw`]: per-position strand counts of a pileup
//! - [`fasta`]: consensus sequences
pub mod fasta;
pub mod raw;
pub mod variants;

pub use fasta::write_fasta;
pub use raw::write_raw_counts;
pub use variants::{read_variants, write_variants};
