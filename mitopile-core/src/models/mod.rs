pub mod allele;
pub mod counter;
pub mod key;
pub mod pileup;
pub mod sample;
pub mod variant;

// re-export for cleaner imports
pub use self::allele::{Allele, Strand};
pub use self::counter::{PositionCounter, StrandCounts};
pub use self::key::{PositionKey, SampleId};
pub use self::pileup::Pileup;
pub use self::sample::Sample;
pub use self::variant::{Call, Variant, VariantType, Zygosity};
