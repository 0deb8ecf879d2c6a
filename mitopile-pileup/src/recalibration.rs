//! Base quality recalibration seam.
//!
//! BAQ (base alignment quality) lowers the qualities of bases whose
//! alignment is uncertain, typically next to indels. The HMM itself lives
//! outside this crate; anything that can rewrite a read's qualities against
//! the reference plugs in through [`Recalibrator`].
use mitopile_core::Reference;

use crate::errors::Result;
use crate::read::AlignedRead;

pub trait Recalibrator: Send + Sync {
    /// Overwrite `read.qualities` in place.
    fn recalibrate(&self, read: &mut AlignedRead, reference: &Reference) -> Result<()>;

    fn name(&self) -> &str;
}

/// Leaves qualities untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecalibrator;

impl Recalibrator for NoopRecalibrator {
    fn recalibrate(&self, _read: &mut AlignedRead, _reference: &Reference) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}
