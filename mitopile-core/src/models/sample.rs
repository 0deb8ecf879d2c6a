use std::collections::BTreeMap;

use super::key::SampleId;
use super::variant::Variant;

///
/// All variant calls of one sample, grouped by position.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub id: SampleId,
    variants: BTreeMap<u32, Vec<Variant>>,
}

impl Sample {
    pub fn new(id: SampleId) -> Self {
        Sample {
            id,
            variants: BTreeMap::new(),
        }
    }

    pub fn add_variant(&mut self, variant: Variant) {
        self.variants
            .entry(variant.position)
            .or_default()
            .push(variant);
    }

    /// Variants at `position`, in insertion order.
    pub fn variants_at(&self, position: u32) -> Option<&[Variant]> {
        self.variants.get(&position).map(|v| v.as_slice())
    }

    /// Every variant, ordered by position.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values().flatten()
    }

    pub fn positions(&self) -> impl Iterator<Item = u32> + '_ {
        self.variants.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.variants.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Extend<Variant> for Sample {
    fn extend<I: IntoIterator<Item = Variant>>(&mut self, iter: I) {
        for variant in iter {
            self.add_variant(variant);
        }
    }
}
