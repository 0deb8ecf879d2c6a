use std::collections::{BTreeMap, BTreeSet};

use fxhash::FxHashMap;

use super::counter::PositionCounter;
use super::key::{PositionKey, SampleId};

///
/// Owned map of (sample, position) to counter produced by one aggregation pass.
///
/// Each worker builds its own `Pileup`; the caller merges them. Iteration
/// order is unspecified, so consumers should look entries up by key or use
/// [`Pileup::by_sample`] for a sorted view.
///
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pileup {
    counters: FxHashMap<PositionKey, PositionCounter>,
}

impl Pileup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter for `key`, created empty on first access.
    pub fn counter_mut(&mut self, key: PositionKey) -> &mut PositionCounter {
        self.counters.entry(key).or_default()
    }

    pub fn get(&self, key: &PositionKey) -> Option<&PositionCounter> {
        self.counters.get(key)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &PositionCounter)> {
        self.counters.iter()
    }

    ///
    /// Sum every counter of `other` into this pileup.
    ///
    /// Merging is element-wise addition, so the result does not depend on
    /// the order in which partial pileups are merged.
    ///
    pub fn merge(&mut self, other: Pileup) {
        if self.counters.is_empty() {
            self.counters = other.counters;
            return;
        }
        for (key, counter) in other.counters {
            match self.counters.get_mut(&key) {
                Some(existing) => *existing += &counter,
                None => {
                    self.counters.insert(key, counter);
                }
            }
        }
    }

    /// By-value merge, handy as a reduce operator.
    pub fn merged(mut self, other: Pileup) -> Pileup {
        self.merge(other);
        self
    }

    /// Samples present in the pileup, sorted.
    pub fn samples(&self) -> Vec<SampleId> {
        self.counters
            .keys()
            .map(|key| key.sample.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    ///
    /// Every counter grouped by sample, then by position, in one pass over
    /// the pileup.
    ///
    pub fn by_sample(&self) -> BTreeMap<SampleId, BTreeMap<u32, &PositionCounter>> {
        let mut grouped: BTreeMap<SampleId, BTreeMap<u32, &PositionCounter>> = BTreeMap::new();
        for (key, counter) in &self.counters {
            match grouped.get_mut(&key.sample) {
                Some(positions) => {
                    positions.insert(key.position, counter);
                }
                None => {
                    grouped.insert(
                        key.sample.clone(),
                        BTreeMap::from([(key.position, counter)]),
                    );
                }
            }
        }
        grouped
    }

    /// Counters of one sample keyed by position. Scans the whole pileup, so
    /// use [`Pileup::by_sample`] to visit every sample.
    pub fn sample_positions(&self, sample: &SampleId) -> BTreeMap<u32, &PositionCounter> {
        self.counters
            .iter()
            .filter(|(key, _)| &key.sample == sample)
            .map(|(key, counter)| (key.position, counter))
            .collect()
    }
}

impl FromIterator<(PositionKey, PositionCounter)> for Pileup {
    fn from_iter<I: IntoIterator<Item = (PositionKey, PositionCounter)>>(iter: I) -> Self {
        let mut pileup = Pileup::new();
        for (key, counter) in iter {
            *pileup.counter_mut(key) += &counter;
        }
        pileup
    }
}
