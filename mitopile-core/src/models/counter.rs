use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use super::allele::{Allele, Strand};

///
/// Allele counts, quality sums and insertion counts observed on one strand.
///
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrandCounts {
    counts: [u64; 6],
    quality_sums: [u64; 6],
    insertions: BTreeMap<String, u64>,
}

impl StrandCounts {
    pub fn count(&self, allele: Allele) -> u64 {
        self.counts[allele.index()]
    }

    pub fn quality_sum(&self, allele: Allele) -> u64 {
        self.quality_sums[allele.index()]
    }

    pub fn insertion_count(&self, sequence: &str) -> u64 {
        self.insertions.get(sequence).copied().unwrap_or(0)
    }

    pub fn insertions(&self) -> &BTreeMap<String, u64> {
        &self.insertions
    }

    /// Sum of all allele counts, deletions included. Insertions add no depth.
    pub fn depth(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn add(&mut self, allele: Allele, quality: u8) {
        let i = allele.index();
        self.counts[i] += 1;
        if allele.tracks_quality() {
            self.quality_sums[i] += u64::from(quality);
        }
    }

    fn add_insertion(&mut self, sequence: &str) {
        match self.insertions.get_mut(sequence) {
            Some(count) => *count += 1,
            None => {
                self.insertions.insert(sequence.to_string(), 1);
            }
        }
    }
}

impl AddAssign<&StrandCounts> for StrandCounts {
    fn add_assign(&mut self, other: &StrandCounts) {
        for i in 0..self.counts.len() {
            self.counts[i] += other.counts[i];
            self.quality_sums[i] += other.quality_sums[i];
        }
        for (sequence, count) in &other.insertions {
            *self.insertions.entry(sequence.clone()).or_insert(0) += count;
        }
    }
}

///
/// Strand-aware pileup counter for one (sample, position).
///
/// Counts are unsigned and only ever grow, so a counter built from any
/// partition of reads and merged back with `+=` equals the counter built
/// from all reads at once.
///
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCounter {
    pub forward: StrandCounts,
    pub reverse: StrandCounts,
}

impl PositionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strand(&self, strand: Strand) -> &StrandCounts {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }

    fn strand_mut(&mut self, strand: Strand) -> &mut StrandCounts {
        match strand {
            Strand::Forward => &mut self.forward,
            Strand::Reverse => &mut self.reverse,
        }
    }

    /// Record one observation of `allele`. The quality is ignored for N.
    pub fn add_base(&mut self, strand: Strand, allele: Allele, quality: u8) {
        self.strand_mut(strand).add(allele, quality);
    }

    pub fn add_deletion(&mut self, strand: Strand, quality: u8) {
        self.add_base(strand, Allele::Deletion, quality);
    }

    /// Record an insertion of `sequence` directly after this position.
    pub fn add_insertion(&mut self, strand: Strand, sequence: &str) {
        self.strand_mut(strand).add_insertion(sequence);
    }

    /// Count of `allele` over both strands.
    pub fn count(&self, allele: Allele) -> u64 {
        self.forward.count(allele) + self.reverse.count(allele)
    }

    pub fn quality_sum(&self, allele: Allele) -> u64 {
        self.forward.quality_sum(allele) + self.reverse.quality_sum(allele)
    }

    /// Mean base quality of `allele`, if it was observed and carries qualities.
    pub fn mean_quality(&self, allele: Allele) -> Option<f64> {
        let count = self.count(allele);
        if count == 0 || !allele.tracks_quality() {
            return None;
        }
        Some(self.quality_sum(allele) as f64 / count as f64)
    }

    /// Total depth: every base and deletion observation on both strands.
    pub fn depth(&self) -> u64 {
        self.forward.depth() + self.reverse.depth()
    }

    pub fn forward_depth(&self) -> u64 {
        self.forward.depth()
    }

    pub fn reverse_depth(&self) -> u64 {
        self.reverse.depth()
    }

    /// Insertion counts summed over both strands, keyed by inserted sequence.
    pub fn insertions(&self) -> BTreeMap<&str, u64> {
        let mut merged: BTreeMap<&str, u64> = BTreeMap::new();
        for (sequence, count) in self
            .forward
            .insertions
            .iter()
            .chain(self.reverse.insertions.iter())
        {
            *merged.entry(sequence.as_str()).or_insert(0) += count;
        }
        merged
    }

    pub fn insertion_count(&self, sequence: &str) -> u64 {
        self.forward.insertion_count(sequence) + self.reverse.insertion_count(sequence)
    }
}

impl AddAssign<&PositionCounter> for PositionCounter {
    fn add_assign(&mut self, other: &PositionCounter) {
        self.forward += &other.forward;
        self.reverse += &other.reverse;
    }
}

impl AddAssign for PositionCounter {
    fn add_assign(&mut self, other: PositionCounter) {
        *self += &other;
    }
}

impl Add for PositionCounter {
    type Output = PositionCounter;

    fn add(mut self, other: PositionCounter) -> PositionCounter {
        self += &other;
        self
    }
}
