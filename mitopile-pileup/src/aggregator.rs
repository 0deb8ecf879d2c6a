use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use mitopile_core::models::{Allele, Pileup, PositionCounter, PositionKey, SampleId};

use crate::errors::Result;
use crate::read::{AlignedRead, AlignmentEvent};

/// Base-level diagnostics of an aggregation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorStats {
    pub reads: u64,
    pub forward_reads: u64,
    pub reverse_reads: u64,
    pub good_quality_bases: u64,
    pub low_quality_bases: u64,
    /// Read bases other than A, C, G, T or N.
    pub unknown_bases: u64,
    pub deleted_positions: u64,
    pub insertions: u64,
}

impl AddAssign<&AggregatorStats> for AggregatorStats {
    fn add_assign(&mut self, other: &AggregatorStats) {
        self.reads += other.reads;
        self.forward_reads += other.forward_reads;
        self.reverse_reads += other.reverse_reads;
        self.good_quality_bases += other.good_quality_bases;
        self.low_quality_bases += other.low_quality_bases;
        self.unknown_bases += other.unknown_bases;
        self.deleted_positions += other.deleted_positions;
        self.insertions += other.insertions;
    }
}

///
/// Turns aligned reads into per-position counters.
///
/// The aggregator owns its [`Pileup`]; call [`PileupAggregator::finish`] to
/// take it and merge it with the output of other workers.
///
#[derive(Debug)]
pub struct PileupAggregator {
    min_base_quality: u8,
    reference_length: Option<usize>,
    pileup: Pileup,
    stats: AggregatorStats,
}

impl PileupAggregator {
    pub fn new(min_base_quality: u8) -> Self {
        PileupAggregator {
            min_base_quality,
            reference_length: None,
            pileup: Pileup::new(),
            stats: AggregatorStats::default(),
        }
    }

    /// Reject reads that align past `length`.
    pub fn with_reference_length(mut self, length: usize) -> Self {
        self.reference_length = Some(length);
        self
    }

    ///
    /// Add one read of `sample` to the pileup.
    ///
    /// The read is validated before any counter changes, so a malformed read
    /// returns an error and leaves the pileup untouched.
    ///
    pub fn observe(&mut self, sample: &SampleId, read: &AlignedRead) -> Result<()> {
        let events = read.events(self.reference_length)?;
        let strand = read.strand();

        self.stats.reads += 1;
        if read.is_reverse {
            self.stats.reverse_reads += 1;
        } else {
            self.stats.forward_reads += 1;
        }

        let mut counted_anchor: Option<usize> = None;
        for event in events {
            match event {
                AlignmentEvent::Base {
                    position,
                    base,
                    quality,
                } => {
                    counted_anchor = None;
                    if quality < self.min_base_quality {
                        self.stats.low_quality_bases += 1;
                        continue;
                    }
                    self.stats.good_quality_bases += 1;
                    match Allele::from_base(base) {
                        Some(allele) => {
                            self.counter(sample, position)
                                .add_base(strand, allele, quality);
                            counted_anchor = Some(position);
                        }
                        None => self.stats.unknown_bases += 1,
                    }
                }
                AlignmentEvent::Deletion {
                    start,
                    len,
                    quality,
                } => {
                    counted_anchor = None;
                    for position in start..start + len {
                        self.counter(sample, position).add_deletion(strand, quality);
                    }
                    self.stats.deleted_positions += len as u64;
                }
                AlignmentEvent::Insertion { anchor, bases, .. } => {
                    // the anchor base must itself have added depth here
                    if counted_anchor != Some(anchor) {
                        continue;
                    }
                    let sequence = String::from_utf8_lossy(bases).to_ascii_uppercase();
                    self.counter(sample, anchor).add_insertion(strand, &sequence);
                    self.stats.insertions += 1;
                }
            }
        }

        Ok(())
    }

    fn counter(&mut self, sample: &SampleId, position: usize) -> &mut PositionCounter {
        // validated reads stay within u32 positions
        self.pileup
            .counter_mut(PositionKey::new(sample.clone(), position as u32))
    }

    pub fn pileup(&self) -> &Pileup {
        &self.pileup
    }

    pub fn stats(&self) -> &AggregatorStats {
        &self.stats
    }

    pub fn finish(self) -> (Pileup, AggregatorStats) {
        (self.pileup, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PileupError;

    use mitopile_core::models::Strand;
    use noodles::sam::alignment::record::cigar::op::{Kind, Op};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn key(sample: &SampleId, position: u32) -> PositionKey {
        PositionKey::new(sample.clone(), position)
    }

    #[rstest]
    fn test_bases_update_strand_counters() {
        let sample = SampleId::from("s1");
        let mut aggregator = PileupAggregator::new(20);

        let forward =
            AlignedRead::new(1, vec![Op::new(Kind::Match, 3)], b"ACG", &[30, 30, 30]);
        let reverse = forward.clone().with_reverse(true);
        aggregator.observe(&sample, &forward).unwrap();
        aggregator.observe(&sample, &reverse).unwrap();

        let (pileup, stats) = aggregator.finish();
        let counter = pileup.get(&key(&sample, 2)).unwrap();
        assert_eq!(counter.strand(Strand::Forward).count(Allele::C), 1);
        assert_eq!(counter.strand(Strand::Reverse).count(Allele::C), 1);
        assert_eq!(counter.quality_sum(Allele::C), 60);
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.reverse_reads, 1);
        assert_eq!(stats.good_quality_bases, 6);
    }

    #[rstest]
    fn test_low_quality_bases_are_dropped() {
        let sample = SampleId::from("s1");
        let mut aggregator = PileupAggregator::new(20);
        let read = AlignedRead::new(1, vec![Op::new(Kind::Match, 3)], b"ACG", &[30, 19, 20]);
        aggregator.observe(&sample, &read).unwrap();

        let (pileup, stats) = aggregator.finish();
        assert!(pileup.get(&key(&sample, 2)).is_none());
        assert_eq!(pileup.get(&key(&sample, 3)).unwrap().count(Allele::G), 1);
        assert_eq!(stats.low_quality_bases, 1);
        assert_eq!(stats.good_quality_bases, 2);
    }

    #[rstest]
    fn test_unknown_bases_are_counted_not_stored() {
        let sample = SampleId::from("s1");
        let mut aggregator = PileupAggregator::new(0);
        let read = AlignedRead::new(1, vec![Op::new(Kind::Match, 3)], b"ARN", &[30, 30, 30]);
        aggregator.observe(&sample, &read).unwrap();

        let (pileup, stats) = aggregator.finish();
        assert_eq!(stats.unknown_bases, 1);
        assert!(pileup.get(&key(&sample, 2)).is_none());
        assert_eq!(pileup.get(&key(&sample, 3)).unwrap().count(Allele::N), 1);
    }

    #[rstest]
    fn test_deletions_cover_their_span() {
        let sample = SampleId::from("s1");
        let mut aggregator = PileupAggregator::new(20);
        let read = AlignedRead::new(
            1,
            vec![
                Op::new(Kind::Match, 2),
                Op::new(Kind::Deletion, 2),
                Op::new(Kind::Match, 1),
            ],
            b"ACT",
            &[30, 25, 30],
        )
        .with_reverse(true);
        aggregator.observe(&sample, &read).unwrap();

        let (pileup, _) = aggregator.finish();
        for position in [3, 4] {
            let counter = pileup.get(&key(&sample, position)).unwrap();
            assert_eq!(counter.reverse.count(Allele::Deletion), 1);
            assert_eq!(counter.quality_sum(Allele::Deletion), 25);
            assert_eq!(counter.depth(), 1);
        }
        assert_eq!(pileup.get(&key(&sample, 5)).unwrap().count(Allele::T), 1);
    }

    #[rstest]
    fn test_insertions_need_a_good_anchor() {
        let sample = SampleId::from("s1");
        let mut aggregator = PileupAggregator::new(20);
        let cigar = vec![
            Op::new(Kind::Match, 2),
            Op::new(Kind::Insertion, 2),
            Op::new(Kind::Match, 1),
        ];
        let good = AlignedRead::new(1, cigar.clone(), b"ACttG", &[30, 30, 30, 30, 30]);
        let weak_anchor = AlignedRead::new(1, cigar, b"ACTTG", &[30, 10, 30, 30, 30]);
        aggregator.observe(&sample, &good).unwrap();
        aggregator.observe(&sample, &weak_anchor).unwrap();

        let (pileup, stats) = aggregator.finish();
        let counter = pileup.get(&key(&sample, 2)).unwrap();
        assert_eq!(counter.insertion_count("TT"), 1);
        assert_eq!(counter.depth(), 1);
        assert_eq!(stats.insertions, 1);
    }

    #[rstest]
    #[case(b"A=TTG")]
    #[case(b"ARTTG")]
    #[case(b"A.TTG")]
    fn test_insertions_after_uncounted_bases_are_dropped(#[case] sequence: &[u8]) {
        let sample = SampleId::from("s1");
        let mut aggregator = PileupAggregator::new(20);
        let cigar = vec![
            Op::new(Kind::Match, 2),
            Op::new(Kind::Insertion, 2),
            Op::new(Kind::Match, 1),
        ];
        let plain = AlignedRead::new(1, vec![Op::new(Kind::Match, 3)], b"ACG", &[30; 3]);
        let odd_anchor = AlignedRead::new(1, cigar, sequence, &[30; 5]);
        aggregator.observe(&sample, &plain).unwrap();
        aggregator.observe(&sample, &odd_anchor).unwrap();
        aggregator.observe(&sample, &odd_anchor).unwrap();

        let (pileup, stats) = aggregator.finish();
        let counter = pileup.get(&key(&sample, 2)).unwrap();
        assert_eq!(counter.depth(), 1);
        assert_eq!(counter.insertion_count("TT"), 0);
        assert_eq!(stats.insertions, 0);
        assert_eq!(stats.unknown_bases, 2);
    }

    #[rstest]
    fn test_insertion_after_deletion_is_dropped() {
        let sample = SampleId::from("s1");
        let mut aggregator = PileupAggregator::new(20);
        let read = AlignedRead::new(
            1,
            vec![
                Op::new(Kind::Match, 2),
                Op::new(Kind::Deletion, 1),
                Op::new(Kind::Insertion, 2),
                Op::new(Kind::Match, 1),
            ],
            b"ACTTG",
            &[30; 5],
        );
        aggregator.observe(&sample, &read).unwrap();

        let (pileup, stats) = aggregator.finish();
        assert_eq!(stats.insertions, 0);
        for (_, counter) in pileup.iter() {
            assert!(counter.insertions().is_empty());
        }
    }

    #[rstest]
    fn test_malformed_read_leaves_pileup_untouched() {
        let sample = SampleId::from("s1");
        let mut aggregator = PileupAggregator::new(20).with_reference_length(4);
        let too_long =
            AlignedRead::new(3, vec![Op::new(Kind::Match, 3)], b"ACG", &[30, 30, 30]);

        let result = aggregator.observe(&sample, &too_long);
        assert!(matches!(result, Err(PileupError::PositionOutOfRange { .. })));
        assert!(aggregator.pileup().is_empty());
        assert_eq!(aggregator.stats().reads, 0);
    }
}
