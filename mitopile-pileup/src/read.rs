use noodles::sam::alignment::record::cigar::op::{Kind, Op};
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;

use mitopile_core::models::Strand;

use crate::errors::{PileupError, Result};

///
/// A decoded alignment: everything the filter and the aggregator look at.
///
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRead {
    pub name: Option<String>,
    pub is_reverse: bool,
    pub is_unmapped: bool,
    pub is_duplicate: bool,
    /// 255 when the record carries no mapping quality.
    pub mapping_quality: u8,
    /// Value of the `AS` tag, if present.
    pub alignment_score: Option<i64>,
    /// 1-based position of the first reference-consuming base.
    pub alignment_start: Option<usize>,
    pub cigar: Vec<Op>,
    pub sequence: Vec<u8>,
    pub qualities: Vec<u8>,
}

/// One thing a read says about the reference, in alignment order.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentEvent<'a> {
    Base {
        position: usize,
        base: u8,
        quality: u8,
    },
    /// `len` reference positions starting at `start` are absent from the read.
    Deletion {
        start: usize,
        len: usize,
        quality: u8,
    },
    /// Bases inserted after the aligned base at `anchor`.
    Insertion {
        anchor: usize,
        anchor_quality: u8,
        bases: &'a [u8],
    },
}

impl AlignedRead {
    ///
    /// A forward, mapped, non-duplicate read with MAPQ 60 and `AS:i:60`.
    ///
    pub fn new(alignment_start: usize, cigar: Vec<Op>, sequence: &[u8], qualities: &[u8]) -> Self {
        AlignedRead {
            name: None,
            is_reverse: false,
            is_unmapped: false,
            is_duplicate: false,
            mapping_quality: 60,
            alignment_score: Some(60),
            alignment_start: Some(alignment_start),
            cigar,
            sequence: sequence.to_vec(),
            qualities: qualities.to_vec(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_reverse(mut self, is_reverse: bool) -> Self {
        self.is_reverse = is_reverse;
        self
    }

    pub fn with_mapping_quality(mut self, mapping_quality: u8) -> Self {
        self.mapping_quality = mapping_quality;
        self
    }

    pub fn with_alignment_score(mut self, alignment_score: Option<i64>) -> Self {
        self.alignment_score = alignment_score;
        self
    }

    pub fn with_duplicate(mut self, is_duplicate: bool) -> Self {
        self.is_duplicate = is_duplicate;
        self
    }

    pub fn with_unmapped(mut self, is_unmapped: bool) -> Self {
        self.is_unmapped = is_unmapped;
        self
    }

    pub fn strand(&self) -> Strand {
        Strand::from_reverse_flag(self.is_reverse)
    }

    /// Number of read bases.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Number of reference positions covered by the alignment.
    pub fn reference_span(&self) -> usize {
        self.cigar
            .iter()
            .filter(|op| consumes_reference(op.kind()))
            .map(|op| op.len())
            .sum()
    }

    ///
    /// Check the read is internally consistent and, when `reference_length`
    /// is given, that it stays on the reference. Returns the alignment start.
    ///
    pub fn validate(&self, reference_length: Option<usize>) -> Result<usize> {
        let start = match self.alignment_start {
            Some(start) if start >= 1 => start,
            _ => return Err(PileupError::MissingAlignmentStart),
        };

        let query_len: usize = self
            .cigar
            .iter()
            .filter(|op| consumes_read(op.kind()))
            .map(|op| op.len())
            .sum();
        if query_len != self.sequence.len() {
            return Err(PileupError::CigarLengthMismatch {
                cigar: query_len,
                sequence: self.sequence.len(),
            });
        }
        if self.qualities.len() != self.sequence.len() {
            return Err(PileupError::QualityLengthMismatch {
                qualities: self.qualities.len(),
                sequence: self.sequence.len(),
            });
        }

        if let Some(length) = reference_length {
            let span = self.reference_span();
            let end = start + span.saturating_sub(1);
            if start > length || end > length {
                return Err(PileupError::PositionOutOfRange {
                    position: end.max(start),
                    length,
                });
            }
        }

        Ok(start)
    }

    ///
    /// Walk the CIGAR and list every aligned base, deletion and insertion.
    ///
    /// A deletion takes the quality of the last aligned base before it (0 when
    /// there is none). An insertion is only reported when it directly follows
    /// an aligned base, which becomes its anchor.
    ///
    pub fn events(&self, reference_length: Option<usize>) -> Result<Vec<AlignmentEvent<'_>>> {
        let mut reference_pos = self.validate(reference_length)?;
        let mut read_pos = 0;
        let mut anchor: Option<(usize, u8)> = None;
        let mut events = Vec::with_capacity(self.sequence.len());

        for op in &self.cigar {
            let len = op.len();
            match op.kind() {
                Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                    for i in 0..len {
                        let quality = self.qualities[read_pos + i];
                        events.push(AlignmentEvent::Base {
                            position: reference_pos + i,
                            base: self.sequence[read_pos + i],
                            quality,
                        });
                        anchor = Some((reference_pos + i, quality));
                    }
                    reference_pos += len;
                    read_pos += len;
                }
                Kind::Insertion => {
                    if let Some((position, quality)) = anchor {
                        events.push(AlignmentEvent::Insertion {
                            anchor: position,
                            anchor_quality: quality,
                            bases: &self.sequence[read_pos..read_pos + len],
                        });
                    }
                    read_pos += len;
                }
                Kind::Deletion => {
                    events.push(AlignmentEvent::Deletion {
                        start: reference_pos,
                        len,
                        quality: anchor.map_or(0, |(_, quality)| quality),
                    });
                    reference_pos += len;
                    anchor = None;
                }
                Kind::Skip => {
                    reference_pos += len;
                    anchor = None;
                }
                Kind::SoftClip => read_pos += len,
                Kind::HardClip | Kind::Pad => {}
            }
        }

        Ok(events)
    }
}

impl From<&RecordBuf> for AlignedRead {
    fn from(record: &RecordBuf) -> Self {
        let flags = record.flags();
        AlignedRead {
            name: record.name().map(|name| name.to_string()),
            is_reverse: flags.is_reverse_complemented(),
            is_unmapped: flags.is_unmapped(),
            is_duplicate: flags.is_duplicate(),
            mapping_quality: record.mapping_quality().map_or(255, u8::from),
            alignment_score: record
                .data()
                .get(&Tag::ALIGNMENT_SCORE)
                .and_then(|value| value.as_int()),
            alignment_start: record.alignment_start().map(usize::from),
            cigar: record.cigar().as_ref().to_vec(),
            sequence: record.sequence().as_ref().to_vec(),
            qualities: record.quality_scores().as_ref().to_vec(),
        }
    }
}

fn consumes_reference(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch | Kind::Deletion | Kind::Skip
    )
}

fn consumes_read(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::Match
            | Kind::SequenceMatch
            | Kind::SequenceMismatch
            | Kind::Insertion
            | Kind::SoftClip
    )
}
