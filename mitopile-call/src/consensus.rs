use rayon::prelude::*;

use mitopile_core::models::{Call, Sample, SampleId, Variant, VariantType};
use mitopile_core::{ConsensusOptions, Reference};

/// Consensus sequence of one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consensus {
    pub sample_id: SampleId,
    pub sequence: String,
    /// Reference positions visited, always the reference length.
    pub positions_walked: usize,
}

///
/// Applies a sample's variant calls to the reference.
///
/// Every reference position produces exactly one emission: the reference
/// base, a replacement base, nothing (deleted), or a base followed by
/// inserted bases. The result does not depend on the order of the variants
/// at a position.
///
#[derive(Debug, Clone, Default)]
pub struct ConsensusBuilder {
    options: ConsensusOptions,
}

impl ConsensusBuilder {
    pub fn new(options: ConsensusOptions) -> Self {
        ConsensusBuilder { options }
    }

    pub fn build(&self, sample: &Sample, reference: &Reference) -> Consensus {
        let mut sequence = String::with_capacity(reference.len() + 16);
        let mut positions_walked = 0;

        for (index, &reference_base) in reference.as_bytes().iter().enumerate() {
            positions_walked += 1;
            let position = (index + 1) as u32;
            match sample.variants_at(position) {
                Some(variants) if !variants.is_empty() => {
                    self.emit(&mut sequence, reference_base, variants)
                }
                _ => sequence.push(reference_base as char),
            }
        }

        Consensus {
            sample_id: sample.id.clone(),
            sequence,
            positions_walked,
        }
    }

    fn emit(&self, sequence: &mut String, reference_base: u8, variants: &[Variant]) {
        let level = self.options.level;
        let substitution_signal = variants
            .iter()
            .filter(|v| v.variant_type.is_substitution_class() && v.level > level)
            .count();
        let mut insertions: Vec<&str> = variants
            .iter()
            .filter_map(|v| v.inserted_sequence())
            .collect();

        // complex: a strong call and an insertion disagree, keep the reference
        if substitution_signal > 0 && !insertions.is_empty() {
            sequence.push(reference_base as char);
            return;
        }

        if insertions.len() > 1 {
            insertions.sort_unstable();
            sequence.push(reference_base as char);
            for inserted in insertions {
                sequence.push_str(inserted);
            }
            return;
        }

        let deleted = variants
            .iter()
            .any(|v| v.is_deletion() && v.level > level);

        if !deleted {
            let base = self
                .replacement(variants)
                .map_or(reference_base as char, |v| match &v.call {
                    Call::Substitution(allele) => allele.to_char(),
                    _ => reference_base as char,
                });
            sequence.push(base);
        }

        if let Some(inserted) = insertions.first() {
            sequence.push_str(inserted);
        }
    }

    /// Highest-level substitution that replaces the reference base.
    fn replacement<'a>(&self, variants: &'a [Variant]) -> Option<&'a Variant> {
        variants
            .iter()
            .filter(|v| match (&v.call, v.variant_type) {
                (Call::Substitution(_), VariantType::Homoplasmy) => true,
                (Call::Substitution(_), VariantType::Heteroplasmy) => v.level >= self.options.level,
                _ => false,
            })
            .max_by(|a, b| {
                a.level
                    .total_cmp(&b.level)
                    .then_with(|| b.call.cmp(&a.call))
            })
    }
}

///
/// Build the consensus of every sample in parallel.
///
/// The output is sorted by sample id.
///
pub fn build_consensus(
    samples: &[Sample],
    reference: &Reference,
    options: &ConsensusOptions,
) -> Vec<Consensus> {
    let builder = ConsensusBuilder::new(options.clone());
    let mut consensus: Vec<Consensus> = samples
        .par_iter()
        .map(|sample| builder.build(sample, reference))
        .collect();
    consensus.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));
    consensus
}

#[cfg(test)]
mod tests {
    use super::*;

    use mitopile_core::models::Allele;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn variant(position: u32, call: Call, variant_type: VariantType, level: f64) -> Variant {
        Variant {
            position,
            reference: b'N',
            call,
            variant_type,
            level,
            coverage_forward: 10,
            coverage_reverse: 0,
            coverage_total: 10,
        }
    }

    fn substitution(
        position: u32,
        allele: Allele,
        variant_type: VariantType,
        level: f64,
    ) -> Variant {
        variant(position, Call::Substitution(allele), variant_type, level)
    }

    fn insertion(position: u32, inserted: &str, level: f64) -> Variant {
        variant(
            position,
            Call::Insertion(inserted.to_string()),
            VariantType::Insertion,
            level,
        )
    }

    fn build(variants: Vec<Variant>) -> Consensus {
        let mut sample = Sample::new(SampleId::from("s1"));
        sample.extend(variants);
        ConsensusBuilder::new(ConsensusOptions::default())
            .build(&sample, &Reference::from_bytes("chrM", b"ACGT"))
    }

    #[rstest]
    fn test_no_variants_is_reference() {
        let consensus = build(vec![]);
        assert_eq!(consensus.sequence, "ACGT");
        assert_eq!(consensus.positions_walked, 4);
        assert_eq!(consensus.sample_id.as_str(), "s1");
    }

    #[rstest]
    #[case(substitution(2, Allele::A, VariantType::Heteroplasmy, 0.2), "ACGT")]
    #[case(substitution(2, Allele::A, VariantType::Heteroplasmy, 0.5), "AAGT")]
    #[case(substitution(2, Allele::A, VariantType::LowLevel, 0.7), "ACGT")]
    #[case(substitution(2, Allele::T, VariantType::Homoplasmy, 0.95), "ATGT")]
    #[case(variant(2, Call::Deletion, VariantType::Deletion, 0.6), "AGT")]
    #[case(variant(2, Call::Deletion, VariantType::Deletion, 0.5), "ACGT")]
    #[case(insertion(3, "TT", 1.0), "ACGTTT")]
    fn test_single_variant(#[case] variant: Variant, #[case] expected: &str) {
        assert_eq!(build(vec![variant]).sequence, expected);
    }

    #[rstest]
    fn test_complex_position_keeps_reference() {
        let consensus = build(vec![
            substitution(3, Allele::T, VariantType::Homoplasmy, 0.95),
            insertion(3, "A", 0.3),
        ]);
        assert_eq!(consensus.sequence, "ACGT");
    }

    #[rstest]
    fn test_multi_insertion_is_lexically_ordered() {
        let forward = build(vec![insertion(1, "TG", 0.4), insertion(1, "C", 0.3)]);
        let reverse = build(vec![insertion(1, "C", 0.3), insertion(1, "TG", 0.4)]);
        assert_eq!(forward.sequence, "ACTGCGT");
        assert_eq!(forward, reverse);
    }

    #[rstest]
    fn test_one_emission_per_position() {
        // two replacing calls only arise under unusual thresholds
        let consensus = build(vec![
            substitution(2, Allele::G, VariantType::Heteroplasmy, 0.6),
            substitution(2, Allele::A, VariantType::Heteroplasmy, 0.6),
            substitution(2, Allele::T, VariantType::LowLevel, 0.3),
        ]);
        assert_eq!(consensus.sequence, "AAGT");
    }

    #[rstest]
    fn test_replacement_then_single_insertion() {
        let consensus = build(vec![
            substitution(4, Allele::C, VariantType::Heteroplasmy, 0.5),
            insertion(4, "GG", 0.5),
        ]);
        assert_eq!(consensus.sequence, "ACGCGG");
    }

    #[rstest]
    fn test_build_consensus_sorts_samples() {
        let reference = Reference::from_bytes("chrM", b"ACGT");
        let samples: Vec<Sample> = ["zeta", "alpha"]
            .into_iter()
            .map(|id| Sample::new(SampleId::from(id)))
            .collect();

        let consensus = build_consensus(&samples, &reference, &ConsensusOptions::default());
        let ids: Vec<&str> = consensus.iter().map(|c| c.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
