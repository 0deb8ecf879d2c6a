use rayon::prelude::*;

use mitopile_core::models::{
    Allele, Call, Pileup, PositionCounter, Sample, Strand, Variant, VariantType,
};
use mitopile_core::{CallOptions, Reference};

///
/// Classifies the alleles observed at one position into typed variant calls.
///
#[derive(Debug, Clone, Default)]
pub struct VariantClassifier {
    options: CallOptions,
}

impl VariantClassifier {
    pub fn new(options: CallOptions) -> Self {
        VariantClassifier { options }
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    ///
    /// Call every reportable non-reference allele of `counter`.
    ///
    /// Levels are taken over the full depth of the position (bases, `N` and
    /// deletions on both strands). `N` is never reported; deletions only when
    /// `call_deletions` is set.
    ///
    /// # Arguments
    /// - position: 1-based position the counter belongs to
    /// - counter: the aggregated counts at that position
    /// - reference_base: reference base at that position, any case
    ///
    /// # Panics
    /// If a computed level falls outside `[0, 1]`, which means the counter
    /// holds more of one allele than its total depth.
    ///
    pub fn classify(
        &self,
        position: u32,
        counter: &PositionCounter,
        reference_base: u8,
    ) -> Vec<Variant> {
        let depth = counter.depth();
        if depth == 0 {
            return Vec::new();
        }

        let reference_base = reference_base.to_ascii_uppercase();
        let forward_depth = counter.forward_depth();
        let reverse_depth = counter.reverse_depth();
        let make_variant = |call: Call, variant_type: VariantType, level: f64| Variant {
            position,
            reference: reference_base,
            call,
            variant_type,
            level,
            coverage_forward: forward_depth,
            coverage_reverse: reverse_depth,
            coverage_total: depth,
        };

        let mut variants = Vec::new();

        for allele in Allele::NUCLEOTIDES {
            if allele.to_char() as u8 == reference_base {
                continue;
            }
            let count = counter.count(allele);
            if count == 0 {
                continue;
            }
            let level = self.level(count, depth);
            if level <= self.options.min_level {
                continue;
            }
            let variant_type = self.substitution_type(counter, allele, level);
            variants.push(make_variant(Call::Substitution(allele), variant_type, level));
        }

        if self.options.call_deletions {
            let count = counter.count(Allele::Deletion);
            if count > 0 {
                let level = self.level(count, depth);
                if level > self.options.min_level {
                    variants.push(make_variant(Call::Deletion, VariantType::Deletion, level));
                }
            }
        }

        for (sequence, count) in counter.insertions() {
            let level = self.level(count, depth);
            if level > self.options.min_level {
                variants.push(make_variant(
                    Call::Insertion(sequence.to_string()),
                    VariantType::Insertion,
                    level,
                ));
            }
        }

        variants
    }

    fn level(&self, count: u64, depth: u64) -> f64 {
        let level = count as f64 / depth as f64;
        assert!(
            (0.0..=1.0).contains(&level),
            "allele count {count} exceeds depth {depth}"
        );
        level
    }

    fn substitution_type(
        &self,
        counter: &PositionCounter,
        allele: Allele,
        level: f64,
    ) -> VariantType {
        if level >= self.options.homoplasmic_level {
            return VariantType::Homoplasmy;
        }

        let both_strands_covered = counter.forward_depth() > 0 && counter.reverse_depth() > 0;
        let forward = counter.strand(Strand::Forward).count(allele);
        let reverse = counter.strand(Strand::Reverse).count(allele);
        if both_strands_covered && (forward == 0 || reverse == 0) {
            VariantType::LowLevel
        } else {
            VariantType::Heteroplasmy
        }
    }
}

///
/// Classify every position of every sample in a pileup.
///
/// Samples are processed in parallel and returned sorted by id. Positions
/// outside the reference are skipped with a warning.
///
pub fn call_pileup(pileup: &Pileup, reference: &Reference, options: &CallOptions) -> Vec<Sample> {
    let classifier = VariantClassifier::new(options.clone());

    pileup
        .by_sample()
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(id, positions)| {
            let mut sample = Sample::new(id.clone());
            for (position, counter) in positions {
                let Some(reference_base) = reference.base(position as usize) else {
                    log::warn!(
                        "{id}: position {position} lies outside {} (length {}), skipping",
                        reference.name,
                        reference.len()
                    );
                    continue;
                };
                sample.extend(classifier.classify(position, counter, reference_base));
            }
            log::debug!("{id}: {} variants called", sample.len());
            sample
        })
        .collect()
}
