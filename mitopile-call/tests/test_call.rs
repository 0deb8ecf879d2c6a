use std::fs::File;
use std::io::BufWriter;

use mitopile_call::io::variants::read_variants_file;
use mitopile_call::io::{write_fasta, write_variants};
use mitopile_call::{ConsensusBuilder, VariantClassifier, build_consensus, call_pileup};
use mitopile_core::models::{
    Allele, Call, Pileup, PositionCounter, PositionKey, Sample, SampleId, Strand, Variant,
    VariantType,
};
use mitopile_core::{CallOptions, ConsensusOptions, Reference};
use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::tempdir;

#[fixture]
fn reference() -> Reference {
    Reference::from_bytes("chrM", b"ACGT")
}

fn add(counter: &mut PositionCounter, strand: Strand, allele: Allele, times: usize) {
    for _ in 0..times {
        counter.add_base(strand, allele, 30);
    }
}

#[rstest]
fn test_minor_heteroplasmy_leaves_reference(reference: Reference) {
    let sample_id = SampleId::from("s1");
    let mut pileup = Pileup::new();
    let counter = pileup.counter_mut(PositionKey::new(sample_id.clone(), 2));
    add(counter, Strand::Forward, Allele::C, 8);
    add(counter, Strand::Forward, Allele::A, 2);

    let samples = call_pileup(&pileup, &reference, &CallOptions::default());
    let variant = &samples[0].variants_at(2).unwrap()[0];
    assert_eq!(variant.call, Call::Substitution(Allele::A));
    assert_eq!(variant.level, 0.2);
    assert_eq!(variant.variant_type, VariantType::Heteroplasmy);

    let consensus =
        ConsensusBuilder::new(ConsensusOptions::default()).build(&samples[0], &reference);
    assert_eq!(consensus.sequence, "ACGT");
    assert_eq!(consensus.positions_walked, reference.len());
}

#[rstest]
fn test_fixed_insertion_is_appended(reference: Reference) {
    let mut counter = PositionCounter::new();
    add(&mut counter, Strand::Forward, Allele::G, 9);
    for _ in 0..9 {
        counter.add_insertion(Strand::Forward, "TT");
    }

    let classifier = VariantClassifier::new(CallOptions::default());
    let mut sample = Sample::new(SampleId::from("s1"));
    sample.extend(classifier.classify(3, &counter, b'G'));

    let variant = &sample.variants_at(3).unwrap()[0];
    assert_eq!(variant.level, 1.0);
    assert_eq!(variant.variant_type, VariantType::Insertion);

    let consensus = ConsensusBuilder::new(ConsensusOptions::default()).build(&sample, &reference);
    assert_eq!(consensus.sequence, "ACGTTT");
}

#[rstest]
fn test_homoplasmy_with_insertion_is_complex(reference: Reference) {
    let variant = |call, variant_type, level| Variant {
        position: 3,
        reference: b'G',
        call,
        variant_type,
        level,
        coverage_forward: 20,
        coverage_reverse: 0,
        coverage_total: 20,
    };
    let mut sample = Sample::new(SampleId::from("s1"));
    sample.add_variant(variant(
        Call::Substitution(Allele::T),
        VariantType::Homoplasmy,
        0.95,
    ));
    sample.add_variant(variant(
        Call::Insertion("A".to_string()),
        VariantType::Insertion,
        0.3,
    ));

    let consensus = ConsensusBuilder::new(ConsensusOptions::default()).build(&sample, &reference);
    assert_eq!(consensus.sequence, "ACGT");
}

#[rstest]
fn test_variant_file_drives_consensus(reference: Reference) {
    let mut pileup = Pileup::new();
    for (sample, position, allele) in [("b", 1, Allele::T), ("a", 4, Allele::C)] {
        let counter = pileup.counter_mut(PositionKey::new(SampleId::from(sample), position));
        add(counter, Strand::Forward, allele, 10);
        add(counter, Strand::Reverse, allele, 10);
    }
    let samples = call_pileup(&pileup, &reference, &CallOptions::default());

    let dir = tempdir().unwrap();
    let path = dir.path().join("variants.txt");
    {
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        write_variants(&mut writer, &samples).unwrap();
    }

    let read_back = read_variants_file(&path).unwrap();
    assert_eq!(read_back, samples);

    let consensus = build_consensus(&read_back, &reference, &ConsensusOptions::default());
    let mut fasta = Vec::new();
    write_fasta(&mut fasta, &consensus).unwrap();
    assert_eq!(String::from_utf8(fasta).unwrap(), ">a\nACGC\n>b\nTCGT\n");
}

#[rstest]
#[case(0.49998, "ACGT")]
#[case(0.5, "AAGT")]
fn test_level_near_consensus_threshold_survives_file(
    reference: Reference,
    #[case] level: f64,
    #[case] expected: &str,
) {
    let mut sample = Sample::new(SampleId::from("s1"));
    sample.add_variant(Variant {
        position: 2,
        reference: b'C',
        call: Call::Substitution(Allele::A),
        variant_type: VariantType::Heteroplasmy,
        level,
        coverage_forward: 25000,
        coverage_reverse: 25000,
        coverage_total: 50000,
    });
    let samples = vec![sample];

    let dir = tempdir().unwrap();
    let path = dir.path().join("variants.txt");
    {
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        write_variants(&mut writer, &samples).unwrap();
    }
    let read_back = read_variants_file(&path).unwrap();
    assert_eq!(read_back, samples);

    let options = ConsensusOptions::default();
    let before = build_consensus(&samples, &reference, &options);
    let after = build_consensus(&read_back, &reference, &options);
    assert_eq!(after[0].sequence, expected);
    assert_eq!(after, before);
}
