use std::io::Write;

use mitopile_core::Reference;
use mitopile_core::consts::RAW_HEADER;
use mitopile_core::models::{Allele, Pileup, PositionCounter, Strand};

/// Write per-position strand counts of every sample, by sample then position.
pub fn write_raw_counts<W: Write>(
    writer: &mut W,
    pileup: &Pileup,
    reference: &Reference,
) -> std::io::Result<()> {
    writeln!(writer, "{RAW_HEADER}")?;

    for (sample, positions) in pileup.by_sample() {
        for (position, counter) in positions {
            let reference_base = reference.base(position as usize).unwrap_or(b'N');
            write!(writer, "{sample}\t{position}\t{}", reference_base as char)?;
            for strand in [Strand::Forward, Strand::Reverse] {
                for allele in Allele::ALL {
                    write!(writer, "\t{}", counter.strand(strand).count(allele))?;
                }
            }
            writeln!(
                writer,
                "\t{}\t{}\t{}\t{}",
                insertion_column(counter),
                counter.forward_depth(),
                counter.reverse_depth(),
                counter.depth()
            )?;
        }
    }

    writer.flush()
}

/// `SEQ:count` pairs joined by commas, `-` when there are none.
fn insertion_column(counter: &PositionCounter) -> String {
    let insertions = counter.insertions();
    if insertions.is_empty() {
        return "-".to_string();
    }
    insertions
        .iter()
        .map(|(sequence, count)| format!("{sequence}:{count}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    use mitopile_core::models::{PositionKey, SampleId};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_write_raw_counts() {
        let reference = Reference::from_bytes("chrM", b"ACGT");
        let mut pileup = Pileup::new();
        let sample = SampleId::from("s1");

        let counter = pileup.counter_mut(PositionKey::new(sample.clone(), 3));
        counter.add_base(Strand::Forward, Allele::G, 30);
        counter.add_base(Strand::Reverse, Allele::A, 30);
        counter.add_deletion(Strand::Reverse, 20);
        counter.add_insertion(Strand::Forward, "TT");
        counter.add_insertion(Strand::Reverse, "C");
        pileup
            .counter_mut(PositionKey::new(sample, 1))
            .add_base(Strand::Forward, Allele::A, 30);

        let mut out = Vec::new();
        write_raw_counts(&mut out, &pileup, &reference).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], RAW_HEADER);
        assert_eq!(lines[1], "s1\t1\tA\t1\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t-\t1\t0\t1");
        assert_eq!(lines[2], "s1\t3\tG\t0\t0\t1\t0\t0\t0\t1\t0\t0\t0\t0\t1\tC:1,TT:1\t1\t2\t3");
    }
}
