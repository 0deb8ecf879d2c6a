use std::io::Write;

use crate::consensus::Consensus;

/// Write one FASTA record per consensus, in sample id order.
pub fn write_fasta<W: Write>(writer: &mut W, consensus: &[Consensus]) -> std::io::Result<()> {
    let mut records: Vec<&Consensus> = consensus.iter().collect();
    records.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));

    for record in records {
        writeln!(writer, ">{}", record.sample_id)?;
        writeln!(writer, "{}", record.sequence)?;
    }
    writer.flush()
}
