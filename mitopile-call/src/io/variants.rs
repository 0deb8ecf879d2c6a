use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

use mitopile_core::consts::{DELETION_CHAR, VARIANTS_HEADER};
use mitopile_core::models::{Allele, Call, Sample, SampleId, Variant, VariantType};
use mitopile_core::utils::get_dynamic_reader;

use crate::errors::{Result, VariantFileError};

const COLUMNS: usize = 10;

///
/// Write the variant table of `samples`.
///
/// Rows follow sample order, then position, then call. Levels keep four
/// decimals when that reads back exactly, otherwise the shortest exact form.
///
pub fn write_variants<W: Write>(writer: &mut W, samples: &[Sample]) -> std::io::Result<()> {
    writeln!(writer, "{VARIANTS_HEADER}")?;

    for sample in samples {
        for position in sample.positions() {
            let Some(variants) = sample.variants_at(position) else {
                continue;
            };
            let mut variants: Vec<&Variant> = variants.iter().collect();
            variants.sort_by(|a, b| a.call.cmp(&b.call));

            for variant in variants {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    sample.id,
                    variant.position,
                    variant.reference as char,
                    variant.variant_text(),
                    variant.zygosity(),
                    level_text(variant.level),
                    variant.coverage_forward,
                    variant.coverage_reverse,
                    variant.coverage_total,
                    variant.variant_type.code(),
                )?;
            }
        }
    }

    writer.flush()
}

/// Consensus thresholds compare levels exactly, so written levels must read back unchanged.
fn level_text(level: f64) -> String {
    let rounded = format!("{level:.4}");
    if rounded.parse::<f64>() == Ok(level) {
        rounded
    } else {
        level.to_string()
    }
}

///
/// Parse a variant table back into samples, sorted by id.
///
/// The `Major/Minor` column is derived from the level and is not checked.
///
pub fn read_variants<R: BufRead>(reader: R) -> Result<Vec<Sample>> {
    let mut lines = reader.lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or(VariantFileError::MissingHeader)?;
    if header.trim_end() != VARIANTS_HEADER {
        return Err(VariantFileError::MissingHeader);
    }

    let mut samples: BTreeMap<SampleId, Sample> = BTreeMap::new();
    for (index, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // header is line 1
        let (id, variant) = parse_row(&line, index + 2)?;
        samples
            .entry(id.clone())
            .or_insert_with(|| Sample::new(id))
            .add_variant(variant);
    }

    Ok(samples.into_values().collect())
}

/// Read a variant table from a plain or gzipped file.
pub fn read_variants_file(path: &Path) -> Result<Vec<Sample>> {
    read_variants(get_dynamic_reader(path)?)
}

fn parse_row(line: &str, line_number: usize) -> Result<(SampleId, Variant)> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if fields.len() != COLUMNS {
        return Err(VariantFileError::ColumnCount {
            line: line_number,
            expected: COLUMNS,
            found: fields.len(),
        });
    }

    let invalid = |column: &'static str, value: &str| VariantFileError::InvalidValue {
        line: line_number,
        column,
        value: value.to_string(),
    };

    let position: u32 = fields[1].parse().map_err(|_| invalid("Pos", fields[1]))?;
    let reference = match fields[2].as_bytes() {
        [base] => base.to_ascii_uppercase(),
        _ => return Err(invalid("Ref", fields[2])),
    };
    let level = fields[5]
        .parse::<f64>()
        .ok()
        .filter(|level| (0.0..=1.0).contains(level))
        .ok_or_else(|| invalid("Variant-Level", fields[5]))?;
    let coverage_forward: u64 = fields[6].parse().map_err(|_| invalid("Coverage-FWD", fields[6]))?;
    let coverage_reverse: u64 = fields[7].parse().map_err(|_| invalid("Coverage-Rev", fields[7]))?;
    let coverage_total: u64 = fields[8]
        .parse()
        .map_err(|_| invalid("Coverage-Total", fields[8]))?;

    let variant_type = fields[9]
        .parse::<u8>()
        .ok()
        .and_then(VariantType::from_code)
        .ok_or_else(|| VariantFileError::UnknownType {
            line: line_number,
            code: fields[9].to_string(),
        })?;

    let text = fields[3];
    let call = match variant_type {
        VariantType::Insertion => match text.get(1..) {
            Some(inserted) if !inserted.is_empty() => {
                Call::Insertion(inserted.to_ascii_uppercase())
            }
            _ => return Err(invalid("Variant", text)),
        },
        VariantType::Deletion if text.len() == 1 && text.starts_with(DELETION_CHAR) => {
            Call::Deletion
        }
        _ => match text.as_bytes() {
            [base] => match Allele::from_base(*base) {
                Some(allele) if allele != Allele::Deletion => Call::Substitution(allele),
                _ => return Err(invalid("Variant", text)),
            },
            _ => return Err(invalid("Variant", text)),
        },
    };

    let variant = Variant {
        position,
        reference,
        call,
        variant_type,
        level,
        coverage_forward,
        coverage_reverse,
        coverage_total,
    };
    Ok((SampleId::from(fields[0]), variant))
}
