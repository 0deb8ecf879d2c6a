use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use mitopile_call::build_consensus;
use mitopile_call::io::variants::read_variants_file;
use mitopile_call::io::write_fasta;
use mitopile_core::{ConsensusOptions, MitopileConfig, Reference};

/// Consensus options from the config file, then `--level` if given.
fn resolve_options(matches: &ArgMatches) -> Result<ConsensusOptions> {
    let mut options = match matches.get_one::<String>("config") {
        Some(path) => {
            MitopileConfig::try_from(Path::new(path))
                .with_context(|| format!("Failed to load config file: {}", path))?
                .consensus
        }
        None => ConsensusOptions::default(),
    };
    if let Some(level) = matches.get_one::<f64>("level") {
        options.level = *level;
    }
    options.validate().context("Invalid consensus level")?;
    Ok(options)
}

pub fn run_consensus(matches: &ArgMatches) -> Result<()> {
    let variants_path = matches
        .get_one::<String>("variants")
        .expect("--variants is required");
    let reference_path = matches
        .get_one::<String>("reference")
        .expect("--reference is required");

    let options = resolve_options(matches)?;

    let reference = Reference::from_fasta(reference_path)
        .with_context(|| format!("Failed to load reference: {}", reference_path))?;
    let samples = read_variants_file(Path::new(variants_path))
        .with_context(|| format!("Failed to read variants file: {}", variants_path))?;

    log::info!(
        "Building consensus for {} samples against {} ({} bp)",
        samples.len(),
        reference.name,
        reference.len()
    );
    let consensus = build_consensus(&samples, &reference, &options);

    match matches.get_one::<String>("output") {
        Some(p) => {
            let mut writer = BufWriter::new(
                File::create(Path::new(p))
                    .with_context(|| format!("Failed to create output file: {}", p))?,
            );
            write_fasta(&mut writer, &consensus)?;
            log::info!("Consensus written to {}", p);
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_fasta(&mut out, &consensus)?;
        }
    }

    Ok(())
}
