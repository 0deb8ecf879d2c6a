use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};

use mitopile_call::call_pileup;
use mitopile_call::io::{write_raw_counts, write_variants};
use mitopile_core::{MitopileConfig, Reference};
use mitopile_pileup::{NoopRecalibrator, Recalibrator, aggregate_files};

use crate::consts::{PKG_NAME, VERSION};

pub const VARIANTS_FILE: &str = "variants.txt";
pub const RAW_FILE: &str = "raw.txt";
pub const STATS_FILE: &str = "stats.json";

/// Config file values first, then any flag given on the command line.
fn resolve_config(matches: &ArgMatches) -> Result<MitopileConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => MitopileConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => MitopileConfig::default(),
    };

    if let Some(value) = matches.get_one::<u8>("map-qual") {
        config.pileup.min_mapping_quality = *value;
    }
    if let Some(value) = matches.get_one::<i64>("align-qual") {
        config.pileup.min_alignment_score = *value;
    }
    if let Some(value) = matches.get_one::<u8>("base-qual") {
        config.pileup.min_base_quality = *value;
    }
    if matches.get_flag("no-baq") {
        config.pileup.baq = false;
    }
    if matches.get_flag("call-deletions") {
        config.call.call_deletions = true;
    }
    if let Some(value) = matches.get_one::<f64>("min-level") {
        config.call.min_level = *value;
    }
    if let Some(value) = matches.get_one::<f64>("homoplasmic-level") {
        config.call.homoplasmic_level = *value;
    }

    config.validate().context("Invalid options")?;
    Ok(config)
}

pub fn run_pileup(matches: &ArgMatches) -> Result<()> {
    let inputs: Vec<PathBuf> = matches
        .get_many::<String>("inputs")
        .expect("at least one input is required")
        .map(PathBuf::from)
        .collect();
    let reference_path = matches
        .get_one::<String>("reference")
        .expect("--reference is required");
    let output = Path::new(
        matches
            .get_one::<String>("output")
            .expect("--output is required"),
    );

    let config = resolve_config(matches)?;
    log::debug!("{PKG_NAME} {VERSION} with options {:?}", config);

    let reference = Reference::from_fasta(reference_path)
        .with_context(|| format!("Failed to load reference: {}", reference_path))?;
    log::info!("Reference {} ({} bp)", reference.name, reference.len());

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let recalibrator = NoopRecalibrator;
    if config.pileup.baq {
        log::info!(
            "BAQ enabled, recalibrating accepted reads with `{}`",
            recalibrator.name()
        );
    }

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = matches.get_one::<usize>("threads") {
        pool = pool.num_threads(*threads);
    }
    let pool = pool.build().context("Failed to create thread pool")?;

    let bar = ProgressBar::new(inputs.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("#>-"),
    );

    let (pileup, stats) = pool
        .install(|| {
            aggregate_files(
                &inputs,
                &reference,
                &config.pileup,
                &recalibrator,
                Some(&bar),
            )
        })
        .context("Failed to aggregate alignment files")?;
    bar.finish_and_clear();
    stats.log_summary();

    let samples = pool.install(|| call_pileup(&pileup, &reference, &config.call));
    let called: usize = samples.iter().map(|sample| sample.len()).sum();
    log::info!("{} variants called across {} samples", called, samples.len());

    let variants_path = output.join(VARIANTS_FILE);
    let mut writer = BufWriter::new(
        File::create(&variants_path)
            .with_context(|| format!("Failed to create {}", variants_path.display()))?,
    );
    write_variants(&mut writer, &samples)
        .with_context(|| format!("Failed to write {}", variants_path.display()))?;
    log::info!("Variants written to {}", variants_path.display());

    if matches.get_flag("raw") {
        let raw_path = output.join(RAW_FILE);
        let mut writer = BufWriter::new(
            File::create(&raw_path)
                .with_context(|| format!("Failed to create {}", raw_path.display()))?,
        );
        write_raw_counts(&mut writer, &pileup, &reference)
            .with_context(|| format!("Failed to write {}", raw_path.display()))?;
        log::info!("Raw counts written to {}", raw_path.display());
    }

    if matches.get_flag("stats") {
        let stats_path = output.join(STATS_FILE);
        fs::write(&stats_path, stats.to_json()?)
            .with_context(|| format!("Failed to write {}", stats_path.display()))?;
        log::info!("Statistics written to {}", stats_path.display());
    }

    Ok(())
}
