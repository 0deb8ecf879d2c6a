use std::ops::AddAssign;
use std::path::PathBuf;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use mitopile_core::models::{Pileup, SampleId};
use mitopile_core::utils::sample_id_from_path;
use mitopile_core::{PileupOptions, Reference};

use crate::aggregator::{AggregatorStats, PileupAggregator};
use crate::bam::AlignmentReader;
use crate::errors::{PileupError, Result};
use crate::filter::{FilterStats, ReadFilter};
use crate::read::AlignedRead;
use crate::recalibration::Recalibrator;

/// Everything counted while turning reads into a pileup.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileupStats {
    /// Records pulled from the input, decodable or not.
    pub records: u64,
    /// Records that failed to decode or described an impossible alignment.
    pub invalid_reads: u64,
    pub recalibration_failures: u64,
    pub filter: FilterStats,
    pub bases: AggregatorStats,
}

impl PileupStats {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn log_summary(&self) {
        log::info!(
            "{} records, {} accepted, {} filtered, {} invalid",
            self.records,
            self.filter.accepted,
            self.filter.rejected(),
            self.invalid_reads
        );
        log::info!(
            "{} bases counted, {} below base quality, {} unknown",
            self.bases.good_quality_bases,
            self.bases.low_quality_bases,
            self.bases.unknown_bases
        );
        if self.recalibration_failures > 0 {
            log::warn!("{} reads failed recalibration", self.recalibration_failures);
        }
    }
}

impl AddAssign<&PileupStats> for PileupStats {
    fn add_assign(&mut self, other: &PileupStats) {
        self.records += other.records;
        self.invalid_reads += other.invalid_reads;
        self.recalibration_failures += other.recalibration_failures;
        self.filter += &other.filter;
        self.bases += &other.bases;
    }
}

///
/// Run filter, recalibration and aggregation over one stream of reads.
///
/// Reads that fail to decode, fail recalibration, or describe an alignment
/// outside the reference are logged, counted and skipped.
///
/// # Arguments
/// - sample: the sample every read belongs to
/// - reads: the read stream, typically an [`AlignmentReader`]
/// - reference: the reference the reads were aligned against
/// - options: filter and base quality thresholds
/// - recalibrator: applied to accepted reads when `options.baq` is set
///
pub fn pileup_reads<I>(
    sample: &SampleId,
    reads: I,
    reference: &Reference,
    options: &PileupOptions,
    recalibrator: &dyn Recalibrator,
) -> (Pileup, PileupStats)
where
    I: IntoIterator<Item = Result<AlignedRead>>,
{
    let mut filter = ReadFilter::new(options);
    let mut aggregator =
        PileupAggregator::new(options.min_base_quality).with_reference_length(reference.len());
    let mut stats = PileupStats::default();

    for result in reads {
        stats.records += 1;

        let mut read = match result {
            Ok(read) => read,
            Err(e) => {
                log::warn!("{sample}: skipping undecodable record: {e}");
                stats.invalid_reads += 1;
                continue;
            }
        };

        if !filter.accept(&read) {
            continue;
        }

        if options.baq {
            if let Err(e) = recalibrator.recalibrate(&mut read, reference) {
                log::warn!(
                    "{sample}: {} failed on {}: {e}",
                    recalibrator.name(),
                    read.name.as_deref().unwrap_or("*")
                );
                stats.recalibration_failures += 1;
                continue;
            }
        }

        if let Err(e) = aggregator.observe(sample, &read) {
            log::debug!(
                "{sample}: skipping read {}: {e}",
                read.name.as_deref().unwrap_or("*")
            );
            stats.invalid_reads += 1;
        }
    }

    let (pileup, bases) = aggregator.finish();
    stats.filter = filter.into_stats();
    stats.bases = bases;

    (pileup, stats)
}

///
/// Aggregate a set of BAM/SAM files in parallel and merge their pileups.
///
/// Each file becomes its own sample, named after the file. Failing to open a
/// file aborts the whole run; problems inside a file only skip records.
///
pub fn aggregate_files(
    paths: &[PathBuf],
    reference: &Reference,
    options: &PileupOptions,
    recalibrator: &dyn Recalibrator,
    progress: Option<&ProgressBar>,
) -> Result<(Pileup, PileupStats)> {
    paths
        .par_iter()
        .map(|path| {
            let sample = SampleId::from(sample_id_from_path(path));
            let reader = AlignmentReader::from_path(path).map_err(|e| match e {
                PileupError::Io(io) => PileupError::Io(std::io::Error::new(
                    io.kind(),
                    format!("{}: {io}", path.display()),
                )),
                other => other,
            })?;

            log::debug!("Aggregating {} as sample {sample}", path.display());
            let result = pileup_reads(&sample, reader, reference, options, recalibrator);

            if let Some(bar) = progress {
                bar.inc(1);
            }
            Ok(result)
        })
        .try_reduce(
            || (Pileup::new(), PileupStats::default()),
            |(left, mut left_stats), (right, right_stats)| {
                left_stats += &right_stats;
                Ok((left.merged(right), left_stats))
            },
        )
}
