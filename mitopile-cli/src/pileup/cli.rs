use clap::{Arg, ArgAction, Command, value_parser};

pub const PILEUP_CMD: &str = "pileup";

pub fn create_pileup_cli() -> Command {
    Command::new(PILEUP_CMD)
        .about("Aggregate BAM/SAM files into strand-aware pileups and call variants. Writes variants.txt to the output directory.")
        .arg(
            Arg::new("inputs")
                .required(true)
                .num_args(1..)
                .help("One or more BAM or SAM files; each file is one sample"),
        )
        .arg(
            Arg::new("reference")
                .long("reference")
                .short('r')
                .required(true)
                .help("Reference FASTA (plain or gzipped)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .required(true)
                .help("Output directory"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML or YAML file with pileup, call and consensus options"),
        )
        .arg(
            Arg::new("map-qual")
                .long("map-qual")
                .value_parser(value_parser!(u8))
                .help("Minimum mapping quality [default: 20]"),
        )
        .arg(
            Arg::new("align-qual")
                .long("align-qual")
                .value_parser(value_parser!(i64))
                .help("Minimum alignment score (AS tag) [default: 30]"),
        )
        .arg(
            Arg::new("base-qual")
                .long("base-qual")
                .value_parser(value_parser!(u8))
                .help("Minimum base quality [default: 20]"),
        )
        .arg(
            Arg::new("no-baq")
                .long("no-baq")
                .action(ArgAction::SetTrue)
                .help("Skip base alignment quality recalibration"),
        )
        .arg(
            Arg::new("call-deletions")
                .long("call-deletions")
                .action(ArgAction::SetTrue)
                .help("Report deletions as variants"),
        )
        .arg(
            Arg::new("min-level")
                .long("min-level")
                .value_parser(value_parser!(f64))
                .help("Minimum variant level to report [default: 0.01]"),
        )
        .arg(
            Arg::new("homoplasmic-level")
                .long("homoplasmic-level")
                .value_parser(value_parser!(f64))
                .help("Level at which a substitution is homoplasmic [default: 0.9]"),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .action(ArgAction::SetTrue)
                .help("Also write per-position strand counts to raw.txt"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .action(ArgAction::SetTrue)
                .help("Also write run statistics to stats.json"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('t')
                .value_parser(value_parser!(usize))
                .help("Worker threads (default: all cores)"),
        )
}
