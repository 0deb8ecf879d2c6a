use clap::{Arg, Command, value_parser};

pub const CONSENSUS_CMD: &str = "consensus";

pub fn create_consensus_cli() -> Command {
    Command::new(CONSENSUS_CMD)
        .about("Build one consensus sequence per sample from a variants file. Outputs FASTA.")
        .arg(
            Arg::new("variants")
                .long("variants")
                .required(true)
                .help("Variants file written by `mitopile pileup`"),
        )
        .arg(
            Arg::new("reference")
                .long("reference")
                .short('r')
                .required(true)
                .help("Reference FASTA the variants were called against"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML or YAML file; only its consensus options are used"),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .value_parser(value_parser!(f64))
                .help("Heteroplasmy level needed to enter the consensus [default: 0.5]"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .required(false)
                .help("Output FASTA file (default: stdout)"),
        )
}
