mod consensus;
mod pileup;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use env_logger::Env;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "mitopile";
    pub const BIN_NAME: &str = "mitopile";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Strand-aware pileups, heteroplasmy calls and consensus sequences for mitochondrial DNA.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug messages"),
        )
        .subcommand(pileup::cli::create_pileup_cli())
        .subcommand(consensus::cli::create_consensus_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match matches.subcommand() {
        //
        // PILEUP
        //
        Some((pileup::cli::PILEUP_CMD, matches)) => {
            pileup::handlers::run_pileup(matches)?;
        }

        //
        // CONSENSUS
        //
        Some((consensus::cli::CONSENSUS_CMD, matches)) => {
            consensus::handlers::run_consensus(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
