//! CLI argument definitions for tally.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Tournament scoring and standings", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute standings tables
    Standings {
        /// Tournament store file (JSON)
        #[arg(short, long, default_value = "tournament.json", env = "TALLY_STORE")]
        store: PathBuf,
        /// Ranking id (all rankings when omitted)
        ranking: Option<String>,
    },
    /// Decode a single encoded score
    Decode {
        /// Ruleset name, e.g. rescue1, sumo, interview
        ruleset: String,
        /// Score data as hex
        hex: String,
    },
    /// List the blocks of a tournament store
    Blocks {
        /// Tournament store file (JSON)
        #[arg(short, long, default_value = "tournament.json", env = "TALLY_STORE")]
        store: PathBuf,
    },
}
