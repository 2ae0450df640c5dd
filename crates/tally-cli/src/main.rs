mod cli;
mod commands;
mod hex;
mod store;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; default to warnings unless RUST_LOG overrides
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tally_cli=warn,tally_core=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match args.command {
        Command::Standings { store, ranking } => {
            commands::standings::run(&store, ranking.as_deref())
        }
        Command::Decode { ruleset, hex } => commands::decode::run(&ruleset, &hex),
        Command::Blocks { store } => commands::blocks::run(&store),
    }
}
