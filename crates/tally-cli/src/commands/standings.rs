//! Standings command: compute and print ranking tables.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use tally_core::{Ranking, ScoreStore};

use crate::store;

pub fn run(store_path: &Path, ranking_id: Option<&str>) -> Result<()> {
    let loaded = store::load(store_path)?;
    let tournament = store::build_tournament(&loaded.file)?;

    match ranking_id {
        Some(id) => print_standings(tournament.ranking(id)?, &loaded.store)?,
        None => {
            for ranking in tournament.rankings() {
                print_standings(ranking, &loaded.store)?;
            }
        }
    }

    Ok(())
}

fn print_standings(ranking: &Ranking, store: &dyn ScoreStore) -> Result<()> {
    let standings = ranking.compute(store)?;

    println!("{}", ranking.name.bold());
    if standings.entries.is_empty() {
        println!("  {}", "no scores".dimmed());
    }
    for entry in &standings.entries {
        println!(
            "{:>3}. {:<24} {}",
            entry.number,
            entry.team,
            entry.detail.dimmed()
        );
    }
    println!();

    Ok(())
}
