//! Blocks command: list the scored blocks of a store.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::store;

pub fn run(store_path: &Path) -> Result<()> {
    let loaded = store::load(store_path)?;
    // Build the tournament to surface bad ruleset names early
    let tournament = store::build_tournament(&loaded.file)?;

    for block in tournament.blocks() {
        let entry = &loaded.file.blocks[&block.id];
        let played = entry.scores.iter().filter(|row| row.data.is_some()).count();
        println!(
            "{:<20} {:<12} {:>3} scores, {} played",
            block.id.bold(),
            entry.ruleset,
            entry.scores.len(),
            played
        );
    }

    Ok(())
}
