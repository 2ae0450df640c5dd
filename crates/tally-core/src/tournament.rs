//! Tournament structure: blocks, rankings and score stores.
//!
//! A tournament is an explicit registry built by its event definition.
//! Blocks tie a ruleset to a set of stored scores; rankings are named
//! computations from a score store to a standings table.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::ruleset::{AnyRuleset, AnyScore};
use crate::standings::competition_ranking;

pub type TeamId = String;

/// One scored event block: a ruleset plus an identity under which its
/// scores are stored.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: String,
    pub name: String,
    pub ruleset: AnyRuleset,
}

impl Block {
    pub fn new(id: impl Into<String>, name: impl Into<String>, ruleset: AnyRuleset) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ruleset,
        }
    }
}

/// One row of a computed standings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsEntry {
    /// Competition placement number; tied teams share one.
    pub number: usize,
    pub team: TeamId,
    /// Human-readable rank detail, e.g. `"30p, 02:03"`.
    pub detail: String,
}

/// A standings table, best placement first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    pub entries: Vec<StandingsEntry>,
}

impl Standings {
    /// Builds a table from an already-sorted ranking, assigning
    /// competition placement numbers.
    pub fn from_sorted<R>(sorted: Vec<(TeamId, R)>) -> Self
    where
        R: Ord + std::fmt::Display,
    {
        let entries = competition_ranking(sorted)
            .into_iter()
            .map(|(number, team, rank)| StandingsEntry {
                number,
                team,
                detail: rank.to_string(),
            })
            .collect();
        Self { entries }
    }
}

type ComputeFn = dyn Fn(&dyn ScoreStore) -> Result<Standings> + Send + Sync;

/// A named standings computation over a score store.
pub struct Ranking {
    pub id: String,
    pub name: String,
    compute: Box<ComputeFn>,
}

impl Ranking {
    pub fn new<F>(id: impl Into<String>, name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&dyn ScoreStore) -> Result<Standings> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            name: name.into(),
            compute: Box::new(compute),
        }
    }

    pub fn compute(&self, store: &dyn ScoreStore) -> Result<Standings> {
        debug!(ranking = %self.id, "computing standings");
        (self.compute)(store)
    }
}

impl std::fmt::Debug for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ranking")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Source of stored scores, abstracted over the backing storage.
///
/// A row's data is `None` for a registered but unplayed score.
pub trait ScoreStore {
    fn block_scores(&self, block_id: &str) -> Result<Vec<(TeamId, Option<Vec<u8>>)>>;

    /// Tiebreak values under a given name; an unknown name is an empty map.
    fn tiebreaks(&self, name: &str) -> Result<BTreeMap<TeamId, i64>>;
}

/// The explicit block and ranking registry of one event.
#[derive(Debug, Default)]
pub struct Tournament {
    blocks: BTreeMap<String, Block>,
    rankings: BTreeMap<String, Ranking>,
}

impl Tournament {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_block(&mut self, block: Block) -> Result<()> {
        if self.blocks.contains_key(&block.id) {
            return Err(Error::DuplicateId(block.id));
        }
        debug!(block = %block.id, ruleset = block.ruleset.kind_name(), "registering block");
        self.blocks.insert(block.id.clone(), block);
        Ok(())
    }

    pub fn add_ranking(&mut self, ranking: Ranking) -> Result<()> {
        if self.rankings.contains_key(&ranking.id) {
            return Err(Error::DuplicateId(ranking.id));
        }
        self.rankings.insert(ranking.id.clone(), ranking);
        Ok(())
    }

    pub fn block(&self, id: &str) -> Result<&Block> {
        self.blocks
            .get(id)
            .ok_or_else(|| Error::BlockNotFound(id.to_string()))
    }

    pub fn ranking(&self, id: &str) -> Result<&Ranking> {
        self.rankings
            .get(id)
            .ok_or_else(|| Error::RankingNotFound(id.to_string()))
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn rankings(&self) -> impl Iterator<Item = &Ranking> {
        self.rankings.values()
    }

    /// Decodes every stored row of a block through its ruleset; unplayed
    /// rows stay `None`.
    pub fn decode_block_scores(
        &self,
        store: &dyn ScoreStore,
        block_id: &str,
    ) -> Result<Vec<(TeamId, Option<AnyScore>)>> {
        let block = self.block(block_id)?;
        decode_scores(&block.ruleset, store.block_scores(block_id)?)
    }
}

/// Decodes raw score rows through a ruleset, keeping unplayed rows.
pub fn decode_scores(
    ruleset: &AnyRuleset,
    rows: Vec<(TeamId, Option<Vec<u8>>)>,
) -> Result<Vec<(TeamId, Option<AnyScore>)>> {
    rows.into_iter()
        .map(|(team, data)| {
            let score = match data {
                Some(data) => Some(ruleset.decode(&data)?),
                None => None,
            };
            Ok((team, score))
        })
        .collect()
}
