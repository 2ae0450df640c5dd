//! Rank aggregation, ordering and competition numbering.
//!
//! Everything here is deterministic: grouping uses ordered maps, and
//! sorting breaks rank ties by ascending team key, so the same inputs
//! always produce the same table.

use std::collections::BTreeMap;

/// A rank with a scalar value usable in weighted combinations.
pub trait RankValue {
    fn value(&self) -> i64;
}

/// Groups per-team scores and builds one rank per team.
///
/// Every team that appears in the input gets an entry, including teams
/// whose scores are all unplayed (`None`).
pub fn aggregate_scores<K, S, R, F>(
    scores: impl IntoIterator<Item = (K, Option<S>)>,
    rank: F,
) -> BTreeMap<K, R>
where
    K: Ord,
    F: Fn(&[Option<S>]) -> R,
{
    let mut grouped: BTreeMap<K, Vec<Option<S>>> = BTreeMap::new();
    for (team, score) in scores {
        grouped.entry(team).or_default().push(score);
    }
    grouped
        .into_iter()
        .map(|(team, team_scores)| {
            let r = rank(&team_scores);
            (team, r)
        })
        .collect()
}

/// Orders teams best first; equal ranks fall back to ascending team key.
pub fn sort_ranking<K, R>(ranks: &BTreeMap<K, R>) -> Vec<(K, R)>
where
    K: Ord + Clone,
    R: Ord + Clone,
{
    let mut out: Vec<(K, R)> = ranks
        .iter()
        .map(|(team, rank)| (team.clone(), rank.clone()))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Assigns competition ("1224") placement numbers over a sorted ranking:
/// equal ranks share a number, and the next distinct rank skips past them.
pub fn competition_ranking<K, R: Ord>(sorted: Vec<(K, R)>) -> Vec<(usize, K, R)> {
    let mut out: Vec<(usize, K, R)> = Vec::with_capacity(sorted.len());
    for (i, (team, rank)) in sorted.into_iter().enumerate() {
        let number = match out.last() {
            Some((prev, _, prev_rank)) if *prev_rank == rank => *prev,
            _ => i + 1,
        };
        out.push((number, team, rank));
    }
    out
}

/// Best single score over a team's attempts; a team with no played
/// attempts ranks below every team with one.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxRank<S> {
    pub best: Option<S>,
}

impl<S: Ord + Clone> MaxRank<S> {
    pub fn from_scores(scores: &[Option<S>]) -> Self {
        Self {
            best: scores.iter().flatten().max().cloned(),
        }
    }
}

impl<S: RankValue> RankValue for MaxRank<S> {
    fn value(&self) -> i64 {
        self.best.as_ref().map_or(0, RankValue::value)
    }
}

impl<S: std::fmt::Display> std::fmt::Display for MaxRank<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.best {
            Some(best) => write!(f, "{}", best),
            None => write!(f, "-"),
        }
    }
}

/// Scalar rank produced by a weighted combination of block rankings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeightedRank(pub i64);

impl RankValue for WeightedRank {
    fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for WeightedRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}p", self.0)
    }
}

/// Scales every rank by a weight into the combinable scalar form.
pub fn weighted<K: Ord, R: RankValue>(
    weight: i64,
    ranks: BTreeMap<K, R>,
) -> BTreeMap<K, WeightedRank> {
    ranks
        .into_iter()
        .map(|(team, rank)| (team, WeightedRank(weight * rank.value())))
        .collect()
}

/// Sums weighted rankings; teams missing from a part contribute zero
/// from it but still appear in the result.
pub fn combine_ranks<K: Ord>(
    parts: impl IntoIterator<Item = BTreeMap<K, WeightedRank>>,
) -> BTreeMap<K, WeightedRank> {
    let mut out: BTreeMap<K, WeightedRank> = BTreeMap::new();
    for part in parts {
        for (team, rank) in part {
            out.entry(team).or_default().0 += rank.0;
        }
    }
    out
}

/// A rank paired with a secondary value consulted only on exact rank
/// ties (derived `Ord` compares fields in declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TieBroken<R> {
    pub rank: R,
    pub tiebreak: i64,
}

/// Attaches tiebreak values to a ranking; teams without one get zero.
pub fn apply_tiebreaks<K, R>(
    ranks: BTreeMap<K, R>,
    tiebreaks: &BTreeMap<K, i64>,
) -> BTreeMap<K, TieBroken<R>>
where
    K: Ord,
{
    ranks
        .into_iter()
        .map(|(team, rank)| {
            let tiebreak = tiebreaks.get(&team).copied().unwrap_or(0);
            (team, TieBroken { rank, tiebreak })
        })
        .collect()
}

impl<R: std::fmt::Display> std::fmt::Display for TieBroken<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rank)
    }
}
