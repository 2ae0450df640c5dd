//! JSON tournament store.
//!
//! The store file holds everything about one event: the blocks with their
//! ruleset names and hex-encoded score rows, the ranking definitions, and
//! named tiebreak tables. Loading decodes all hex up front so the
//! [`ScoreStore`] view hands out raw bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use tally_core::{
    aggregate_scores, apply_tiebreaks, combine_ranks, decode_scores, sort_ranking, weighted,
    AnyRuleset, AnyScore, Block, JudgedMaxRank, MaxRank, Ranking, RescueMaxRank, ScoreStore,
    Standings, SumoPointsRank, SumoWinsRank, TeamId, Tournament, WeightedRank,
};

use crate::hex;

#[derive(Debug, Deserialize)]
pub struct StoreFile {
    pub blocks: BTreeMap<String, BlockEntry>,
    #[serde(default)]
    pub rankings: Vec<RankingDef>,
    #[serde(default)]
    pub tiebreaks: BTreeMap<String, BTreeMap<String, i64>>,
}

#[derive(Debug, Deserialize)]
pub struct BlockEntry {
    pub ruleset: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scores: Vec<ScoreRow>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRow {
    pub team: String,
    /// Hex-encoded score data; `null` marks a registered but unplayed score.
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RankingDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub aggregate: AggregateKind,
    pub blocks: Vec<BlockRef>,
    #[serde(default)]
    pub tiebreak: Option<String>,
}

/// How per-team scores of a block collapse into one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    /// Total match points (match blocks).
    Points,
    /// Win count, ties second (match blocks).
    Wins,
    /// Best single score (rescue and judged blocks).
    Best,
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Points => "points",
            Self::Wins => "wins",
            Self::Best => "best",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Deserialize)]
pub struct BlockRef {
    pub id: String,
    /// Weight in a combined ranking. When no block of the ranking
    /// carries a weight, the blocks' rows are pooled into one aggregate
    /// instead of being combined by value.
    #[serde(default)]
    pub weight: Option<i64>,
}

/// Score rows and tiebreaks with all hex decoded.
pub struct JsonStore {
    blocks: BTreeMap<String, Vec<(TeamId, Option<Vec<u8>>)>>,
    tiebreaks: BTreeMap<String, BTreeMap<TeamId, i64>>,
}

impl ScoreStore for JsonStore {
    fn block_scores(&self, block_id: &str) -> tally_core::Result<Vec<(TeamId, Option<Vec<u8>>)>> {
        Ok(self.blocks.get(block_id).cloned().unwrap_or_default())
    }

    fn tiebreaks(&self, name: &str) -> tally_core::Result<BTreeMap<TeamId, i64>> {
        Ok(self.tiebreaks.get(name).cloned().unwrap_or_default())
    }
}

pub struct LoadedStore {
    pub file: StoreFile,
    pub store: JsonStore,
}

/// Reads and parses a store file, decoding every hex score row.
pub fn load(path: &Path) -> Result<LoadedStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read store file {}", path.display()))?;
    let file: StoreFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse store file {}", path.display()))?;

    let mut blocks = BTreeMap::new();
    for (block_id, entry) in &file.blocks {
        let rows: Result<Vec<(TeamId, Option<Vec<u8>>)>> = entry
            .scores
            .iter()
            .map(|row| {
                let data = row
                    .data
                    .as_deref()
                    .map(hex::decode)
                    .transpose()
                    .with_context(|| {
                        format!("bad score data for {} in block {}", row.team, block_id)
                    })?;
                Ok((row.team.clone(), data))
            })
            .collect();
        blocks.insert(block_id.clone(), rows?);
    }
    debug!(blocks = blocks.len(), path = %path.display(), "loaded store");

    let tiebreaks = file
        .tiebreaks
        .iter()
        .map(|(name, table)| (name.clone(), table.clone()))
        .collect();

    Ok(LoadedStore {
        store: JsonStore { blocks, tiebreaks },
        file,
    })
}

/// Builds the block and ranking registry described by a store file.
pub fn build_tournament(file: &StoreFile) -> Result<Tournament> {
    let mut tournament = Tournament::new();

    for (block_id, entry) in &file.blocks {
        let ruleset = AnyRuleset::from_spec(&entry.ruleset)
            .with_context(|| format!("block {}", block_id))?;
        let name = entry.name.clone().unwrap_or_else(|| block_id.clone());
        tournament.add_block(Block::new(block_id.clone(), name, ruleset))?;
    }

    for def in &file.rankings {
        tournament.add_ranking(build_ranking(&tournament, def)?)?;
    }

    Ok(tournament)
}

fn build_ranking(tournament: &Tournament, def: &RankingDef) -> Result<Ranking> {
    let mut parts: Vec<(String, Option<i64>, AnyRuleset)> = Vec::new();
    for block_ref in &def.blocks {
        let block = tournament
            .block(&block_ref.id)
            .with_context(|| format!("ranking {}", def.id))?;
        check_aggregate(def.aggregate, &block.ruleset)
            .with_context(|| format!("ranking {} over block {}", def.id, block_ref.id))?;
        parts.push((block_ref.id.clone(), block_ref.weight, block.ruleset.clone()));
    }
    if parts.is_empty() {
        bail!("ranking {} names no blocks", def.id);
    }
    if parts.iter().all(|(_, weight, _)| weight.is_none()) {
        let kind = parts[0].2.kind_name();
        if parts.iter().any(|(_, _, ruleset)| ruleset.kind_name() != kind) {
            bail!("ranking {} pools blocks of different kinds", def.id);
        }
    }

    let aggregate = def.aggregate;
    let tiebreak = def.tiebreak.clone();
    let name = def.name.clone().unwrap_or_else(|| def.id.clone());

    let compute = move |store: &dyn ScoreStore| -> tally_core::Result<Standings> {
        let tiebreaks = match &tiebreak {
            Some(name) => store.tiebreaks(name)?,
            None => BTreeMap::new(),
        };

        // Unweighted blocks pool their rows into one aggregate and keep
        // the native rank detail, so a team's best run over two groups
        // of the same event is the max across both. Any weight switches
        // the ranking to combined point values.
        if parts.iter().all(|(_, weight, _)| weight.is_none()) {
            let table = rank_pooled(store, &parts, aggregate)?;
            return Ok(table.into_standings(&tiebreaks));
        }

        let mut weighted_parts = Vec::with_capacity(parts.len());
        for (block_id, weight, ruleset) in &parts {
            let table = rank_block(store, block_id, ruleset, aggregate)?;
            weighted_parts.push(table.weighted(weight.unwrap_or(1)));
        }
        let combined = combine_ranks(weighted_parts);
        let broken = apply_tiebreaks(combined, &tiebreaks);
        Ok(Standings::from_sorted(sort_ranking(&broken)))
    };

    Ok(Ranking::new(def.id.clone(), name, compute))
}

fn check_aggregate(aggregate: AggregateKind, ruleset: &AnyRuleset) -> Result<()> {
    let ok = match aggregate {
        AggregateKind::Points | AggregateKind::Wins => matches!(ruleset, AnyRuleset::Sumo(_)),
        AggregateKind::Best => matches!(ruleset, AnyRuleset::Rescue(_) | AnyRuleset::Judged(_)),
    };
    if !ok {
        bail!(
            "aggregate '{}' does not apply to {} blocks",
            aggregate,
            ruleset.kind_name()
        );
    }
    Ok(())
}

/// One block's computed per-team ranks, keeping the concrete rank type
/// for native display.
enum RankTable {
    SumoPoints(BTreeMap<TeamId, SumoPointsRank>),
    SumoWins(BTreeMap<TeamId, SumoWinsRank>),
    RescueBest(BTreeMap<TeamId, RescueMaxRank>),
    JudgedBest(BTreeMap<TeamId, JudgedMaxRank>),
}

impl RankTable {
    fn weighted(self, weight: i64) -> BTreeMap<TeamId, WeightedRank> {
        match self {
            Self::SumoPoints(ranks) => weighted(weight, ranks),
            Self::SumoWins(ranks) => weighted(weight, ranks),
            Self::RescueBest(ranks) => weighted(weight, ranks),
            Self::JudgedBest(ranks) => weighted(weight, ranks),
        }
    }

    fn into_standings(self, tiebreaks: &BTreeMap<TeamId, i64>) -> Standings {
        fn build<R>(ranks: BTreeMap<TeamId, R>, tiebreaks: &BTreeMap<TeamId, i64>) -> Standings
        where
            R: Ord + Clone + fmt::Display,
        {
            let broken = apply_tiebreaks(ranks, tiebreaks);
            Standings::from_sorted(sort_ranking(&broken))
        }

        match self {
            Self::SumoPoints(ranks) => build(ranks, tiebreaks),
            Self::SumoWins(ranks) => build(ranks, tiebreaks),
            Self::RescueBest(ranks) => build(ranks, tiebreaks),
            Self::JudgedBest(ranks) => build(ranks, tiebreaks),
        }
    }
}

fn rank_block(
    store: &dyn ScoreStore,
    block_id: &str,
    ruleset: &AnyRuleset,
    aggregate: AggregateKind,
) -> tally_core::Result<RankTable> {
    let decoded = decode_scores(ruleset, store.block_scores(block_id)?)?;
    match (ruleset, aggregate) {
        (AnyRuleset::Sumo(_), AggregateKind::Points) => {
            let scores = unwrap_scores(decoded, AnyScore::into_sumo)?;
            Ok(RankTable::SumoPoints(aggregate_scores(
                scores,
                SumoPointsRank::from_scores,
            )))
        }
        (AnyRuleset::Sumo(_), AggregateKind::Wins) => {
            let scores = unwrap_scores(decoded, AnyScore::into_sumo)?;
            Ok(RankTable::SumoWins(aggregate_scores(
                scores,
                SumoWinsRank::from_scores,
            )))
        }
        (AnyRuleset::Rescue(_), AggregateKind::Best) => {
            let scores = unwrap_scores(decoded, AnyScore::into_rescue)?;
            Ok(RankTable::RescueBest(aggregate_scores(
                scores,
                MaxRank::from_scores,
            )))
        }
        (AnyRuleset::Judged(_), AggregateKind::Best) => {
            let scores = unwrap_scores(decoded, AnyScore::into_judged)?;
            Ok(RankTable::JudgedBest(aggregate_scores(
                scores,
                MaxRank::from_scores,
            )))
        }
        _ => Err(tally_core::Error::ScoreShapeMismatch {
            expected: ruleset.kind_name(),
        }),
    }
}

/// Ranks the concatenated rows of every block in an unweighted ranking.
/// All blocks share one kind; the rank types dispatch on the first.
fn rank_pooled(
    store: &dyn ScoreStore,
    parts: &[(String, Option<i64>, AnyRuleset)],
    aggregate: AggregateKind,
) -> tally_core::Result<RankTable> {
    match (&parts[0].2, aggregate) {
        (AnyRuleset::Sumo(_), AggregateKind::Points) => {
            let scores = pooled_rows(store, parts, AnyScore::into_sumo)?;
            Ok(RankTable::SumoPoints(aggregate_scores(
                scores,
                SumoPointsRank::from_scores,
            )))
        }
        (AnyRuleset::Sumo(_), AggregateKind::Wins) => {
            let scores = pooled_rows(store, parts, AnyScore::into_sumo)?;
            Ok(RankTable::SumoWins(aggregate_scores(
                scores,
                SumoWinsRank::from_scores,
            )))
        }
        (AnyRuleset::Rescue(_), AggregateKind::Best) => {
            let scores = pooled_rows(store, parts, AnyScore::into_rescue)?;
            Ok(RankTable::RescueBest(aggregate_scores(
                scores,
                MaxRank::from_scores,
            )))
        }
        (AnyRuleset::Judged(_), AggregateKind::Best) => {
            let scores = pooled_rows(store, parts, AnyScore::into_judged)?;
            Ok(RankTable::JudgedBest(aggregate_scores(
                scores,
                MaxRank::from_scores,
            )))
        }
        _ => Err(tally_core::Error::ScoreShapeMismatch {
            expected: parts[0].2.kind_name(),
        }),
    }
}

fn pooled_rows<S>(
    store: &dyn ScoreStore,
    parts: &[(String, Option<i64>, AnyRuleset)],
    into: impl Fn(AnyScore) -> tally_core::Result<S>,
) -> tally_core::Result<Vec<(TeamId, Option<S>)>> {
    let mut rows = Vec::new();
    for (block_id, _, ruleset) in parts {
        let decoded = decode_scores(ruleset, store.block_scores(block_id)?)?;
        rows.extend(unwrap_scores(decoded, &into)?);
    }
    Ok(rows)
}

fn unwrap_scores<S>(
    rows: Vec<(TeamId, Option<AnyScore>)>,
    into: impl Fn(AnyScore) -> tally_core::Result<S>,
) -> tally_core::Result<Vec<(TeamId, Option<S>)>> {
    rows.into_iter()
        .map(|(team, score)| Ok((team, score.map(&into).transpose()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;

    use tally_core::{AttemptOutcome, Ruleset};

    fn rescue_hex(cats: &[&str], time: u32) -> String {
        let AnyRuleset::Rescue(ruleset) = AnyRuleset::from_spec("rescue1").unwrap() else {
            unreachable!()
        };
        let mut score = ruleset.create_score();
        score.set_time(time).unwrap();
        for cat in cats {
            score
                .set_outcome(cat, AttemptOutcome::FirstSuccess)
                .unwrap();
        }
        crate::hex::encode(&ruleset.encode(&score).unwrap())
    }

    fn judged_hex(spec: &str, points: &[(&str, u8)]) -> String {
        let AnyRuleset::Judged(ruleset) = AnyRuleset::from_spec(spec).unwrap() else {
            unreachable!()
        };
        let mut score = ruleset.create_score();
        for (cat, value) in points {
            score.set(cat, *value).unwrap();
        }
        crate::hex::encode(&ruleset.encode(&score).unwrap())
    }

    fn write_store(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_compute_best_ranking() {
        let json = format!(
            r#"{{
                "blocks": {{
                    "rescue1.alku": {{
                        "ruleset": "rescue1",
                        "name": "Rescue 1",
                        "scores": [
                            {{"team": "a", "data": "{a}"}},
                            {{"team": "b", "data": "{b}"}},
                            {{"team": "c", "data": null}}
                        ]
                    }}
                }},
                "rankings": [
                    {{"id": "rescue", "aggregate": "best",
                      "blocks": [{{"id": "rescue1.alku"}}]}}
                ]
            }}"#,
            a = rescue_hex(&["viiva_punainen"], 200),
            b = rescue_hex(&["uhri_alue"], 100),
        );

        let store_file = write_store(&json);
        let loaded = load(store_file.path()).unwrap();
        let tournament = build_tournament(&loaded.file).unwrap();
        let standings = tournament
            .ranking("rescue")
            .unwrap()
            .compute(&loaded.store)
            .unwrap();

        let rows: Vec<(usize, &str, &str)> = standings
            .entries
            .iter()
            .map(|e| (e.number, e.team.as_str(), e.detail.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, "a", "20p, 03:20"),
                (2, "b", "10p, 01:40"),
                (3, "c", "-"),
            ]
        );
    }

    #[test]
    fn test_weighted_ranking_combines_blocks() {
        let json = format!(
            r#"{{
                "blocks": {{
                    "interview": {{
                        "ruleset": "interview",
                        "scores": [
                            {{"team": "a", "data": "{ia}"}},
                            {{"team": "b", "data": "{ib}"}}
                        ]
                    }},
                    "performance": {{
                        "ruleset": "performance",
                        "scores": [
                            {{"team": "b", "data": "{pb}"}}
                        ]
                    }}
                }},
                "rankings": [
                    {{"id": "overall", "aggregate": "best",
                      "blocks": [
                          {{"id": "interview", "weight": 2}},
                          {{"id": "performance", "weight": 1}}
                      ]}}
                ]
            }}"#,
            ia = judged_hex("interview", &[("suun_oma", 5), ("ohty_vaikeus", 5)]),
            ib = judged_hex("interview", &[("suun_oma", 5)]),
            pb = judged_hex("performance", &[("hvps_pisteet", 5), ("ltvs_aika", 2)]),
        );

        let store_file = write_store(&json);
        let loaded = load(store_file.path()).unwrap();
        let tournament = build_tournament(&loaded.file).unwrap();
        let standings = tournament
            .ranking("overall")
            .unwrap()
            .compute(&loaded.store)
            .unwrap();

        // a: 2*10 = 20; b: 2*5 + 7 = 17
        assert_eq!(standings.entries[0].team, "a");
        assert_eq!(standings.entries[0].detail, "20p");
        assert_eq!(standings.entries[1].team, "b");
        assert_eq!(standings.entries[1].detail, "17p");
    }

    #[test]
    fn test_pooled_ranking_spans_blocks() {
        // Two groups of the same event; the best run counts no matter
        // which group it was driven in.
        let json = format!(
            r#"{{
                "blocks": {{
                    "rescue1.a": {{
                        "ruleset": "rescue1",
                        "scores": [
                            {{"team": "a", "data": "{a1}"}},
                            {{"team": "b", "data": "{b1}"}}
                        ]
                    }},
                    "rescue1.b": {{
                        "ruleset": "rescue1",
                        "scores": [
                            {{"team": "a", "data": "{a2}"}},
                            {{"team": "b", "data": null}}
                        ]
                    }}
                }},
                "rankings": [
                    {{"id": "rescue1", "aggregate": "best",
                      "blocks": [{{"id": "rescue1.a"}}, {{"id": "rescue1.b"}}]}}
                ]
            }}"#,
            a1 = rescue_hex(&["uhri_alue"], 300),
            b1 = rescue_hex(&["viiva_punainen", "uhri_alue"], 200),
            a2 = rescue_hex(&["viiva_punainen", "uhri_alue", "uhri_ulos"], 250),
        );

        let store_file = write_store(&json);
        let loaded = load(store_file.path()).unwrap();
        let tournament = build_tournament(&loaded.file).unwrap();
        let standings = tournament
            .ranking("rescue1")
            .unwrap()
            .compute(&loaded.store)
            .unwrap();

        // a's best run is the second-block 40p drive
        let rows: Vec<(usize, &str, &str)> = standings
            .entries
            .iter()
            .map(|e| (e.number, e.team.as_str(), e.detail.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![(1, "a", "40p, 04:10"), (2, "b", "30p, 03:20")]
        );
    }

    #[test]
    fn test_pooling_different_kinds_rejected() {
        let json = r#"{
            "blocks": {
                "interview": {"ruleset": "interview", "scores": []},
                "rescue1.a": {"ruleset": "rescue1", "scores": []}
            },
            "rankings": [
                {"id": "r", "aggregate": "best",
                 "blocks": [{"id": "interview"}, {"id": "rescue1.a"}]}
            ]
        }"#;

        let store_file = write_store(json);
        let loaded = load(store_file.path()).unwrap();
        assert!(build_tournament(&loaded.file).is_err());
    }

    #[test]
    fn test_tiebreak_applies_to_ranking() {
        let json = format!(
            r#"{{
                "blocks": {{
                    "interview": {{
                        "ruleset": "interview",
                        "scores": [
                            {{"team": "a", "data": "{score}"}},
                            {{"team": "b", "data": "{score}"}}
                        ]
                    }}
                }},
                "rankings": [
                    {{"id": "r", "aggregate": "best", "tiebreak": "semifinal",
                      "blocks": [{{"id": "interview"}}]}}
                ],
                "tiebreaks": {{
                    "semifinal": {{"b": 4}}
                }}
            }}"#,
            score = judged_hex("interview", &[("suun_oma", 3)]),
        );

        let store_file = write_store(&json);
        let loaded = load(store_file.path()).unwrap();
        let tournament = build_tournament(&loaded.file).unwrap();
        let standings = tournament
            .ranking("r")
            .unwrap()
            .compute(&loaded.store)
            .unwrap();

        assert_eq!(standings.entries[0].team, "b");
        assert_eq!(standings.entries[0].number, 1);
        assert_eq!(standings.entries[1].team, "a");
        assert_eq!(standings.entries[1].number, 2);
    }

    #[test]
    fn test_aggregate_mismatch_rejected() {
        let json = r#"{
            "blocks": {
                "rescue1.alku": {"ruleset": "rescue1", "scores": []}
            },
            "rankings": [
                {"id": "r", "aggregate": "points",
                 "blocks": [{"id": "rescue1.alku"}]}
            ]
        }"#;

        let store_file = write_store(json);
        let loaded = load(store_file.path()).unwrap();
        assert!(build_tournament(&loaded.file).is_err());
    }

    #[test]
    fn test_unknown_block_ref_rejected() {
        let json = r#"{
            "blocks": {},
            "rankings": [
                {"id": "r", "aggregate": "best", "blocks": [{"id": "nope"}]}
            ]
        }"#;

        let store_file = write_store(json);
        let loaded = load(store_file.path()).unwrap();
        assert!(build_tournament(&loaded.file).is_err());
    }

    #[test]
    fn test_bad_hex_rejected_at_load() {
        let json = r#"{
            "blocks": {
                "interview": {
                    "ruleset": "interview",
                    "scores": [{"team": "a", "data": "zz"}]
                }
            }
        }"#;

        let store_file = write_store(json);
        assert!(load(store_file.path()).is_err());
    }
}
