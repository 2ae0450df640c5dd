//! Rescue course rulesets.
//!
//! A rescue score is a composed category score: an unscored elapsed-time
//! counter followed by the obstacle categories of the difficulty tier.
//! Line obstacles that appear multiple times on a course are tallied per
//! outcome; every other obstacle is a single attempt with retry semantics.
//!
//! Three difficulty tiers exist, each a superset-style extension of the
//! previous course layout.

use std::sync::Arc;

use crate::category::{AttemptOutcome, AttemptTally, CatScore, CategoryDef, Schema};
use crate::error::{CodecError, Error, Result, ValidationError};
use crate::ruleset::Ruleset;
use crate::standings::{MaxRank, RankValue};

/// Elapsed-time cap in seconds, unless the ruleset overrides it.
pub const DEFAULT_MAX_TIME: u32 = 600;

const TIME: &str = "time";

/// Line categories that occur more than once on a course and are
/// tallied per attempt outcome.
const REPEAT: &[&str] = &[
    "viiva_palat",
    "viiva_kippi",
    "viiva_maki",
    "viiva_kulma",
    "viiva_hidasteet",
    "viiva_risteys",
    "viiva_katkos",
    "viiva_este",
];

const TIER1_LINE: &[&str] = &["viiva_punainen", "viiva_palat", "viiva_kippi"];
const TIER1_VICTIM: &[&str] = &["uhri_alue", "uhri_tunnistus", "uhri_ulos", "uhri_peruutus"];

const TIER2_LINE: &[&str] = &[
    "viiva_punainen",
    "viiva_palat",
    "viiva_kippi",
    "viiva_maki",
    "viiva_kulma",
    "viiva_hidasteet",
    "viiva_risteys",
];
const TIER2_VICTIM: &[&str] = &[
    "uhri_alue",
    "uhri_tunnistus",
    "uhri_ulos",
    "uhri_peruutus",
    "uhri_tarttuminen",
];

const TIER3_LINE: &[&str] = &[
    "viiva_punainen",
    "viiva_palat",
    "viiva_kippi",
    "viiva_maki",
    "viiva_kulma",
    "viiva_hidasteet",
    "viiva_risteys",
    "viiva_katkos",
    "viiva_este",
];
const TIER3_VICTIM: &[&str] = &[
    "uhri_alue",
    "uhri_tunnistus",
    "uhri_nosto",
    "uhri_koroke",
    "uhri_pelastus",
    "uhri_peruutus",
];

fn obstacle_weight(name: &str) -> u32 {
    match name {
        "viiva_punainen" | "uhri_pelastus" => 20,
        _ => 10,
    }
}

fn obstacle(name: &'static str) -> CategoryDef {
    let weight = obstacle_weight(name);
    if REPEAT.contains(&name) {
        CategoryDef::tally(name, weight)
    } else {
        CategoryDef::outcome(name, weight, true)
    }
}

fn tier_schema(name: &'static str, line: &[&'static str], victim: &[&'static str]) -> Schema {
    let mut categories = Vec::with_capacity(1 + line.len() + victim.len());
    categories.push(CategoryDef::counter(TIME, 2, false));
    categories.extend(line.iter().map(|&n| obstacle(n)));
    categories.extend(victim.iter().map(|&n| obstacle(n)));
    Schema::new(name, categories)
}

/// One competitor's rescue run.
///
/// Ordering is by points, with a lower elapsed time breaking ties; that
/// makes the best run the maximum under `Ord`. Equality follows the same
/// key, so two runs with the same total and time tie no matter which
/// categories produced the points; compare [`inner`](Self::inner) scores
/// for category-wise equality.
#[derive(Debug, Clone)]
pub struct RescueScore(CatScore);

impl RescueScore {
    pub fn points(&self) -> u32 {
        self.0.points()
    }

    /// Elapsed time in seconds.
    pub fn time(&self) -> u32 {
        self.0
            .get(TIME)
            .and_then(|v| v.as_count())
            .unwrap_or(0) as u32
    }

    pub fn set_time(&mut self, seconds: u32) -> Result<()> {
        self.0.set_count(TIME, i64::from(seconds))
    }

    pub fn set_outcome(&mut self, name: &str, outcome: AttemptOutcome) -> Result<()> {
        self.0.set_outcome(name, outcome)
    }

    pub fn set_tally(&mut self, name: &str, tally: AttemptTally) -> Result<()> {
        self.0.set_tally(name, tally)
    }

    /// Category-level view, for per-category inspection and equality.
    pub fn inner(&self) -> &CatScore {
        &self.0
    }
}

impl PartialEq for RescueScore {
    fn eq(&self, other: &Self) -> bool {
        self.points() == other.points() && self.time() == other.time()
    }
}

impl Eq for RescueScore {}

impl PartialOrd for RescueScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RescueScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.points()
            .cmp(&other.points())
            .then_with(|| other.time().cmp(&self.time()))
    }
}

impl RankValue for RescueScore {
    fn value(&self) -> i64 {
        i64::from(self.points())
    }
}

impl std::fmt::Display for RescueScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let time = self.time();
        write!(f, "{}p, {:02}:{:02}", self.points(), time / 60, time % 60)
    }
}

/// Best run over a team's attempts.
pub type RescueMaxRank = MaxRank<RescueScore>;

/// Rescue ruleset for one difficulty tier.
#[derive(Debug, Clone)]
pub struct RescueRuleset {
    schema: Arc<Schema>,
    max_time: u32,
}

impl RescueRuleset {
    /// Builds the ruleset for a difficulty tier (1 to 3).
    pub fn by_difficulty(difficulty: u8, max_time: Option<u32>) -> Result<Self> {
        let schema = match difficulty {
            1 => tier_schema("rescue1", TIER1_LINE, TIER1_VICTIM),
            2 => tier_schema("rescue2", TIER2_LINE, TIER2_VICTIM),
            3 => tier_schema("rescue3", TIER3_LINE, TIER3_VICTIM),
            _ => return Err(Error::UnknownRuleset(format!("rescue{}", difficulty))),
        };
        Ok(Self {
            schema: Arc::new(schema),
            max_time: max_time.unwrap_or(DEFAULT_MAX_TIME),
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn max_time(&self) -> u32 {
        self.max_time
    }

    /// Validates a single run: every category in range, elapsed time
    /// within the course limit.
    pub fn validate(&self, score: &RescueScore) -> std::result::Result<(), ValidationError> {
        score.inner().validate()?;
        let time = score.time();
        if time > self.max_time {
            return Err(ValidationError::TimeOverMax {
                time,
                max: self.max_time,
            });
        }
        Ok(())
    }
}

impl Ruleset for RescueRuleset {
    type Score = RescueScore;

    fn create_score(&self) -> RescueScore {
        RescueScore(CatScore::blank(Arc::clone(&self.schema)))
    }

    fn decode(&self, data: &[u8]) -> std::result::Result<RescueScore, CodecError> {
        Ok(RescueScore(CatScore::decode(
            Arc::clone(&self.schema),
            data,
        )?))
    }

    fn encode(&self, score: &RescueScore) -> std::result::Result<Vec<u8>, CodecError> {
        score.inner().encode()
    }
}
