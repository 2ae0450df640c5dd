//! Judged performance rulesets.
//!
//! A judged score is a list of bounded point categories, one byte each on
//! the wire, summed directly into the point total. Categories are laid out
//! in name order so the wire format does not depend on how a scoring sheet
//! groups them.

use std::sync::Arc;

use crate::category::{CatScore, CategoryDef, CategoryKind, Schema};
use crate::error::{CodecError, Result, ValidationError};
use crate::ruleset::Ruleset;
use crate::standings::{MaxRank, RankValue};

/// Technical interview categories, 2019 season. 30 points total.
const INTERVIEW_2019: &[(&str, u8)] = &[
    ("esip_esiintyminen", 3),
    ("esip_yleis", 2),
    ("ohty_oma", 2),
    ("ohty_selitys", 2),
    ("ohty_tjako", 1),
    ("ohty_vaikeus", 5),
    ("sntk_sensorit", 3),
    ("suun_dokumentointi", 3),
    ("suun_oma", 5),
    ("suun_tasapaino", 2),
    ("suun_vaikeus", 2),
];

/// Stage performance categories, 2019 season. 50 points total.
const PERFORMANCE_2019: &[(&str, u8)] = &[
    ("hvps_pisteet", 5),
    ("ktro_osallistuminen", 3),
    ("ktro_rekvisiitta", 3),
    ("ktro_sommittelu", 3),
    ("ktro_tehosteet", 3),
    ("ltvs_aika", 2),
    ("ltvs_aloitukset", 2),
    ("ltvs_kosketukset", 3),
    ("ltvs_toiminta", 2),
    ("rkek_liikkuminen", 3),
    ("rkek_sopivuus", 3),
    ("rkek_vaikeus", 3),
    ("rstk_alue", 3),
    ("rstk_toimivuus", 2),
    ("rvsj_hallinta", 3),
    ("rvsj_ulkoasu_esitys", 3),
    ("rvsj_vaihtelevuus", 4),
];

fn judged_schema(name: &'static str, table: &[(&'static str, u8)]) -> Schema {
    Schema::new(
        name,
        table
            .iter()
            .map(|&(cat, max)| CategoryDef::bounded(cat, max))
            .collect(),
    )
}

/// One performance as scored by a judge.
///
/// Equality and ordering both go by the point total alone, so
/// performances with the same total tie regardless of the per-category
/// breakdown; compare [`inner`](Self::inner) scores category-wise.
#[derive(Debug, Clone)]
pub struct JudgedScore(CatScore);

impl JudgedScore {
    pub fn points(&self) -> u32 {
        self.0.points()
    }

    pub fn set(&mut self, name: &str, value: u8) -> Result<()> {
        self.0.set_count(name, i64::from(value))
    }

    pub fn inner(&self) -> &CatScore {
        &self.0
    }
}

impl PartialEq for JudgedScore {
    fn eq(&self, other: &Self) -> bool {
        self.points() == other.points()
    }
}

impl Eq for JudgedScore {}

impl PartialOrd for JudgedScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JudgedScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.points().cmp(&other.points())
    }
}

impl RankValue for JudgedScore {
    fn value(&self) -> i64 {
        i64::from(self.points())
    }
}

impl std::fmt::Display for JudgedScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}p", self.points())
    }
}

/// Best performance over a team's attempts.
pub type JudgedMaxRank = MaxRank<JudgedScore>;

/// Judged ruleset: additive bounded categories in a fixed order.
#[derive(Debug, Clone)]
pub struct JudgedRuleset {
    schema: Arc<Schema>,
}

impl JudgedRuleset {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    /// Technical interview, 2019 season.
    pub fn interview() -> Self {
        Self::new(judged_schema("interview", INTERVIEW_2019))
    }

    /// Stage performance, 2019 season.
    pub fn performance() -> Self {
        Self::new(judged_schema("performance", PERFORMANCE_2019))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Maximum attainable point total.
    pub fn max_points(&self) -> u32 {
        self.schema
            .categories()
            .iter()
            .map(|c| match c.kind {
                CategoryKind::Bounded { max } => u32::from(max),
                _ => 0,
            })
            .sum()
    }

    /// Validates that every category is within its own maximum.
    pub fn validate(&self, score: &JudgedScore) -> std::result::Result<(), ValidationError> {
        score.inner().validate()
    }
}

impl Ruleset for JudgedRuleset {
    type Score = JudgedScore;

    fn create_score(&self) -> JudgedScore {
        JudgedScore(CatScore::blank(Arc::clone(&self.schema)))
    }

    fn decode(&self, data: &[u8]) -> std::result::Result<JudgedScore, CodecError> {
        Ok(JudgedScore(CatScore::decode(
            Arc::clone(&self.schema),
            data,
        )?))
    }

    fn encode(&self, score: &JudgedScore) -> std::result::Result<Vec<u8>, CodecError> {
        score.inner().encode()
    }
}
