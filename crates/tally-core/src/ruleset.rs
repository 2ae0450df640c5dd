//! The ruleset abstraction and the runtime-selected ruleset wrapper.

use crate::error::{CodecError, Error, Result};
use crate::rules::judged::{JudgedRuleset, JudgedScore};
use crate::rules::rescue::{RescueRuleset, RescueScore};
use crate::rules::sumo::{SumoRuleset, SumoScore};

/// A scoring discipline: knows its score type, how to create a blank one,
/// and how to move scores to and from the wire.
///
/// `decode` must consume the input exactly; implementations reject both
/// truncated and over-long blobs.
pub trait Ruleset {
    type Score;

    fn create_score(&self) -> Self::Score;

    fn decode(&self, data: &[u8]) -> std::result::Result<Self::Score, CodecError>;

    fn encode(&self, score: &Self::Score) -> std::result::Result<Vec<u8>, CodecError>;
}

/// A ruleset selected at runtime, e.g. from a stored block definition.
#[derive(Debug, Clone)]
pub enum AnyRuleset {
    Sumo(SumoRuleset),
    Rescue(RescueRuleset),
    Judged(JudgedRuleset),
}

/// A score decoded through [`AnyRuleset`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnyScore {
    Sumo(SumoScore),
    Rescue(RescueScore),
    Judged(JudgedScore),
}

impl AnyRuleset {
    /// Resolves a ruleset name as stored in tournament data.
    ///
    /// Recognized names: `sumo`, `sumo-bouts`, `rescue1` to `rescue3`
    /// (optionally `rescueN:max_time`), `interview` and `performance`.
    pub fn from_spec(spec: &str) -> Result<Self> {
        match spec {
            "sumo" => return Ok(Self::Sumo(SumoRuleset::simple())),
            "sumo-bouts" => return Ok(Self::Sumo(SumoRuleset::bouts())),
            "interview" => return Ok(Self::Judged(JudgedRuleset::interview())),
            "performance" => return Ok(Self::Judged(JudgedRuleset::performance())),
            _ => {}
        }

        if let Some(rest) = spec.strip_prefix("rescue") {
            let (tier, max_time) = match rest.split_once(':') {
                Some((tier, max)) => {
                    let max = max
                        .parse::<u32>()
                        .map_err(|_| Error::UnknownRuleset(spec.to_string()))?;
                    (tier, Some(max))
                }
                None => (rest, None),
            };
            let tier = tier
                .parse::<u8>()
                .map_err(|_| Error::UnknownRuleset(spec.to_string()))?;
            return RescueRuleset::by_difficulty(tier, max_time).map(Self::Rescue);
        }

        Err(Error::UnknownRuleset(spec.to_string()))
    }

    pub fn create_score(&self) -> AnyScore {
        match self {
            Self::Sumo(r) => AnyScore::Sumo(r.create_score()),
            Self::Rescue(r) => AnyScore::Rescue(r.create_score()),
            Self::Judged(r) => AnyScore::Judged(r.create_score()),
        }
    }

    pub fn decode(&self, data: &[u8]) -> std::result::Result<AnyScore, CodecError> {
        match self {
            Self::Sumo(r) => r.decode(data).map(AnyScore::Sumo),
            Self::Rescue(r) => r.decode(data).map(AnyScore::Rescue),
            Self::Judged(r) => r.decode(data).map(AnyScore::Judged),
        }
    }

    pub fn encode(&self, score: &AnyScore) -> Result<Vec<u8>> {
        match (self, score) {
            (Self::Sumo(r), AnyScore::Sumo(s)) => Ok(r.encode(s)?),
            (Self::Rescue(r), AnyScore::Rescue(s)) => Ok(r.encode(s)?),
            (Self::Judged(r), AnyScore::Judged(s)) => Ok(r.encode(s)?),
            _ => Err(Error::ScoreShapeMismatch {
                expected: self.kind_name(),
            }),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Sumo(_) => "sumo",
            Self::Rescue(_) => "rescue",
            Self::Judged(_) => "judged",
        }
    }
}

impl AnyScore {
    pub fn into_sumo(self) -> Result<SumoScore> {
        match self {
            Self::Sumo(s) => Ok(s),
            _ => Err(Error::ScoreShapeMismatch { expected: "sumo" }),
        }
    }

    pub fn into_rescue(self) -> Result<RescueScore> {
        match self {
            Self::Rescue(s) => Ok(s),
            _ => Err(Error::ScoreShapeMismatch { expected: "rescue" }),
        }
    }

    pub fn into_judged(self) -> Result<JudgedScore> {
        match self {
            Self::Judged(s) => Ok(s),
            _ => Err(Error::ScoreShapeMismatch { expected: "judged" }),
        }
    }
}

impl std::fmt::Display for AnyScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sumo(s) => write!(f, "{}", s),
            Self::Rescue(s) => write!(f, "{}", s),
            Self::Judged(s) => write!(f, "{}", s),
        }
    }
}
