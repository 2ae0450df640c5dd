//! Head-to-head match ruleset.
//!
//! A score belongs to one of the two competitors in a match and carries the
//! overall result plus a list of per-round records. Two round formats exist:
//! - simple rounds: a "reached the arena first" flag plus a win/tie/loss
//!   outcome (first is worth one bonus point, outcomes score 3/1/0)
//! - bout rounds: a list of short sub-contest values summed per side
//!
//! Validation is always pairwise: a single match score cannot be judged
//! consistent on its own.

use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

use crate::codec::ByteReader;
use crate::error::{CodecError, ValidationError};
use crate::ruleset::Ruleset;
use crate::standings::RankValue;

/// Overall or per-round match result. The wire byte is the ASCII letter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRepr, IntoStaticStr,
)]
#[repr(u8)]
pub enum SumoResult {
    #[strum(serialize = "L")]
    Lose = b'L',
    #[strum(serialize = "T")]
    Tie = b'T',
    #[strum(serialize = "W")]
    Win = b'W',
}

impl SumoResult {
    pub fn from_wire(byte: u8) -> Option<Self> {
        Self::from_repr(byte)
    }

    pub fn wire(self) -> u8 {
        self as u8
    }

    /// Total opposite mapping: a win on one side is a loss on the other,
    /// a tie stays a tie.
    pub fn opposite(self) -> Self {
        match self {
            Self::Lose => Self::Win,
            Self::Tie => Self::Tie,
            Self::Win => Self::Lose,
        }
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for SumoResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// One round record, as seen from one competitor's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SumoRound {
    /// Line-following duel round: whether this side reached the arena
    /// first, and the round outcome.
    Simple { first: bool, outcome: SumoResult },
    /// Repeated short bouts; each entry is this side's bout value.
    Bouts(Vec<u8>),
}

impl SumoRound {
    pub fn points(&self) -> u32 {
        match self {
            Self::Simple { first, outcome } => {
                let outcome_points = match outcome {
                    SumoResult::Lose => 0,
                    SumoResult::Tie => 1,
                    SumoResult::Win => 3,
                };
                u32::from(*first) + outcome_points
            }
            Self::Bouts(values) => values.iter().map(|&v| u32::from(v)).sum(),
        }
    }
}

impl std::fmt::Display for SumoRound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple { first, outcome } => {
                if *first {
                    write!(f, "*{}", outcome)
                } else {
                    write!(f, "{}", outcome)
                }
            }
            Self::Bouts(_) => write!(f, "{}", self.points()),
        }
    }
}

/// One competitor's score for a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumoScore {
    /// Overall stated result; `None` until recorded or derived via
    /// [`calc_results`].
    pub result: Option<SumoResult>,
    pub rounds: Vec<SumoRound>,
}

impl SumoScore {
    pub fn new(result: Option<SumoResult>, rounds: Vec<SumoRound>) -> Self {
        Self { result, rounds }
    }

    /// Total points over all rounds.
    pub fn points(&self) -> u32 {
        self.rounds.iter().map(SumoRound::points).sum()
    }
}

impl std::fmt::Display for SumoScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.result {
            Some(result) => write!(f, "{}", result)?,
            None => write!(f, "?")?,
        }
        for round in &self.rounds {
            write!(f, "|{}", round.points())?;
        }
        Ok(())
    }
}

/// Result derived from the two sides' point totals: higher total wins,
/// equal totals tie.
pub fn derive_result(own_points: u32, other_points: u32) -> SumoResult {
    match own_points.cmp(&other_points) {
        std::cmp::Ordering::Greater => SumoResult::Win,
        std::cmp::Ordering::Less => SumoResult::Lose,
        std::cmp::Ordering::Equal => SumoResult::Tie,
    }
}

/// Sets both sides' stated results from their point totals.
pub fn calc_results(s1: &mut SumoScore, s2: &mut SumoScore) {
    let result = derive_result(s1.points(), s2.points());
    s1.result = Some(result);
    s2.result = Some(result.opposite());
}

/// Round sub-format a [`SumoRuleset`] decodes and validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundFormat {
    Simple,
    Bouts,
}

/// Head-to-head match ruleset.
///
/// Wire format: `[result:1][num_rounds:1]{round}*` where a simple round is
/// `[first:1][outcome:1]` and a bout round is `[count:1]{value:1}*count`.
#[derive(Debug, Clone, Copy)]
pub struct SumoRuleset {
    format: RoundFormat,
}

impl SumoRuleset {
    pub fn new(format: RoundFormat) -> Self {
        Self { format }
    }

    pub fn simple() -> Self {
        Self::new(RoundFormat::Simple)
    }

    pub fn bouts() -> Self {
        Self::new(RoundFormat::Bouts)
    }

    pub fn format(&self) -> RoundFormat {
        self.format
    }

    fn decode_round(&self, r: &mut ByteReader<'_>) -> Result<SumoRound, CodecError> {
        match self.format {
            RoundFormat::Simple => {
                let first = r.read_u8()? != 0;
                let byte = r.read_u8()?;
                let outcome = SumoResult::from_wire(byte).ok_or(CodecError::UnmappedByte {
                    what: "round outcome",
                    byte,
                })?;
                Ok(SumoRound::Simple { first, outcome })
            }
            RoundFormat::Bouts => {
                let count = r.read_u8()? as usize;
                Ok(SumoRound::Bouts(r.read_bytes(count)?.to_vec()))
            }
        }
    }

    fn encode_round(dest: &mut Vec<u8>, round: &SumoRound) -> Result<(), CodecError> {
        match round {
            SumoRound::Simple { first, outcome } => {
                dest.push(u8::from(*first));
                dest.push(outcome.wire());
            }
            SumoRound::Bouts(values) => {
                let count = u8::try_from(values.len()).map_err(|_| CodecError::LengthOverflow {
                    what: "bout",
                    len: values.len(),
                })?;
                dest.push(count);
                dest.extend_from_slice(values);
            }
        }
        Ok(())
    }

    /// Validates the two sides of one match together.
    ///
    /// Checks that both stated results are present and literal opposites,
    /// that the result derived from the point totals matches the stated one,
    /// that the round lists are the same length, and that every round pair
    /// has an allowed shape.
    pub fn validate_pair(
        &self,
        s1: &SumoScore,
        s2: &SumoScore,
    ) -> Result<(), ValidationError> {
        let (Some(r1), Some(r2)) = (s1.result, s2.result) else {
            return Err(ValidationError::ResultNotSet);
        };

        if r1 != r2.opposite() {
            return Err(ValidationError::ConflictingResults(format!(
                "({}, {})",
                r1, r2
            )));
        }

        let (p1, p2) = (s1.points(), s2.points());
        if r1 != derive_result(p1, p2) {
            return Err(ValidationError::ConflictingScores(format!(
                "({}, {}) with totals ({}, {})",
                r1, r2, p1, p2
            )));
        }

        if s1.rounds.len() != s2.rounds.len() {
            return Err(ValidationError::RoundCountMismatch(
                s1.rounds.len(),
                s2.rounds.len(),
            ));
        }

        for (round1, round2) in s1.rounds.iter().zip(&s2.rounds) {
            self.validate_rounds(round1, round2)?;
        }

        Ok(())
    }

    fn validate_rounds(&self, r1: &SumoRound, r2: &SumoRound) -> Result<(), ValidationError> {
        match (r1, r2) {
            (
                SumoRound::Simple {
                    first: f1,
                    outcome: o1,
                },
                SumoRound::Simple {
                    first: f2,
                    outcome: o2,
                },
            ) => {
                if *f1 && *f2 {
                    return Err(ValidationError::InvalidRound("both marked first".into()));
                }
                if *f1 || *f2 {
                    // One side reached the arena, so the round scores like a
                    // normal duel; a double loss is still possible.
                    if !simple_outcomes_valid(*o1, *o2) {
                        return Err(ValidationError::InvalidRound(format!(
                            "invalid outcomes ({}, {})",
                            o1, o2
                        )));
                    }
                } else if *o1 != SumoResult::Lose || *o2 != SumoResult::Lose {
                    // Neither side reached the arena: only L-L is acceptable.
                    return Err(ValidationError::InvalidRound(format!(
                        "expected L-L, got ({}, {})",
                        o1, o2
                    )));
                }
                Ok(())
            }
            (SumoRound::Bouts(v1), SumoRound::Bouts(v2)) => {
                if v1.len() != v2.len() {
                    return Err(ValidationError::InvalidRound(format!(
                        "bout count mismatch: {} != {}",
                        v1.len(),
                        v2.len()
                    )));
                }
                for (&b1, &b2) in v1.iter().zip(v2) {
                    if !bout_pair_valid(b1, b2) {
                        return Err(ValidationError::InvalidRound(format!(
                            "invalid bout values ({}, {})",
                            b1, b2
                        )));
                    }
                }
                Ok(())
            }
            _ => Err(ValidationError::InvalidRound(
                "mixed round formats".into(),
            )),
        }
    }
}

fn simple_outcomes_valid(o1: SumoResult, o2: SumoResult) -> bool {
    if o1 == SumoResult::Lose && o2 == SumoResult::Lose {
        return true;
    }
    o1 == o2.opposite()
}

/// Bouts may only end 3-0, 1-0 or 2-2 (in either order).
fn bout_pair_valid(b1: u8, b2: u8) -> bool {
    let (hi, lo) = (b1.max(b2), b1.min(b2));
    matches!((hi, lo), (3, 0) | (1, 0) | (2, 2))
}

impl Ruleset for SumoRuleset {
    type Score = SumoScore;

    fn create_score(&self) -> SumoScore {
        SumoScore::default()
    }

    fn decode(&self, data: &[u8]) -> Result<SumoScore, CodecError> {
        let mut r = ByteReader::new(data);
        let byte = r.read_u8()?;
        let result = SumoResult::from_wire(byte).ok_or(CodecError::UnmappedByte {
            what: "match result",
            byte,
        })?;
        let num_rounds = r.read_u8()? as usize;
        let mut rounds = Vec::with_capacity(num_rounds);
        for _ in 0..num_rounds {
            rounds.push(self.decode_round(&mut r)?);
        }
        r.finish()?;
        Ok(SumoScore::new(Some(result), rounds))
    }

    fn encode(&self, score: &SumoScore) -> Result<Vec<u8>, CodecError> {
        let result = score.result.ok_or(CodecError::ResultNotSet)?;
        let num_rounds =
            u8::try_from(score.rounds.len()).map_err(|_| CodecError::LengthOverflow {
                what: "round",
                len: score.rounds.len(),
            })?;

        let mut dest = vec![result.wire(), num_rounds];
        for round in &score.rounds {
            Self::encode_round(&mut dest, round)?;
        }
        Ok(dest)
    }
}

/// Win/tie/loss tallies and the point total over a team's matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumoRank {
    pub points: u32,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub unplayed: u32,
}

impl SumoRank {
    pub fn from_scores(scores: &[Option<SumoScore>]) -> Self {
        let mut rank = Self::default();
        for score in scores {
            match score {
                None => rank.unplayed += 1,
                Some(s) => {
                    rank.points += s.points();
                    match s.result {
                        Some(SumoResult::Win) => rank.wins += 1,
                        Some(SumoResult::Tie) => rank.ties += 1,
                        // An unset result counts as nothing; validation
                        // rejects such pairs before ranking.
                        Some(SumoResult::Lose) | None => rank.losses += 1,
                    }
                }
            }
        }
        rank
    }

    pub fn played(&self) -> u32 {
        self.wins + self.ties + self.losses
    }
}

impl std::fmt::Display for SumoRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}/{}/{}/{})",
            self.points, self.wins, self.ties, self.losses, self.unplayed
        )
    }
}

/// Rank flavor ordered by total points alone.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SumoPointsRank(pub SumoRank);

impl SumoPointsRank {
    pub fn from_scores(scores: &[Option<SumoScore>]) -> Self {
        Self(SumoRank::from_scores(scores))
    }
}

impl PartialEq for SumoPointsRank {
    fn eq(&self, other: &Self) -> bool {
        self.0.points == other.0.points
    }
}

impl Eq for SumoPointsRank {}

impl PartialOrd for SumoPointsRank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SumoPointsRank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.points.cmp(&other.0.points)
    }
}

impl RankValue for SumoPointsRank {
    fn value(&self) -> i64 {
        i64::from(self.0.points)
    }
}

impl std::fmt::Display for SumoPointsRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rank flavor ordered by win count, then tie count.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SumoWinsRank(pub SumoRank);

impl SumoWinsRank {
    pub fn from_scores(scores: &[Option<SumoScore>]) -> Self {
        Self(SumoRank::from_scores(scores))
    }
}

impl PartialEq for SumoWinsRank {
    fn eq(&self, other: &Self) -> bool {
        self.0.wins == other.0.wins && self.0.ties == other.0.ties
    }
}

impl Eq for SumoWinsRank {}

impl PartialOrd for SumoWinsRank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SumoWinsRank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .wins
            .cmp(&other.0.wins)
            .then_with(|| self.0.ties.cmp(&other.0.ties))
    }
}

impl RankValue for SumoWinsRank {
    fn value(&self) -> i64 {
        i64::from(self.0.wins)
    }
}

impl std::fmt::Display for SumoWinsRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
