use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

/// Result of a single-attempt obstacle category.
///
/// The wire byte doubles as the enum discriminant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum AttemptOutcome {
    #[default]
    #[strum(serialize = "F")]
    Fail = 0,
    /// Succeeded on the retry; scores half weight.
    #[strum(serialize = "2")]
    RetrySuccess = 1,
    /// Succeeded on the first attempt; scores full weight.
    #[strum(serialize = "1")]
    FirstSuccess = 2,
}

impl AttemptOutcome {
    pub fn from_wire(byte: u8) -> Option<Self> {
        Self::from_repr(byte)
    }

    pub fn wire(self) -> u8 {
        self as u8
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Occurrence counts per outcome for a repeatable obstacle category.
///
/// Wire layout is three raw bytes: `[fail, on_retry, on_first]`, capping
/// each count at 255.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptTally {
    pub fail: u8,
    pub on_retry: u8,
    pub on_first: u8,
}

impl AttemptTally {
    pub fn new(fail: u8, on_retry: u8, on_first: u8) -> Self {
        Self {
            fail,
            on_retry,
            on_first,
        }
    }

    /// Total attempts recorded, successful or not.
    pub fn attempts(&self) -> u32 {
        u32::from(self.fail) + u32::from(self.on_retry) + u32::from(self.on_first)
    }

    /// Points contribution at the given weight: full weight per
    /// first-attempt success, half weight per retry success.
    pub fn points(&self, weight: u32) -> u32 {
        u32::from(self.on_first) * weight + u32::from(self.on_retry) * (weight / 2)
    }
}

/// Current value of one category inside a composed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatValue {
    Count(i64),
    Outcome(AttemptOutcome),
    Tally(AttemptTally),
}

impl CatValue {
    pub fn as_count(&self) -> Option<i64> {
        match self {
            Self::Count(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_outcome(&self) -> Option<AttemptOutcome> {
        match self {
            Self::Outcome(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_tally(&self) -> Option<AttemptTally> {
        match self {
            Self::Tally(v) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_mapping() {
        assert_eq!(AttemptOutcome::from_wire(0), Some(AttemptOutcome::Fail));
        assert_eq!(
            AttemptOutcome::from_wire(1),
            Some(AttemptOutcome::RetrySuccess)
        );
        assert_eq!(
            AttemptOutcome::from_wire(2),
            Some(AttemptOutcome::FirstSuccess)
        );
        assert_eq!(AttemptOutcome::from_wire(3), None);
    }

    #[test]
    fn test_tally_points_halves_retries() {
        let tally = AttemptTally::new(1, 3, 2);
        // 2 full successes at 10 plus 3 retries at 5
        assert_eq!(tally.points(10), 35);
        assert_eq!(tally.attempts(), 6);
    }

    #[test]
    fn test_tally_points_zero() {
        assert_eq!(AttemptTally::default().points(20), 0);
    }
}
