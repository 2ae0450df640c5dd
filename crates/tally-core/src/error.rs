use thiserror::Error;

/// Errors raised while decoding or encoding persisted score bytes.
///
/// A blob that fails to decode is treated as corrupt: the error is surfaced
/// to the caller immediately and never recovered or retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of data: needed {needed} more byte(s) at offset {offset}")]
    UnexpectedEnd { offset: usize, needed: usize },

    #[error("{remaining} trailing byte(s) left after decoding")]
    TrailingBytes { remaining: usize },

    #[error("unmapped byte {byte:#04x} for {what}")]
    UnmappedByte { what: &'static str, byte: u8 },

    #[error("value {value} does not fit in {len} byte(s)")]
    ValueTooWide { value: i64, len: usize },

    #[error("{what} count {len} exceeds the single-byte length prefix")]
    LengthOverflow { what: &'static str, len: usize },

    #[error("value kind does not match category {category}")]
    KindMismatch { category: &'static str },

    #[error("match result is not set, call calc_results first")]
    ResultNotSet,
}

/// Errors raised by score validation.
///
/// The score decoded fine but is semantically inconsistent. Callers decide
/// whether to reject the write or flag it for manual review; the core never
/// auto-corrects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid value for category {category}: {message}")]
    Category {
        category: &'static str,
        message: String,
    },

    #[error("elapsed time {time} exceeds maximum {max}")]
    TimeOverMax { time: u32, max: u32 },

    #[error("match result is not set, call calc_results first")]
    ResultNotSet,

    #[error("conflicting results: {0}")]
    ConflictingResults(String),

    #[error("conflicting scores: {0}")]
    ConflictingScores(String),

    #[error("inconsistent number of rounds ({0}, {1})")]
    RoundCountMismatch(usize, usize),

    #[error("invalid round: {0}")]
    InvalidRound(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("block not found: {0}")]
    BlockNotFound(String),

    #[error("ranking not found: {0}")]
    RankingNotFound(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("unknown ruleset: {0}")]
    UnknownRuleset(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("value kind does not match category {0}")]
    CategoryKindMismatch(String),

    #[error("score shape mismatch: expected a {expected} score")]
    ScoreShapeMismatch { expected: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
