use crate::category::{AttemptOutcome, AttemptTally, CatValue};
use crate::codec::{self, ByteReader};
use crate::error::{CodecError, ValidationError};

/// Codec variant of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Fixed-width big-endian integer of `len` bytes.
    Counter { len: usize, signed: bool },
    /// One-byte enumerated attempt outcome (fail / retry / first).
    Outcome { retryable: bool },
    /// Three-byte repeatable-attempt tally `[fail, on_retry, on_first]`.
    Tally,
    /// One-byte additive judged category with a per-category maximum.
    Bounded { max: u8 },
}

/// Immutable descriptor of one scored field.
///
/// `scored` tags the categories that contribute to the point total;
/// metadata fields such as elapsed time carry `scored = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDef {
    pub name: &'static str,
    pub kind: CategoryKind,
    pub weight: u32,
    pub scored: bool,
}

impl CategoryDef {
    pub const fn counter(name: &'static str, len: usize, signed: bool) -> Self {
        Self {
            name,
            kind: CategoryKind::Counter { len, signed },
            weight: 0,
            scored: false,
        }
    }

    pub const fn outcome(name: &'static str, weight: u32, retryable: bool) -> Self {
        Self {
            name,
            kind: CategoryKind::Outcome { retryable },
            weight,
            scored: true,
        }
    }

    pub const fn tally(name: &'static str, weight: u32) -> Self {
        Self {
            name,
            kind: CategoryKind::Tally,
            weight,
            scored: true,
        }
    }

    pub const fn bounded(name: &'static str, max: u8) -> Self {
        Self {
            name,
            kind: CategoryKind::Bounded { max },
            weight: 0,
            scored: true,
        }
    }

    pub fn default_value(&self) -> CatValue {
        match self.kind {
            CategoryKind::Counter { .. } | CategoryKind::Bounded { .. } => CatValue::Count(0),
            CategoryKind::Outcome { .. } => CatValue::Outcome(AttemptOutcome::Fail),
            CategoryKind::Tally => CatValue::Tally(AttemptTally::default()),
        }
    }

    pub fn decode(&self, r: &mut ByteReader<'_>) -> Result<CatValue, CodecError> {
        match self.kind {
            CategoryKind::Counter { len, signed } => {
                Ok(CatValue::Count(r.read_int_be(len, signed)?))
            }
            CategoryKind::Outcome { .. } => {
                let byte = r.read_u8()?;
                let outcome = AttemptOutcome::from_wire(byte).ok_or(CodecError::UnmappedByte {
                    what: self.name,
                    byte,
                })?;
                Ok(CatValue::Outcome(outcome))
            }
            CategoryKind::Tally => {
                let bytes = r.read_bytes(3)?;
                Ok(CatValue::Tally(AttemptTally::new(
                    bytes[0], bytes[1], bytes[2],
                )))
            }
            CategoryKind::Bounded { .. } => Ok(CatValue::Count(i64::from(r.read_u8()?))),
        }
    }

    pub fn encode(&self, dest: &mut Vec<u8>, value: &CatValue) -> Result<(), CodecError> {
        match (self.kind, value) {
            (CategoryKind::Counter { len, signed }, CatValue::Count(v)) => {
                codec::write_int_be(dest, *v, len, signed)
            }
            (CategoryKind::Outcome { .. }, CatValue::Outcome(v)) => {
                dest.push(v.wire());
                Ok(())
            }
            (CategoryKind::Tally, CatValue::Tally(v)) => {
                dest.extend_from_slice(&[v.fail, v.on_retry, v.on_first]);
                Ok(())
            }
            (CategoryKind::Bounded { .. }, CatValue::Count(v)) => {
                codec::write_int_be(dest, *v, 1, false)
            }
            _ => Err(CodecError::KindMismatch {
                category: self.name,
            }),
        }
    }

    pub fn validate(&self, value: &CatValue) -> Result<(), ValidationError> {
        match (self.kind, value) {
            (CategoryKind::Counter { len, signed }, CatValue::Count(v)) => {
                if !signed && *v < 0 {
                    return Err(self.invalid(format!("negative value: {}", v)));
                }
                if !codec::int_fits(*v, len, signed) {
                    return Err(self.invalid(format!("value {} out of range", v)));
                }
                Ok(())
            }
            (CategoryKind::Outcome { retryable }, CatValue::Outcome(v)) => {
                if *v == AttemptOutcome::RetrySuccess && !retryable {
                    return Err(self.invalid("retry success in non-retryable category".into()));
                }
                Ok(())
            }
            (CategoryKind::Tally, CatValue::Tally(_)) => Ok(()),
            (CategoryKind::Bounded { max }, CatValue::Count(v)) => {
                if *v < 0 {
                    return Err(self.invalid(format!("negative score: {}", v)));
                }
                if *v > i64::from(max) {
                    return Err(self.invalid(format!("score exceeds max: {} > {}", v, max)));
                }
                Ok(())
            }
            _ => Err(self.invalid("value kind does not match category".into())),
        }
    }

    /// Points this category contributes at its current value.
    pub fn points(&self, value: &CatValue) -> u32 {
        if !self.scored {
            return 0;
        }
        match (self.kind, value) {
            (CategoryKind::Outcome { .. }, CatValue::Outcome(v)) => match v {
                AttemptOutcome::Fail => 0,
                AttemptOutcome::RetrySuccess => self.weight / 2,
                AttemptOutcome::FirstSuccess => self.weight,
            },
            (CategoryKind::Tally, CatValue::Tally(v)) => v.points(self.weight),
            (CategoryKind::Bounded { .. }, CatValue::Count(v)) => (*v).max(0) as u32,
            _ => 0,
        }
    }

    fn invalid(&self, message: String) -> ValidationError {
        ValidationError::Category {
            category: self.name,
            message,
        }
    }
}
