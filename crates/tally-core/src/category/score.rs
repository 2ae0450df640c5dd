use std::sync::Arc;

use crate::category::{AttemptOutcome, AttemptTally, CatValue, CategoryDef, CategoryKind};
use crate::codec::ByteReader;
use crate::error::{CodecError, Error, Result, ValidationError};

/// The ordered, immutable category list of one score shape.
///
/// All instances of a shape share one schema; encode and decode walk the
/// categories in exactly this order.
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    categories: Vec<CategoryDef>,
}

impl Schema {
    pub fn new(name: &'static str, categories: Vec<CategoryDef>) -> Self {
        debug_assert!(
            {
                let mut names: Vec<_> = categories.iter().map(|c| c.name).collect();
                names.sort_unstable();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "duplicate category name in schema {}",
            name
        );
        Self { name, categories }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }
}

/// A composed score: one value per schema category, defaults for anything
/// not explicitly set.
#[derive(Debug, Clone)]
pub struct CatScore {
    schema: Arc<Schema>,
    values: Vec<CatValue>,
}

impl CatScore {
    /// Creates a blank score with every category at its default.
    pub fn blank(schema: Arc<Schema>) -> Self {
        let values = schema.categories().iter().map(|c| c.default_value()).collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&CatValue> {
        let idx = self.schema.index_of(name)?;
        self.values.get(idx)
    }

    pub fn set_count(&mut self, name: &str, value: i64) -> Result<()> {
        self.set(name, CatValue::Count(value))
    }

    pub fn set_outcome(&mut self, name: &str, value: AttemptOutcome) -> Result<()> {
        self.set(name, CatValue::Outcome(value))
    }

    pub fn set_tally(&mut self, name: &str, value: AttemptTally) -> Result<()> {
        self.set(name, CatValue::Tally(value))
    }

    fn set(&mut self, name: &str, value: CatValue) -> Result<()> {
        let idx = self
            .schema
            .index_of(name)
            .ok_or_else(|| Error::UnknownCategory(name.to_string()))?;
        let kind = self.schema.categories()[idx].kind;
        let matches = matches!(
            (kind, &value),
            (CategoryKind::Counter { .. }, CatValue::Count(_))
                | (CategoryKind::Bounded { .. }, CatValue::Count(_))
                | (CategoryKind::Outcome { .. }, CatValue::Outcome(_))
                | (CategoryKind::Tally, CatValue::Tally(_))
        );
        if !matches {
            return Err(Error::CategoryKindMismatch(name.to_string()));
        }
        self.values[idx] = value;
        Ok(())
    }

    /// Decodes an encoded blob against the schema, category by category in
    /// declared order, rejecting any trailing bytes.
    pub fn decode(schema: Arc<Schema>, data: &[u8]) -> std::result::Result<Self, CodecError> {
        let mut r = ByteReader::new(data);
        let mut values = Vec::with_capacity(schema.len());
        for cat in schema.categories() {
            values.push(cat.decode(&mut r)?);
        }
        r.finish()?;
        Ok(Self { schema, values })
    }

    /// Encodes every category in declared order.
    pub fn encode(&self) -> std::result::Result<Vec<u8>, CodecError> {
        let mut dest = Vec::new();
        for (cat, value) in self.schema.categories().iter().zip(&self.values) {
            cat.encode(&mut dest, value)?;
        }
        Ok(dest)
    }

    /// Validates every category; the first failure carries the category
    /// name and offending value.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (cat, value) in self.schema.categories().iter().zip(&self.values) {
            cat.validate(value)?;
        }
        Ok(())
    }

    /// Point total over the categories tagged as scored.
    pub fn points(&self) -> u32 {
        self.schema
            .categories()
            .iter()
            .zip(&self.values)
            .map(|(cat, value)| cat.points(value))
            .sum()
    }
}

/// Category-wise equality: same shape name and identical values in order.
impl PartialEq for CatScore {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}

impl Eq for CatScore {}
