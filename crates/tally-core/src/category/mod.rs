//! Category primitives and the composed score built from them.
//!
//! This module contains the building blocks every score shape is assembled
//! from:
//! - `CategoryKind`, `CategoryDef` - fixed-width codecs for a single scored
//!   field (counters, enumerated attempt outcomes, repeatable-attempt
//!   tallies, bounded point categories)
//! - `Schema` - the ordered, immutable category list of one score shape
//! - `CatScore` - a score instance holding one value per schema category
//!
//! Schemas are defined once at ruleset construction and never mutated;
//! encode and decode always walk the categories in schema order.

mod def;
mod score;
mod value;

pub use def::*;
pub use score::*;
pub use value::*;
