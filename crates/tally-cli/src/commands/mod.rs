//! CLI command implementations.

pub mod blocks;
pub mod decode;
pub mod standings;
