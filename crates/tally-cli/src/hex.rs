//! Hex string helpers for stored score blobs.

use anyhow::{bail, Result};

/// Decodes a hex string, ignoring whitespace between byte pairs.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16)
                .map_err(|_| anyhow::anyhow!("invalid hex byte at position {}", i / 2))
        })
        .collect()
}

pub fn encode(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}
