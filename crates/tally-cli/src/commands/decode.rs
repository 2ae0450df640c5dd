//! Decode command: inspect one encoded score.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tally_core::{AnyRuleset, AnyScore, CatScore, CatValue};

use crate::hex;

pub fn run(spec: &str, hex_data: &str) -> Result<()> {
    let ruleset = AnyRuleset::from_spec(spec)?;
    let data = hex::decode(hex_data)?;
    let score = ruleset
        .decode(&data)
        .with_context(|| format!("failed to decode {} bytes as {}", data.len(), spec))?;

    println!("{}", score.to_string().bold());

    match &score {
        AnyScore::Sumo(s) => {
            for (i, round) in s.rounds.iter().enumerate() {
                println!("  round {:<2} {} ({}p)", i + 1, round, round.points());
            }
        }
        AnyScore::Rescue(s) => print_categories(s.inner()),
        AnyScore::Judged(s) => print_categories(s.inner()),
    }

    if let Some(problem) = validation_problem(&ruleset, &score) {
        println!("{} {}", "invalid:".red(), problem);
    }

    Ok(())
}

fn print_categories(score: &CatScore) {
    for cat in score.schema().categories() {
        let Some(value) = score.get(cat.name) else {
            continue;
        };
        let formatted = match value {
            CatValue::Count(v) => v.to_string(),
            CatValue::Outcome(o) => o.to_string(),
            CatValue::Tally(t) => {
                format!("{}x1 {}x2 {}xF", t.on_first, t.on_retry, t.fail)
            }
        };
        println!("  {:<20} {:>6}", cat.name, formatted);
    }
}

/// Single-score validation where the ruleset supports it; match scores
/// are only checkable as a pair.
fn validation_problem(ruleset: &AnyRuleset, score: &AnyScore) -> Option<String> {
    let result = match (ruleset, score) {
        (AnyRuleset::Rescue(r), AnyScore::Rescue(s)) => r.validate(s),
        (AnyRuleset::Judged(r), AnyScore::Judged(s)) => r.validate(s),
        _ => return None,
    };
    result.err().map(|e| e.to_string())
}
