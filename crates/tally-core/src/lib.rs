pub mod category;
pub mod codec;
pub mod error;
pub mod rules;
pub mod ruleset;
pub mod standings;
pub mod tournament;

pub use category::{
    AttemptOutcome, AttemptTally, CatScore, CatValue, CategoryDef, CategoryKind, Schema,
};
pub use codec::ByteReader;
pub use error::{CodecError, Error, Result, ValidationError};
pub use rules::judged::{JudgedMaxRank, JudgedRuleset, JudgedScore};
pub use rules::rescue::{RescueMaxRank, RescueRuleset, RescueScore, DEFAULT_MAX_TIME};
pub use rules::sumo::{
    calc_results, derive_result, RoundFormat, SumoPointsRank, SumoRank, SumoResult, SumoRound,
    SumoRuleset, SumoScore, SumoWinsRank,
};
pub use ruleset::{AnyRuleset, AnyScore, Ruleset};
pub use standings::{
    aggregate_scores, apply_tiebreaks, combine_ranks, competition_ranking, sort_ranking, weighted,
    MaxRank, RankValue, TieBroken, WeightedRank,
};
pub use tournament::{
    decode_scores, Block, Ranking, ScoreStore, Standings, StandingsEntry, TeamId, Tournament,
};
