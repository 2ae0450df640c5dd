//! The concrete rule families: head-to-head matches, rescue courses and
//! judged performances.

pub mod judged;
pub mod rescue;
pub mod sumo;
