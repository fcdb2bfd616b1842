//! Engine error kinds (spec §7). Only the kinds that must be surfaced to
//! the caller get a variant here — `DegenerateShape` and
//! `NoPathForSegment` are recovered internally and never reach this type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no road graph available for anchor ({lat}, {lon}): {reason}")]
    GraphUnavailable { lat: f64, lon: f64, reason: String },

    #[error("route construction produced no nodes")]
    EmptyRoute,
}
