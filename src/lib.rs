//! GPS-art route synthesis engine: generates a road-network route whose
//! trace approximates a freehand drawing while hitting a target distance.
//! See SPEC_FULL.md for the full module breakdown.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod orientation;
pub mod projection;
pub mod route;
pub mod router;
pub mod shape;
pub mod types;
pub mod utils;

pub use engine::{DrawingRequest, GpsArtEngine};
pub use error::EngineError;
pub use route::FinalizedRoute;
