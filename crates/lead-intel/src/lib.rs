//! Evidence-based product matching, ICP fit scoring, lead qualification and
//! similar-company discovery.
//!
//! The engines are pure functions over caller-supplied data; nothing here
//! performs I/O except the optional Apollo CSV import and the HTTP router.

pub mod config;
pub mod discovery;
pub mod error;
pub mod fit;
pub mod matching;
pub mod model;
pub mod qualification;
pub mod router;
pub mod telemetry;

pub use router::engine_router;
