//! HTTP API layer.
//!
//! Translates inbound requests into agent calls and agent envelopes back to
//! JSON. Task faults never surface as transport errors; only an unavailable
//! agent (failed construction) maps to 503.

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
