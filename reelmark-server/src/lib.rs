//! # Reelmark Server
//!
//! HTTP surface for per-user playback progress, watch history, settings and
//! watch-party player status. Domain rules live in `reelmark-core`; this crate
//! wires them to axum routes, bearer-session auth and runtime configuration.

pub mod handlers;
pub mod infra;
pub mod routes;
pub mod users;

pub use infra::app_state::AppState;
