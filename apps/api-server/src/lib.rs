// [apps/api-server/src/lib.rs]
//! HTTP surface binding the blob store, version chain, device parser,
//! summary projector, analysis job controller, and topology store into
//! the stable REST contract `spec.md` §4.8 describes.
//!
//! The binary in `main.rs` is a thin bootstrap; everything wireable is
//! public here so integration tests can build an [`AppState`] and a
//! [`routes::build_router`] Router directly against an in-memory
//! database without going through a real process.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rbac;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
