// [libs/infra/worker-client/src/lib.rs]
//! LLM adapter client: the [`LlmAdapter`] trait the analysis job
//! controller calls through, a reqwest-backed production implementation,
//! and a deterministic mock for tests.

pub mod client;
pub mod errors;
pub mod mock;

pub use client::{LlmAdapter, LlmResponse, ReqwestLlmAdapter};
pub use errors::ClientError;
pub use mock::MockLlmAdapter;
