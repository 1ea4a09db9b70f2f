// [libs/infra/worker-client/src/errors.rs]
//! Error catalog for LLM adapter calls. The job controller treats every
//! variant the same way: clear the in-flight marker and let polling
//! clients observe "no result yet" — see [`crate::client::LlmAdapter`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("LLM endpoint unreachable: {0}")]
    NetworkFault(#[from] reqwest::Error),

    #[error("LLM response failed to decode: {0}")]
    DecodingFault(#[from] serde_json::Error),

    #[error("LLM endpoint rejected the request: {0}")]
    ServerRejection(String),

    #[error("LLM call exceeded its timeout")]
    Timeout,

    #[error("adapter misconfigured: {0}")]
    Configuration(String),
}
