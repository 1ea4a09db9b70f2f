// [libs/domain/ai-cortex/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("analysis kind {0:?} is device-scoped and requires a device_name")]
    MissingDeviceContext(meridian_domain_models::AnalysisKind),
    #[error("device_config_drift requires two raw config versions to compare, got {0}")]
    InsufficientDriftVersions(usize),
}
