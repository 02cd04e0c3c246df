use thiserror::Error;

use crate::managers::application::ApplicationId;

#[derive(Error, Debug, PartialEq, PartialOrd, Clone)]
pub enum ParameterStoreError {
    #[error("No value stored under key: '{0}'")]
    Missing(String),
    #[error("Parameter store operation failed: {0}")]
    Backend(String),
}

/// Secure key-value store holding per-deployment configuration blobs.
pub trait ParameterStore {
    fn get(&self, key: &str) -> Result<String, ParameterStoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ParameterStoreError>;
}

/// Store key of an application's deployment parameters.
pub fn deploy_info_key(id: ApplicationId) -> String {
    format!("graph_{}", id)
}
