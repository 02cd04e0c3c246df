use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::managers::application::{Application, ApplicationId, ApplicationStatus};

#[derive(Error, Debug, PartialEq, PartialOrd, Clone, Serialize, Deserialize)]
pub enum RepositoryError {
    #[error("Application with id: '{0}' doesn't exist.")]
    NotFound(ApplicationId),
    #[error("Can't update application record: {0}")]
    UpdateFail(String),
}

/// Persisted view of applications. Status writes are single-field updates;
/// `update_status_if` only writes while the stored status still matches
/// `expected` and reports whether the guard held.
#[async_trait]
pub trait ApplicationRepository {
    async fn application(&self, id: ApplicationId) -> Result<Application, RepositoryError>;
    async fn update_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError>;
    async fn update_status_if(
        &self,
        id: ApplicationId,
        expected: ApplicationStatus,
        status: ApplicationStatus,
    ) -> Result<bool, RepositoryError>;
}
