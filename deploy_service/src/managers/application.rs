use serde::{Deserialize, Serialize};

pub type ApplicationId = u64;

/// Persisted lifecycle states of a deployable graph node. `Deployed` and
/// `DeployFailed` are terminal; a record never leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum ApplicationStatus {
    WaitResource,
    InDeployment,
    Deployed,
    DeployFailed,
}

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Deployed | ApplicationStatus::DeployFailed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
    pub forwarding_port: u16,
}
