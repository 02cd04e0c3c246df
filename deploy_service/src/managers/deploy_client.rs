use async_trait::async_trait;
use provider_api::{DeployRequest, StatusResponse, STATUS_HEALTHY};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, PartialOrd)]
pub enum DeployClientError {
    #[error("Can't reach the provider service: {0}")]
    Transport(String),
    #[error("Provider rejected the request: {0}")]
    Rejected(String),
    #[error("Can't sign the request: {0}")]
    Signing(String),
}

/// Outcome of one deployment status probe. `RequestFailed` marks probes
/// that never produced a remote verdict and must not count against the
/// deployment.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum StatusResult {
    Healthy,
    Unhealthy(i32),
    RequestFailed,
}

impl StatusResult {
    pub fn from_response(response: StatusResponse) -> Self {
        if response.result == STATUS_HEALTHY {
            StatusResult::Healthy
        } else {
            StatusResult::Unhealthy(response.result)
        }
    }
}

/// Authenticated calls against a provider's forwarded deploy and status
/// endpoints.
#[async_trait]
pub trait DeployClient {
    async fn submit_deploy(
        &self,
        request: &DeployRequest,
        provider_url: &str,
    ) -> Result<(), DeployClientError>;
    async fn query_status(
        &self,
        status_url: &str,
        services: &[String],
    ) -> Result<StatusResponse, DeployClientError>;
}

#[cfg(test)]
mod test {
    use parameterized::parameterized;
    use provider_api::StatusResponse;

    use super::StatusResult;

    #[test]
    fn healthy_code_maps_to_healthy() {
        assert_eq!(
            StatusResult::from_response(StatusResponse { result: 1 }),
            StatusResult::Healthy
        );
    }

    #[parameterized(code = {0, 2, -1})]
    fn other_codes_map_to_unhealthy(code: i32) {
        assert_eq!(
            StatusResult::from_response(StatusResponse { result: code }),
            StatusResult::Unhealthy(code)
        );
    }
}
