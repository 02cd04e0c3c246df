use std::time::Duration;

use async_trait::async_trait;
use provider_api::{DeployRequest, DEPLOYMENT_SERVICES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::application::ApplicationId;
use super::deploy_client::{DeployClientError, StatusResult};
use super::peer_link::PeerLinkError;

#[derive(Error, Debug, PartialEq, PartialOrd)]
pub enum DeploymentError {
    #[error("Application with id: '{0}' doesn't exist.")]
    ApplicationMissing(ApplicationId),
    #[error("Can't resolve the deploying account: {0}")]
    Account(String),
    #[error("Can't set up the provider link: {0}")]
    PeerSetup(#[from] PeerLinkError),
    #[error("Can't load deployment parameters: {0}")]
    ParameterLoad(String),
    #[error("Can't store deployment parameters: {0}")]
    ParameterSave(String),
    #[error("Deploy submission failed: {0}")]
    Submission(#[from] DeployClientError),
    #[error("Can't persist application status: {0}")]
    Persistence(String),
}

/// How a deployment request was taken: deferred until the account gains a
/// peer identity, or submitted to the provider with a status poller running.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum StartOutcome {
    Deferred,
    Started,
}

/// Configuration blob stored per deployment under the `graph_{id}` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployParameter {
    pub initialization: InitializationConfig,
    pub deployment: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationConfig {
    pub account_mnemonic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub ethereum_url: String,
    pub indexer_address: String,
    pub node_ethereum_url: String,
    pub ethereum_network: String,
}

impl DeployParameter {
    /// Submission body for this parameter set and application.
    pub fn to_deploy_request(&self, id: ApplicationId) -> DeployRequest {
        DeployRequest {
            mnemonic: self.initialization.account_mnemonic.clone(),
            id,
            ethereum_url: self.deployment.ethereum_url.clone(),
            indexer_address: self.deployment.indexer_address.clone(),
            node_ethereum_url: self.deployment.node_ethereum_url.clone(),
            ethereum_network: self.deployment.ethereum_network.clone(),
        }
    }
}

/// Deploy and status endpoints reached through an application's forwarded
/// port. The provider link forwards the remote HTTP service to a local
/// port, so the host stays loopback.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEndpoints {
    pub host: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
        }
    }
}

impl ProviderEndpoints {
    pub fn deploy_url(&self, forwarding_port: u16) -> String {
        format!(
            "http://{}:{}/api/v1/thegraph/deploy",
            self.host, forwarding_port
        )
    }

    pub fn status_url(&self, forwarding_port: u16) -> String {
        format!(
            "http://{}:{}/api/v1/thegraph/status",
            self.host, forwarding_port
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentConfig {
    pub endpoints: ProviderEndpoints,
    pub status_poll_interval: Duration,
    pub status_failure_threshold: u32,
    pub services: Vec<String>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            endpoints: ProviderEndpoints::default(),
            status_poll_interval: Duration::from_secs(10),
            status_failure_threshold: 3,
            services: DEPLOYMENT_SERVICES
                .iter()
                .map(|service| String::from(*service))
                .collect(),
        }
    }
}

#[async_trait]
pub trait Deployment {
    async fn start_deployment(
        &mut self,
        id: ApplicationId,
        deploy_config_json: Option<&str>,
    ) -> Result<StartOutcome, DeploymentError>;
    async fn submit_prepared_deploy(
        &mut self,
        id: ApplicationId,
        request: DeployRequest,
    ) -> Result<(), DeploymentError>;
    fn save_deploy_info(&self, id: ApplicationId, json: &str) -> Result<(), DeploymentError>;
    fn get_deploy_info(&self, id: ApplicationId) -> Result<DeployParameter, DeploymentError>;
    async fn query_deployment_status(
        &self,
        id: ApplicationId,
        services: &[String],
    ) -> StatusResult;
}

#[cfg(test)]
mod test {
    use super::ProviderEndpoints;

    #[test]
    fn urls_are_derived_from_the_forwarding_port() {
        let endpoints = ProviderEndpoints::default();
        assert_eq!(
            endpoints.deploy_url(8642),
            "http://127.0.0.1:8642/api/v1/thegraph/deploy"
        );
        assert_eq!(
            endpoints.status_url(8642),
            "http://127.0.0.1:8642/api/v1/thegraph/status"
        );
    }
}
