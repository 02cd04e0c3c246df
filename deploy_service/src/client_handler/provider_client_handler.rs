use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use provider_api::{DeployRequest, StatusResponse, AUTH_DATA_HEADER, SERVICE_NAME_PARAM};
use reqwest::Client;

use crate::managers::deploy_client::{DeployClient, DeployClientError};
use crate::managers::wallet::Wallet;

/// HTTP implementation of the deploy client. Every request is signed with
/// the wallet keypair and authenticated through the `SS58AuthData` header.
pub struct ProviderClientHandler {
    client: Client,
    wallet: Arc<dyn Wallet + Send + Sync>,
}

impl ProviderClientHandler {
    pub fn new(
        wallet: Arc<dyn Wallet + Send + Sync>,
        request_timeout: Duration,
    ) -> Result<Self, DeployClientError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| DeployClientError::Transport(err.to_string()))?;
        Ok(Self { client, wallet })
    }

    fn auth_data(&self) -> Result<String, DeployClientError> {
        let keypair = self
            .wallet
            .signing_keypair()
            .map_err(|err| DeployClientError::Signing(err.to_string()))?;
        Ok(keypair.auth_data())
    }
}

#[async_trait]
impl DeployClient for ProviderClientHandler {
    async fn submit_deploy(
        &self,
        request: &DeployRequest,
        provider_url: &str,
    ) -> Result<(), DeployClientError> {
        let response = self
            .client
            .post(provider_url)
            .header(AUTH_DATA_HEADER, self.auth_data()?)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                error!("Deploy submission transport error: {}", err);
                DeployClientError::Transport(err.to_string())
            })?;
        if !response.status().is_success() {
            error!("Deploy submission rejected: {}", response.status());
            return Err(DeployClientError::Rejected(response.status().to_string()));
        }
        Ok(())
    }

    async fn query_status(
        &self,
        status_url: &str,
        services: &[String],
    ) -> Result<StatusResponse, DeployClientError> {
        let query: Vec<(&str, &str)> = services
            .iter()
            .map(|service| (SERVICE_NAME_PARAM, service.as_str()))
            .collect();
        let response = self
            .client
            .get(status_url)
            .query(&query)
            .header(AUTH_DATA_HEADER, self.auth_data()?)
            .send()
            .await
            .map_err(|err| DeployClientError::Transport(err.to_string()))?;
        if !response.status().is_success() {
            return Err(DeployClientError::Rejected(response.status().to_string()));
        }
        response
            .json::<StatusResponse>()
            .await
            .map_err(|err| DeployClientError::Transport(err.to_string()))
    }
}
