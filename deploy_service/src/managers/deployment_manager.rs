use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use provider_api::DeployRequest;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::account::AccountReader;
use super::application::{Application, ApplicationId, ApplicationStatus};
use super::deploy_client::{DeployClient, StatusResult};
use super::deployment::{
    DeployParameter, Deployment, DeploymentConfig, DeploymentError, StartOutcome,
};
use super::peer_link::PeerLink;
use super::status_poller::{probe_status, StatusPoller};
use crate::storage::application_repository::{ApplicationRepository, RepositoryError};
use crate::storage::parameter_store::{deploy_info_key, ParameterStore};

pub struct DeploymentManager {
    accounts: Arc<dyn AccountReader + Send + Sync>,
    peer_link: Arc<dyn PeerLink + Send + Sync>,
    parameters: Arc<dyn ParameterStore + Send + Sync>,
    repository: Arc<dyn ApplicationRepository + Send + Sync>,
    client: Arc<dyn DeployClient + Send + Sync>,
    config: DeploymentConfig,
    pollers: Arc<Mutex<HashMap<ApplicationId, CancellationToken>>>,
}

impl DeploymentManager {
    pub fn new(
        accounts: Arc<dyn AccountReader + Send + Sync>,
        peer_link: Arc<dyn PeerLink + Send + Sync>,
        parameters: Arc<dyn ParameterStore + Send + Sync>,
        repository: Arc<dyn ApplicationRepository + Send + Sync>,
        client: Arc<dyn DeployClient + Send + Sync>,
        config: DeploymentConfig,
    ) -> Self {
        Self {
            accounts,
            peer_link,
            parameters,
            repository,
            client,
            config,
            pollers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn application(&self, id: ApplicationId) -> Result<Application, DeploymentError> {
        self.repository.application(id).await.map_err(|err| match err {
            RepositoryError::NotFound(id) => DeploymentError::ApplicationMissing(id),
            err => DeploymentError::Persistence(err.to_string()),
        })
    }

    fn load_parameter(&self, id: ApplicationId) -> Result<DeployParameter, DeploymentError> {
        let json = self
            .parameters
            .get(&deploy_info_key(id))
            .map_err(|err| DeploymentError::ParameterLoad(err.to_string()))?;
        serde_json::from_str(&json).map_err(|err| DeploymentError::ParameterLoad(err.to_string()))
    }

    async fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), DeploymentError> {
        self.repository
            .update_status(id, status)
            .await
            .map_err(|err| DeploymentError::Persistence(err.to_string()))
    }

    async fn submit_and_watch(
        &self,
        application: &Application,
        request: &DeployRequest,
    ) -> Result<(), DeploymentError> {
        let provider_url = self.config.endpoints.deploy_url(application.forwarding_port);
        info!(
            "Submitting deployment of application: '{}' to: {}",
            application.id, provider_url
        );
        self.client.submit_deploy(request, &provider_url).await?;
        self.set_status(application.id, ApplicationStatus::InDeployment)
            .await?;
        self.spawn_status_poller(application.id).await;
        Ok(())
    }

    /// One supervised poller per application id; a fresh deployment attempt
    /// cancels the poller still watching the previous one.
    async fn spawn_status_poller(&self, id: ApplicationId) {
        let token = CancellationToken::new();
        if let Some(previous) = self.pollers.lock().await.insert(id, token.clone()) {
            warn!(
                "Cancelling status poller left over from a previous deployment of application: '{}'.",
                id
            );
            previous.cancel();
        }
        let poller = StatusPoller::new(
            id,
            self.repository.clone(),
            self.client.clone(),
            self.config.clone(),
        );
        tokio::spawn(async move { poller.run(token).await });
    }
}

#[async_trait]
impl Deployment for DeploymentManager {
    async fn start_deployment(
        &mut self,
        id: ApplicationId,
        deploy_config_json: Option<&str>,
    ) -> Result<StartOutcome, DeploymentError> {
        let account = self
            .accounts
            .account()
            .await
            .map_err(|err| DeploymentError::Account(err.to_string()))?;
        let Some(peer_id) = account.peer_id.filter(|peer_id| !peer_id.is_empty()) else {
            info!(
                "Account has no peer identity yet; deferring deployment of application: '{}'.",
                id
            );
            self.set_status(id, ApplicationStatus::WaitResource).await?;
            return Ok(StartOutcome::Deferred);
        };
        self.peer_link.ensure_link(&peer_id).await?;
        if let Some(json) = deploy_config_json {
            self.save_deploy_info(id, json)?;
        }
        let parameter = self.load_parameter(id)?;
        let application = self.application(id).await?;
        let request = parameter.to_deploy_request(id);
        self.submit_and_watch(&application, &request).await?;
        Ok(StartOutcome::Started)
    }

    async fn submit_prepared_deploy(
        &mut self,
        id: ApplicationId,
        request: DeployRequest,
    ) -> Result<(), DeploymentError> {
        let application = self.application(id).await?;
        self.submit_and_watch(&application, &request).await
    }

    fn save_deploy_info(&self, id: ApplicationId, json: &str) -> Result<(), DeploymentError> {
        let _: DeployParameter = serde_json::from_str(json)
            .map_err(|err| DeploymentError::ParameterSave(err.to_string()))?;
        self.parameters
            .set(&deploy_info_key(id), json)
            .map_err(|err| DeploymentError::ParameterSave(err.to_string()))
    }

    fn get_deploy_info(&self, id: ApplicationId) -> Result<DeployParameter, DeploymentError> {
        self.load_parameter(id)
    }

    async fn query_deployment_status(
        &self,
        id: ApplicationId,
        services: &[String],
    ) -> StatusResult {
        let services = if services.is_empty() {
            self.config.services.as_slice()
        } else {
            services
        };
        probe_status(
            self.repository.as_ref(),
            self.client.as_ref(),
            &self.config,
            id,
            services,
        )
        .await
    }
}
