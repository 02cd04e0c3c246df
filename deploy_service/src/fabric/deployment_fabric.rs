use std::sync::Arc;
use std::time::Duration;

use crate::client_handler::provider_client_handler::ProviderClientHandler;
use crate::managers::account::AccountReader;
use crate::managers::deploy_client::DeployClientError;
use crate::managers::deployment::{Deployment, DeploymentConfig};
use crate::managers::deployment_manager::DeploymentManager;
use crate::managers::peer_link_handler::PeerLinkHandler;
use crate::managers::peer_network::PeerNetwork;
use crate::managers::wallet::Wallet;
use crate::storage::application_repository::ApplicationRepository;
use crate::storage::parameter_store::ParameterStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct DeploymentFabric {
    config: DeploymentConfig,
}

impl DeploymentFabric {
    pub fn new(config: DeploymentConfig) -> Self {
        Self { config }
    }

    /// Wires the deployment service over the host application's external
    /// collaborators.
    pub fn create_deployment(
        &self,
        accounts: Arc<dyn AccountReader + Send + Sync>,
        network: Arc<dyn PeerNetwork + Send + Sync>,
        wallet: Arc<dyn Wallet + Send + Sync>,
        parameters: Arc<dyn ParameterStore + Send + Sync>,
        repository: Arc<dyn ApplicationRepository + Send + Sync>,
    ) -> Result<Box<dyn Deployment + Send + Sync>, DeployClientError> {
        let client = ProviderClientHandler::new(wallet, REQUEST_TIMEOUT)?;
        Ok(Box::new(DeploymentManager::new(
            accounts,
            Arc::new(PeerLinkHandler::new(network)),
            parameters,
            repository,
            Arc::new(client),
            self.config.clone(),
        )))
    }
}
