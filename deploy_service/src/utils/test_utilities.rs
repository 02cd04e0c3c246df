use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mockall::mock;
use p384::ecdsa::SigningKey;
use provider_api::{DeployRequest, StatusResponse};

use crate::managers::account::{Account, AccountError, AccountReader};
use crate::managers::application::{Application, ApplicationId, ApplicationStatus};
use crate::managers::deploy_client::{DeployClient, DeployClientError};
use crate::managers::deployment::{
    DeployParameter, DeploymentConfig, InitializationConfig, NetworkConfig,
};
use crate::managers::peer_link::{PeerLink, PeerLinkError};
use crate::managers::peer_network::{LinkSetting, PeerNetwork, PeerNetworkError, ProviderLink};
use crate::managers::wallet::{SigningKeypair, Wallet, WalletError};
use crate::storage::application_repository::{ApplicationRepository, RepositoryError};
use crate::storage::parameter_store::{ParameterStore, ParameterStoreError};

pub const EXAMPLE_APPLICATION_ID: ApplicationId = 7;

pub fn create_example_application() -> Application {
    Application {
        id: EXAMPLE_APPLICATION_ID,
        status: ApplicationStatus::WaitResource,
        forwarding_port: 8642,
    }
}

pub fn create_example_account() -> Account {
    Account {
        address: String::from("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
        peer_id: Some(String::from(
            "12D3KooWEyoppNCUx8Yx66oV9fJnriXwCcXwDDUA2kj6vnc6iDEp",
        )),
    }
}

pub fn create_example_deploy_parameter() -> DeployParameter {
    DeployParameter {
        initialization: InitializationConfig {
            account_mnemonic: String::from("gown tube bus kidney screen snack enact rhythm"),
        },
        deployment: NetworkConfig {
            ethereum_url: String::from("https://rinkeby.infura.io/v3/key"),
            indexer_address: String::from("0x95cED938F7991cd0dFcb48F0a06a40FA1aF46EBC"),
            node_ethereum_url: String::from("https://mainnet.infura.io/v3/key"),
            ethereum_network: String::from("rinkeby"),
        },
    }
}

pub fn create_example_deploy_parameter_json() -> String {
    serde_json::to_string(&create_example_deploy_parameter()).unwrap()
}

pub fn create_example_deploy_request() -> DeployRequest {
    create_example_deploy_parameter().to_deploy_request(EXAMPLE_APPLICATION_ID)
}

pub fn create_example_config() -> DeploymentConfig {
    DeploymentConfig::default()
}

pub fn create_example_signing_keypair() -> SigningKeypair {
    let key = SigningKey::from_slice(&[0x42; 48]).unwrap();
    SigningKeypair::new(create_example_account().address, key)
}

/// Plain in-memory parameter store for round-trip tests.
#[derive(Default)]
pub struct InMemoryParameterStore {
    values: Mutex<HashMap<String, String>>,
}

impl ParameterStore for InMemoryParameterStore {
    fn get(&self, key: &str) -> Result<String, ParameterStoreError> {
        self.values
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| ParameterStoreError::Missing(String::from(key)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ParameterStoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(String::from(key), String::from(value));
        Ok(())
    }
}

mock! {
    pub AccountReader {}

    #[async_trait]
    impl AccountReader for AccountReader {
        async fn account(&self) -> Result<Account, AccountError>;
    }
}

mock! {
    pub ApplicationRepository {}

    #[async_trait]
    impl ApplicationRepository for ApplicationRepository {
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
}

mock! {
    pub ParameterStore {}

    impl ParameterStore for ParameterStore {
        fn get(&self, key: &str) -> Result<String, ParameterStoreError>;
        fn set(&self, key: &str, value: &str) -> Result<(), ParameterStoreError>;
    }
}

mock! {
    pub PeerLink {}

    #[async_trait]
    impl PeerLink for PeerLink {
        async fn ensure_link(&self, peer_id: &str) -> Result<(), PeerLinkError>;
        async fn close_all(&self);
    }
}

mock! {
    pub PeerNetwork {}

    #[async_trait]
    impl PeerNetwork for PeerNetwork {
        async fn setting(&self) -> Result<LinkSetting, PeerNetworkError>;
        async fn init_setting(&self) -> Result<(), PeerNetworkError>;
        async fn provider_links(&self) -> Vec<ProviderLink>;
        async fn close(&self, target_address: &str) -> Result<(), PeerNetworkError>;
        async fn open_link(&self, peer_id: &str) -> Result<(), PeerNetworkError>;
    }
}

mock! {
    pub DeployClient {}

    #[async_trait]
    impl DeployClient for DeployClient {
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
}

mock! {
    pub Wallet {}

    impl Wallet for Wallet {
        fn signing_keypair(&self) -> Result<SigningKeypair, WalletError>;
    }
}
