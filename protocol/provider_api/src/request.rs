use serde::{Deserialize, Serialize};

/// Body of the deploy submission sent to a provider's forwarded endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub mnemonic: String,
    pub id: u64,
    pub ethereum_url: String,
    pub indexer_address: String,
    pub node_ethereum_url: String,
    pub ethereum_network: String,
}
