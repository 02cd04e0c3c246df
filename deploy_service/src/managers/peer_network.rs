use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, PartialOrd)]
pub enum PeerNetworkError {
    #[error("No link configuration present: {0}")]
    SettingMissing(String),
    #[error("Can't initialize link configuration: {0}")]
    SettingInitFail(String),
    #[error("Can't open link to peer: {0}")]
    OpenLinkFail(String),
    #[error("Can't close link: {0}")]
    CloseLinkFail(String),
}

/// A live forwarding path to a provider peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderLink {
    pub peer_id: String,
    pub target_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LinkSetting {
    pub listen_address: String,
}

/// Peer-to-peer subsystem boundary.
#[async_trait]
pub trait PeerNetwork {
    async fn setting(&self) -> Result<LinkSetting, PeerNetworkError>;
    async fn init_setting(&self) -> Result<(), PeerNetworkError>;
    async fn provider_links(&self) -> Vec<ProviderLink>;
    async fn close(&self, target_address: &str) -> Result<(), PeerNetworkError>;
    async fn open_link(&self, peer_id: &str) -> Result<(), PeerNetworkError>;
}
