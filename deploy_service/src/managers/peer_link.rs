use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, PartialOrd)]
pub enum PeerLinkError {
    #[error("Can't initialize link settings: {0}")]
    SettingInit(String),
    #[error("Can't establish link to provider peer: {0}")]
    Link(String),
}

/// Owner of the account's outbound deployment link. An account never holds
/// two deployment links at once, so `ensure_link` tears every active link
/// down before opening the new one.
#[async_trait]
pub trait PeerLink {
    async fn ensure_link(&self, peer_id: &str) -> Result<(), PeerLinkError>;
    async fn close_all(&self);
}
