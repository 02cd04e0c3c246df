use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use super::peer_link::{PeerLink, PeerLinkError};
use super::peer_network::PeerNetwork;

pub struct PeerLinkHandler {
    network: Arc<dyn PeerNetwork + Send + Sync>,
}

impl PeerLinkHandler {
    pub fn new(network: Arc<dyn PeerNetwork + Send + Sync>) -> Self {
        Self { network }
    }
}

#[async_trait]
impl PeerLink for PeerLinkHandler {
    async fn ensure_link(&self, peer_id: &str) -> Result<(), PeerLinkError> {
        if self.network.setting().await.is_err() {
            self.network
                .init_setting()
                .await
                .map_err(|err| PeerLinkError::SettingInit(err.to_string()))?;
        }
        self.close_all().await;
        info!("Opening provider link to peer: '{}'.", peer_id);
        self.network
            .open_link(peer_id)
            .await
            .map_err(|err| PeerLinkError::Link(err.to_string()))
    }

    async fn close_all(&self) {
        for link in self.network.provider_links().await {
            // Closing is best-effort per link; a dead link can't block the
            // next deployment attempt.
            if let Err(err) = self.network.close(&link.target_address).await {
                warn!("Closing link to: '{}' failed: {}", link.target_address, err);
            }
        }
    }
}
