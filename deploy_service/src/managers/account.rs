use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, PartialOrd)]
pub enum AccountError {
    #[error("Can't read the current account: {0}")]
    Unavailable(String),
}

/// The locally configured account. `peer_id` stays empty until the account
/// is admitted to the provider network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Account {
    pub address: String,
    pub peer_id: Option<String>,
}

#[async_trait]
pub trait AccountReader {
    async fn account(&self) -> Result<Account, AccountError>;
}
