use p384::ecdsa::{signature::Signer, Signature, SigningKey};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, PartialOrd)]
pub enum WalletError {
    #[error("Can't obtain the wallet keypair: {0}")]
    KeypairUnavailable(String),
}

/// Keypair handed out by the wallet subsystem for request authentication.
pub struct SigningKeypair {
    address: String,
    key: SigningKey,
}

impl SigningKeypair {
    pub fn new(address: String, key: SigningKey) -> Self {
        Self { address, key }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Authentication header value: the account address joined with the
    /// hex-encoded signature over that address.
    pub fn auth_data(&self) -> String {
        let signature: Signature = self.key.sign(self.address.as_bytes());
        format!(
            "{}:{}",
            self.address,
            const_hex::encode(signature.to_der())
        )
    }
}

/// Wallet subsystem boundary; key management stays outside this crate.
pub trait Wallet {
    fn signing_keypair(&self) -> Result<SigningKeypair, WalletError>;
}
