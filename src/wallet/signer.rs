//! Signer bound to one provider + address.

use super::ProviderHandle;
use crate::error::WalletError;
use crate::shared::Address;
use std::fmt;
use std::sync::Arc;

/// Signs on behalf of the session address through the provider.
#[derive(Clone)]
pub struct WalletSigner {
    provider: ProviderHandle,
    address: Address,
}

impl WalletSigner {
    pub fn new(provider: ProviderHandle, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn provider(&self) -> &ProviderHandle {
        &self.provider
    }

    /// Raw signature bytes over `message`.
    pub async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, WalletError> {
        self.provider
            .sign_message(&self.address, message)
            .await
            .map_err(|e| {
                tracing::warn!(address = %self.address, "Signing failed: {}", e);
                match e {
                    WalletError::PermissionDenied(reason) => WalletError::SigningFailed(reason),
                    other => other,
                }
            })
    }

    /// Signature over a UTF-8 message, `0x`-prefixed hex.
    pub async fn sign_text(&self, text: &str) -> Result<String, WalletError> {
        let signature = self.sign_message(text.as_bytes()).await?;
        Ok(format!("0x{}", hex::encode(signature)))
    }

    /// Whether both signers act for the same provider and account.
    pub fn same_as(&self, other: &WalletSigner) -> bool {
        Arc::ptr_eq(&self.provider, &other.provider) && self.address.same_account(&other.address)
    }
}

impl fmt::Debug for WalletSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSigner")
            .field("address", &self.address)
            .field("provider", &self.provider.name())
            .finish()
    }
}
