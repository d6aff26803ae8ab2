//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Wallet session errors.
///
/// Every variant leaves the session in a recoverable state. Nothing is
/// retried internally; callers re-invoke `connect()` when they want to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No injected wallet provider is present.
    #[error("Wallet provider unavailable")]
    ProviderUnavailable,

    /// The user declined the account access request.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The provider granted access but returned an empty address list.
    #[error("Provider returned no accounts")]
    NoAccountsReturned,

    /// A `clear()` or a newer `connect()` landed while this request was pending.
    #[error("Connect superseded by a newer session change")]
    Superseded,

    /// A signer was requested while the session is disconnected.
    #[error("Not connected")]
    NotConnected,

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

impl WalletError {
    /// Providers report a declined request as "user rejected"; it maps to
    /// `PermissionDenied`.
    pub fn user_rejected(reason: impl Into<String>) -> Self {
        WalletError::PermissionDenied(reason.into())
    }
}
