//! Wallet session — provider abstraction, session states, reducer.
//!
//! ## Lifecycle
//!
//! - A [`WalletSessionService`] is created empty at application start and
//!   passed to whoever needs the active address or signer.
//! - `connect()` asks the injected provider for account access. The first
//!   returned address becomes the session; the provider's account-change
//!   stream is subscribed once and keeps the session in sync afterwards.
//! - `clear()` resets to [`WalletSession::Disconnected`] and disposes the
//!   account-change subscription. Nothing is persisted.
//!
//! ## Ordering
//!
//! Every `connect()` start and every `clear()` bumps a session epoch. A pending
//! `connect()` only applies its result if the epoch is unchanged when the
//! provider answers, so a cleared session is never resurrected by a late
//! completion. Account-change notifications are tied to the subscription that
//! delivered them and are dropped once that subscription is disposed. An
//! empty account list (locked wallet) clears the session but keeps the
//! subscription, so unlocking reconnects without a new prompt.

pub mod service;
pub mod signer;
pub mod subscription;

pub use service::{WalletSessionService, WalletSessionServiceBuilder};
pub use signer::WalletSigner;
pub use subscription::Subscription;

use crate::error::WalletError;
use crate::shared::Address;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::stream::Stream;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

/// Stream of account lists pushed by the provider when the user switches
/// accounts. An empty list means the wallet was locked or disconnected.
pub type AccountsStream = Pin<Box<dyn Stream<Item = Vec<Address>> + Send>>;

// ─── Provider ────────────────────────────────────────────────────────────────

/// An injected external wallet (browser extension, embedded wallet, …).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Human-readable provider name, used in logs.
    fn name(&self) -> &str {
        "injected"
    }

    /// Ask the user for account access. May wait on a user prompt.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Subscribe to account-change notifications.
    ///
    /// Notifications are only delivered while the returned stream is alive.
    fn accounts_changed(&self) -> AccountsStream;

    /// Sign an arbitrary message with `address`.
    async fn sign_message(&self, address: &Address, message: &[u8])
        -> Result<Vec<u8>, WalletError>;
}

/// Shared handle to the injected provider.
pub type ProviderHandle = Arc<dyn WalletProvider>;

// ─── Session ─────────────────────────────────────────────────────────────────

/// The connected half of the session tuple.
#[derive(Clone)]
pub struct ConnectedSession {
    pub address: Address,
    pub provider: ProviderHandle,
    pub signer: WalletSigner,
    pub connected_at: DateTime<Utc>,
}

/// Current wallet session: either empty or a full `{address, provider, signer}`.
#[derive(Clone, Default)]
pub enum WalletSession {
    #[default]
    Disconnected,
    Connected(ConnectedSession),
}

impl WalletSession {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletSession::Connected(_))
    }

    pub fn address(&self) -> Option<&Address> {
        match self {
            WalletSession::Connected(s) => Some(&s.address),
            WalletSession::Disconnected => None,
        }
    }

    pub fn provider(&self) -> Option<&ProviderHandle> {
        match self {
            WalletSession::Connected(s) => Some(&s.provider),
            WalletSession::Disconnected => None,
        }
    }

    pub fn signer(&self) -> Option<&WalletSigner> {
        match self {
            WalletSession::Connected(s) => Some(&s.signer),
            WalletSession::Disconnected => None,
        }
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletSession::Disconnected => write!(f, "Disconnected"),
            WalletSession::Connected(s) => f
                .debug_struct("Connected")
                .field("address", &s.address)
                .field("provider", &s.provider.name())
                .field("connected_at", &s.connected_at)
                .finish(),
        }
    }
}

// ─── Reducer ─────────────────────────────────────────────────────────────────

/// The only two ways a session changes.
#[derive(Clone)]
pub enum SessionCommand {
    Connect {
        address: Address,
        provider: ProviderHandle,
        signer: WalletSigner,
    },
    Clear,
}

impl SessionCommand {
    /// `Connect` with a signer bound to `provider` for `address`.
    pub fn connect(address: Address, provider: ProviderHandle) -> Self {
        let signer = WalletSigner::new(Arc::clone(&provider), address.clone());
        SessionCommand::Connect {
            address,
            provider,
            signer,
        }
    }
}

/// Apply a command to a session.
pub fn reduce(_state: WalletSession, command: SessionCommand) -> WalletSession {
    match command {
        SessionCommand::Connect {
            address,
            provider,
            signer,
        } => {
            WalletSession::Connected(ConnectedSession {
                address,
                provider,
                signer,
                connected_at: Utc::now(),
            })
        }
        SessionCommand::Clear => WalletSession::Disconnected,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use parking_lot::Mutex;
    use tokio::sync::{mpsc, oneshot};

    /// How a mock provider answers `request_accounts`.
    pub enum Answer {
        Accounts(Vec<Address>),
        Fail(WalletError),
        /// Wait for the test to resolve it.
        Deferred(oneshot::Receiver<Result<Vec<Address>, WalletError>>),
    }

    #[derive(Default)]
    pub struct MockProvider {
        answers: Mutex<Vec<Answer>>,
        listeners: Mutex<Vec<mpsc::UnboundedSender<Vec<Address>>>>,
        sign_refusal: Mutex<Option<WalletError>>,
        pub requests: Mutex<usize>,
    }

    impl MockProvider {
        pub fn answering(answers: Vec<Answer>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into_iter().rev().collect()),
                ..Default::default()
            })
        }

        pub fn with_accounts(accounts: &[&str]) -> Arc<Self> {
            Self::answering(vec![Answer::Accounts(
                accounts.iter().map(|a| Address::from(*a)).collect(),
            )])
        }

        /// Make every `sign_message` call fail with `error`.
        pub fn refuse_signing(&self, error: WalletError) {
            *self.sign_refusal.lock() = Some(error);
        }

        pub fn push_answer(&self, answer: Answer) {
            self.answers.lock().insert(0, answer);
        }

        /// Emit an account change; returns how many live listeners got it.
        pub fn emit(&self, accounts: &[&str]) -> usize {
            let accounts: Vec<Address> = accounts.iter().map(|a| Address::from(*a)).collect();
            let mut listeners = self.listeners.lock();
            listeners.retain(|tx| tx.send(accounts.clone()).is_ok());
            listeners.len()
        }

        pub fn listener_count(&self) -> usize {
            let mut listeners = self.listeners.lock();
            listeners.retain(|tx| !tx.is_closed());
            listeners.len()
        }
    }

    #[async_trait]
    impl WalletProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
            *self.requests.lock() += 1;
            let answer = self.answers.lock().pop();
            match answer {
                Some(Answer::Accounts(accounts)) => Ok(accounts),
                Some(Answer::Fail(e)) => Err(e),
                Some(Answer::Deferred(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(WalletError::Provider("mock dropped".into()))),
                None => Err(WalletError::ProviderUnavailable),
            }
        }

        fn accounts_changed(&self) -> AccountsStream {
            let (tx, rx) = mpsc::unbounded_channel();
            self.listeners.lock().push(tx);
            Box::pin(futures_util::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|accounts| (accounts, rx))
            }))
        }

        async fn sign_message(
            &self,
            address: &Address,
            message: &[u8],
        ) -> Result<Vec<u8>, WalletError> {
            if let Some(error) = self.sign_refusal.lock().clone() {
                return Err(error);
            }
            let mut sig = address.as_str().as_bytes().to_vec();
            sig.extend_from_slice(message);
            Ok(sig)
        }
    }
}
