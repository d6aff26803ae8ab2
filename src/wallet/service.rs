//! Wallet session service — connect, clear, account-change bridge.

use super::subscription::Subscription;
use super::{
    reduce, AccountsStream, ProviderHandle, SessionCommand, WalletProvider, WalletSession,
    WalletSigner,
};
use crate::error::WalletError;
use crate::shared::Address;

use futures_util::stream::Stream;
use futures_util::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

struct Inner {
    session: WalletSession,
    /// Bumped on every `connect()` start and every `clear()`.
    epoch: u64,
    subscription: Option<Subscription>,
    next_subscription_id: u64,
}

struct Shared {
    inner: Mutex<Inner>,
    changes: watch::Sender<WalletSession>,
}

impl Shared {
    fn apply(&self, inner: &mut Inner, command: SessionCommand) {
        let previous = std::mem::take(&mut inner.session);
        inner.session = reduce(previous, command);
        self.changes.send_replace(inner.session.clone());
    }

    fn on_accounts_changed(&self, subscription_id: u64, provider: &ProviderHandle, accounts: Vec<Address>) {
        let mut inner = self.inner.lock();

        let live = inner.subscription.as_ref().map(Subscription::id) == Some(subscription_id);
        if !live {
            tracing::debug!(subscription = subscription_id, "Ignoring account change from stale subscription");
            return;
        }

        match accounts.into_iter().next() {
            Some(address) => {
                tracing::info!(address = %address, "Wallet account changed");
                self.apply(&mut inner, SessionCommand::connect(address, Arc::clone(provider)));
            }
            None => {
                // Locked wallet: the subscription stays so an unlock reconnects.
                tracing::info!("Wallet reported no accounts, clearing session");
                inner.epoch += 1;
                self.apply(&mut inner, SessionCommand::Clear);
            }
        }
    }
}

/// The application-wide wallet session.
///
/// Cheap to clone; clones share the same session. Create one at startup and
/// pass it to the components that need the connected address or signer.
#[derive(Clone)]
pub struct WalletSessionService {
    provider: Option<ProviderHandle>,
    shared: Arc<Shared>,
}

impl WalletSessionService {
    pub fn builder() -> WalletSessionServiceBuilder {
        WalletSessionServiceBuilder::default()
    }

    /// A service bound to `provider`, or to nothing when no wallet is injected.
    pub fn new(provider: Option<ProviderHandle>) -> Self {
        let (changes, _) = watch::channel(WalletSession::Disconnected);
        Self {
            provider,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    session: WalletSession::Disconnected,
                    epoch: 0,
                    subscription: None,
                    next_subscription_id: 1,
                }),
                changes,
            }),
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> WalletSession {
        self.shared.inner.lock().session.clone()
    }

    pub fn address(&self) -> Option<Address> {
        self.shared.inner.lock().session.address().cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.inner.lock().session.is_connected()
    }

    pub fn epoch(&self) -> u64 {
        self.shared.inner.lock().epoch
    }

    /// Whether an account-change subscription is registered.
    pub fn is_subscribed(&self) -> bool {
        self.shared.inner.lock().subscription.is_some()
    }

    /// Signer for the connected account.
    pub fn signer(&self) -> Result<WalletSigner, WalletError> {
        self.shared
            .inner
            .lock()
            .session
            .signer()
            .cloned()
            .ok_or(WalletError::NotConnected)
    }

    /// Receiver that always holds the latest session.
    pub fn watch(&self) -> watch::Receiver<WalletSession> {
        self.shared.changes.subscribe()
    }

    /// Stream of session changes, starting after the current one.
    pub fn changes(&self) -> impl Stream<Item = WalletSession> + Send + 'static {
        let mut rx = self.watch();
        async_stream::stream! {
            while rx.changed().await.is_ok() {
                let session = rx.borrow_and_update().clone();
                yield session;
            }
        }
    }

    /// Request account access and connect with the first returned address.
    ///
    /// Subscribes to account changes on the first successful connect; later
    /// connects reuse that subscription. Fails with `Superseded` if `clear()`
    /// or another `connect()` ran while the provider was answering.
    pub async fn connect(&self) -> Result<Address, WalletError> {
        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => {
                tracing::warn!("Connect requested but no wallet provider is injected");
                return Err(WalletError::ProviderUnavailable);
            }
        };

        let epoch = {
            let mut inner = self.shared.inner.lock();
            inner.epoch += 1;
            inner.epoch
        };
        tracing::debug!(epoch, provider = provider.name(), "Requesting wallet accounts");

        let accounts = provider.request_accounts().await.map_err(|e| {
            tracing::warn!(epoch, "Wallet account request failed: {}", e);
            e
        })?;

        let address = accounts
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccountsReturned)?;

        // Provider code never runs under the session lock.
        let stream = if self.is_subscribed() {
            None
        } else {
            Some(provider.accounts_changed())
        };

        let mut inner = self.shared.inner.lock();
        if inner.epoch != epoch {
            tracing::debug!(epoch, current = inner.epoch, "Discarding stale connect result");
            return Err(WalletError::Superseded);
        }

        tracing::info!(address = %address, "Wallet connected");
        self.shared.apply(
            &mut inner,
            SessionCommand::connect(address.clone(), Arc::clone(&provider)),
        );

        if inner.subscription.is_none() {
            if let Some(stream) = stream {
                let id = inner.next_subscription_id;
                inner.next_subscription_id += 1;
                inner.subscription = Some(self.spawn_listener(id, provider, stream));
            }
        }

        Ok(address)
    }

    /// Reset to `Disconnected` and stop listening for account changes.
    pub fn clear(&self) {
        let subscription = {
            let mut inner = self.shared.inner.lock();
            inner.epoch += 1;
            self.shared.apply(&mut inner, SessionCommand::Clear);
            inner.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.dispose();
        }
        tracing::info!("Wallet session cleared");
    }

    fn spawn_listener(
        &self,
        id: u64,
        provider: ProviderHandle,
        mut stream: AccountsStream,
    ) -> Subscription {
        let shared = Arc::clone(&self.shared);
        tracing::debug!(subscription = id, "Subscribing to wallet account changes");

        let handle = tokio::spawn(async move {
            while let Some(accounts) = stream.next().await {
                shared.on_accounts_changed(id, &provider, accounts);
            }
            tracing::debug!(subscription = id, "Account-change stream ended");
        });
        Subscription::new(id, handle)
    }
}

impl std::fmt::Debug for WalletSessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("WalletSessionService")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("session", &inner.session)
            .field("epoch", &inner.epoch)
            .finish()
    }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct WalletSessionServiceBuilder {
    provider: Option<ProviderHandle>,
}

impl WalletSessionServiceBuilder {
    pub fn provider(mut self, provider: impl WalletProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    pub fn provider_handle(mut self, provider: ProviderHandle) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn build(self) -> WalletSessionService {
        WalletSessionService::new(self.provider)
    }
}
