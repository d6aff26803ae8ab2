//! # Pairdash SDK
//!
//! Core logic for pair analytics dashboards: a paginated, sortable pair table
//! and a shared wallet-connection session. Rendering is left to the host app,
//! which receives computed rows and session snapshots.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Newtypes, pair domain types, wire conversions, table engine (always available)
//! 2. **Config** — `TableConfig` with serde defaults
//! 3. **Wallet** — Provider trait, session reducer, `WalletSessionService` (`wallet` feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pairdash_sdk::prelude::*;
//!
//! let mut table = PairTable::new(TableConfig::default())?;
//! table.set_collection(PairCollection::from_json(&body)?);
//! let view = table.view();
//!
//! let wallet = WalletSessionService::builder().provider(injected).build();
//! let address = wallet.connect().await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, engine, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

// ── Layer 2: Config ──────────────────────────────────────────────────────────

/// Table configuration.
pub mod config;

// ── Layer 3: Wallet ──────────────────────────────────────────────────────────

/// Wallet session: provider abstraction, session state machine, service.
#[cfg(feature = "wallet")]
pub mod wallet;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Address, PairAddress};

    // Domain types — pair
    pub use crate::domain::pair::{
        compute_page, CollectionId, PageState, PageView, PairCollection, PairRecord, PairRow,
        PairTable, SortDirection, SortField, SortSpec, TokenRef,
    };

    // Config
    pub use crate::config::TableConfig;

    // Errors
    pub use crate::error::{SdkError, WalletError};

    // Wallet
    #[cfg(feature = "wallet")]
    pub use crate::wallet::{
        AccountsStream, ProviderHandle, SessionCommand, Subscription, WalletProvider,
        WalletSession, WalletSessionService, WalletSessionServiceBuilder, WalletSigner,
    };
}
