//! Pair domain — pair records, sort fields, collections.

mod convert;
pub mod engine;
pub mod state;
pub mod wire;

pub use engine::{compute_page, PageState, PageView, PairRow};
pub use state::PairTable;

use crate::shared::PairAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Swap fee charged by the pool, used for the APY estimate.
pub const FEE_RATE: f64 = 0.003;

/// Days one day of fees is multiplied by to annualize it (356, not 365).
pub const APY_DAYS_PER_YEAR: f64 = 356.0;

// ─── TokenRef ────────────────────────────────────────────────────────────────

/// One side of a pair: token address and ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    pub id: String,
    pub symbol: String,
}

impl TokenRef {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
        }
    }
}

// ─── PairRecord ──────────────────────────────────────────────────────────────

/// Summary statistics for one trading pair at a point in time.
///
/// A record whose tokens are not yet known is *not hydrated*: it stays in the
/// collection but never shows up in a table page or in the page count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub id: String,
    pub token0: Option<TokenRef>,
    pub token1: Option<TokenRef>,
    pub reserve_usd: f64,
    pub tracked_reserve_usd: f64,
    pub one_day_volume_usd: f64,
    pub one_week_volume_usd: f64,
}

impl PairRecord {
    /// Both tokens are resolved.
    pub fn is_hydrated(&self) -> bool {
        self.token0.is_some() && self.token1.is_some()
    }

    pub fn tokens(&self) -> Option<(&TokenRef, &TokenRef)> {
        match (&self.token0, &self.token1) {
            (Some(t0), Some(t1)) => Some((t0, t1)),
            _ => None,
        }
    }

    /// `"SYM0-SYM1"`, or `None` while not hydrated.
    pub fn label(&self) -> Option<String> {
        self.tokens()
            .map(|(t0, t1)| format!("{}-{}", t0.symbol, t1.symbol))
    }

    /// Annualized fee yield in percent, derived from one day of volume.
    ///
    /// Non-finite when `reserve_usd` is zero.
    pub fn apy(&self) -> f64 {
        (self.one_day_volume_usd * FEE_RATE * APY_DAYS_PER_YEAR * 100.0) / self.reserve_usd
    }

    /// The value this record is ranked by for `field`.
    pub fn sort_key(&self, field: SortField) -> f64 {
        match field {
            SortField::Liquidity => self.tracked_reserve_usd,
            SortField::Volume24h => self.one_day_volume_usd,
            SortField::Volume7d => self.one_week_volume_usd,
            // Fees ranks by 24h volume: fees are a fixed fraction of it.
            SortField::Fees => self.one_day_volume_usd,
            SortField::Apy => self.apy(),
        }
    }
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Column a pair table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Liquidity,
    #[serde(rename = "volume_24h")]
    Volume24h,
    #[serde(rename = "volume_7d")]
    Volume7d,
    Fees,
    Apy,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Liquidity,
        SortField::Volume24h,
        SortField::Volume7d,
        SortField::Fees,
        SortField::Apy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Liquidity => "liquidity",
            SortField::Volume24h => "volume_24h",
            SortField::Volume7d => "volume_7d",
            SortField::Fees => "fees",
            SortField::Apy => "apy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        SortField::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Field + direction. Defaults to liquidity, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header-click behavior: same field flips direction, new field starts descending.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::new(field, SortDirection::Descending)
        }
    }
}

// ─── PairCollection ──────────────────────────────────────────────────────────

static NEXT_COLLECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one fetched collection. A new fetch gets a new id; clones share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionId(u64);

/// Pair records keyed by pair address, as supplied by the caller.
#[derive(Debug, Clone)]
pub struct PairCollection {
    id: CollectionId,
    pairs: HashMap<PairAddress, PairRecord>,
}

impl PairCollection {
    pub fn new(pairs: HashMap<PairAddress, PairRecord>) -> Self {
        Self {
            id: CollectionId(NEXT_COLLECTION_ID.fetch_add(1, Ordering::Relaxed)),
            pairs,
        }
    }

    pub fn id(&self) -> CollectionId {
        self.id
    }

    pub fn get(&self, address: &PairAddress) -> Option<&PairRecord> {
        self.pairs.get(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairAddress, &PairRecord)> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of hydrated records, the denominator for page math.
    pub fn eligible_count(&self) -> usize {
        self.pairs.values().filter(|p| p.is_hydrated()).count()
    }
}

impl FromIterator<(PairAddress, PairRecord)> for PairCollection {
    fn from_iter<I: IntoIterator<Item = (PairAddress, PairRecord)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<HashMap<PairAddress, PairRecord>> for PairCollection {
    fn from(pairs: HashMap<PairAddress, PairRecord>) -> Self {
        Self::new(pairs)
    }
}
