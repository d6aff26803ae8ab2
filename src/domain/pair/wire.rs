//! Wire types for pair responses (subgraph JSON).

use crate::shared::serde_util::{lenient_option, skip_malformed, LenientNumber};
use serde::{Deserialize, Serialize};

/// Token reference as nested in a pair response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
}

/// A single pair as returned by the subgraph.
///
/// `token0`/`token1` are null until the token entities are indexed. A token
/// object that does not parse is treated the same way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PairResponse {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_option")]
    pub token0: Option<TokenResponse>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub token1: Option<TokenResponse>,
    #[serde(rename = "reserveUSD", default)]
    pub reserve_usd: LenientNumber,
    #[serde(rename = "trackedReserveUSD", default)]
    pub tracked_reserve_usd: LenientNumber,
    #[serde(rename = "oneDayVolumeUSD", default)]
    pub one_day_volume_usd: LenientNumber,
    #[serde(rename = "oneWeekVolumeUSD", default)]
    pub one_week_volume_usd: LenientNumber,
}

/// List response: `{"pairs": [...]}`. Entries without a usable `id` are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairsResponse {
    #[serde(deserialize_with = "skip_malformed")]
    pub pairs: Vec<PairResponse>,
}
