//! Custom serde helpers for subgraph wire formats.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A numeric field that may arrive as a JSON number or a decimal string.
///
/// Subgraph `BigDecimal` fields (e.g. `reserveUSD`) are sent as strings,
/// while cached or hand-built payloads often carry plain numbers. Anything
/// else (`null`, objects, booleans) is kept as `Malformed` and reads as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(f64),
    Text(String),
    Malformed(serde_json::Value),
}

impl LenientNumber {
    /// Parsed value, `None` when the text is not a number.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            LenientNumber::Number(n) => Some(*n),
            LenientNumber::Text(s) => s.trim().parse::<f64>().ok(),
            LenientNumber::Malformed(_) => None,
        }
    }

    /// Parsed value clamped to a finite, non-negative amount; anything else is `0.0`.
    pub fn to_amount(&self) -> f64 {
        match self.to_f64() {
            Some(n) if n.is_finite() && n > 0.0 => n,
            _ => 0.0,
        }
    }
}

impl Default for LenientNumber {
    fn default() -> Self {
        LenientNumber::Number(0.0)
    }
}

impl From<f64> for LenientNumber {
    fn from(n: f64) -> Self {
        LenientNumber::Number(n)
    }
}

/// Deserialize an optional nested object, treating a malformed one as absent.
///
/// Use with `#[serde(default, deserialize_with = "lenient_option")]`.
pub fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Deserialize a list, dropping entries that do not parse as `T`.
pub fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let total = values.len();
    let parsed: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if parsed.len() < total {
        tracing::warn!(dropped = total - parsed.len(), "Skipping malformed list entries");
    }
    Ok(parsed)
}
