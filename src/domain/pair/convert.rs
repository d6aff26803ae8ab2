//! Conversions from wire types to domain types for pairs.

use super::wire::{PairResponse, PairsResponse, TokenResponse};
use super::{PairCollection, PairRecord, TokenRef};
use crate::shared::PairAddress;

impl From<TokenResponse> for TokenRef {
    fn from(t: TokenResponse) -> Self {
        Self {
            id: t.id,
            symbol: t.symbol,
        }
    }
}

impl From<PairResponse> for PairRecord {
    fn from(p: PairResponse) -> Self {
        Self {
            id: p.id,
            token0: p.token0.map(Into::into),
            token1: p.token1.map(Into::into),
            reserve_usd: p.reserve_usd.to_amount(),
            tracked_reserve_usd: p.tracked_reserve_usd.to_amount(),
            one_day_volume_usd: p.one_day_volume_usd.to_amount(),
            one_week_volume_usd: p.one_week_volume_usd.to_amount(),
        }
    }
}

impl From<PairsResponse> for PairCollection {
    fn from(resp: PairsResponse) -> Self {
        resp.pairs
            .into_iter()
            .map(|p| (PairAddress::from(p.id.as_str()), PairRecord::from(p)))
            .collect()
    }
}

impl PairCollection {
    /// Parse a `{"pairs": [...]}` payload into a fresh collection.
    pub fn from_json(json: &str) -> Result<Self, crate::error::SdkError> {
        let resp: PairsResponse = serde_json::from_str(json)?;
        Ok(resp.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "pairs": [
            {
                "id": "0xpair1",
                "token0": {"id": "0xt0", "symbol": "WETH"},
                "token1": {"id": "0xt1", "symbol": "USDC"},
                "reserveUSD": "2000000.5",
                "trackedReserveUSD": "1999999.5",
                "oneDayVolumeUSD": 150000,
                "oneWeekVolumeUSD": "900000"
            },
            {
                "id": "0xpair2",
                "token0": null,
                "token1": {"id": "0xt1", "symbol": "USDC"},
                "reserveUSD": "not-a-number",
                "trackedReserveUSD": "-3"
            }
        ]
    }"#;

    #[test]
    fn test_pairs_response_conversion() {
        let collection = PairCollection::from_json(SAMPLE).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.eligible_count(), 1);

        let p1 = collection.get(&PairAddress::from("0xpair1")).unwrap();
        assert_eq!(p1.label().as_deref(), Some("WETH-USDC"));
        assert_eq!(p1.reserve_usd, 2000000.5);
        assert_eq!(p1.tracked_reserve_usd, 1999999.5);
        assert_eq!(p1.one_day_volume_usd, 150000.0);
        assert_eq!(p1.one_week_volume_usd, 900000.0);
    }

    #[test]
    fn test_malformed_numbers_become_zero() {
        let collection = PairCollection::from_json(SAMPLE).unwrap();
        let p2 = collection.get(&PairAddress::from("0xpair2")).unwrap();
        assert!(!p2.is_hydrated());
        assert_eq!(p2.reserve_usd, 0.0);
        assert_eq!(p2.tracked_reserve_usd, 0.0);
        assert_eq!(p2.one_day_volume_usd, 0.0);
    }

    #[test]
    fn test_bad_record_does_not_sink_payload() {
        let json = r#"{
            "pairs": [
                {
                    "id": "0xok",
                    "token0": {"id": "0xa", "symbol": "A"},
                    "token1": {"id": "0xb", "symbol": "B"},
                    "reserveUSD": "10",
                    "trackedReserveUSD": "10"
                },
                {
                    "id": "0xnull",
                    "token0": {"id": "0xa", "symbol": "A"},
                    "token1": {"id": "0xb", "symbol": "B"},
                    "reserveUSD": null,
                    "trackedReserveUSD": null
                },
                {
                    "id": "0xnoid",
                    "token0": {"symbol": "A"},
                    "token1": {"id": "0xb", "symbol": "B"}
                },
                {"token0": null}
            ]
        }"#;
        let collection = PairCollection::from_json(json).unwrap();
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.eligible_count(), 2);

        let ok = collection.get(&PairAddress::from("0xok")).unwrap();
        assert_eq!(ok.reserve_usd, 10.0);

        let null = collection.get(&PairAddress::from("0xnull")).unwrap();
        assert!(null.is_hydrated());
        assert_eq!(null.reserve_usd, 0.0);
        assert_eq!(null.tracked_reserve_usd, 0.0);

        let no_id = collection.get(&PairAddress::from("0xnoid")).unwrap();
        assert!(no_id.token0.is_none());
        assert!(!no_id.is_hydrated());
    }

    #[test]
    fn test_invalid_json_is_serde_error() {
        let err = PairCollection::from_json("{\"pairs\": 3}").unwrap_err();
        assert!(matches!(err, crate::error::SdkError::Serde(_)));
    }
}
