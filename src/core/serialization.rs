//! Trade, market-snapshot, and valuation-audit serialization.
//!
//! These types define stable serde payloads used to persist and transport
//! contracts, market states, and pricing outputs.
//!
//! # Examples
//! ```rust
//! use vanquant::core::{from_json, to_json_pretty, Trade, TradeMetadata};
//! use vanquant::instruments::VanillaOption;
//!
//! let trade = Trade {
//!     metadata: TradeMetadata {
//!         trade_id: "TRD-001".to_string(),
//!         version: 1,
//!         timestamp: "2026-08-04T09:00:00Z".to_string(),
//!     },
//!     product: VanillaOption::european_call(40.0, 0.5),
//! };
//!
//! let json = to_json_pretty(&trade).expect("json serialization");
//! let decoded: Trade = from_json(&json).expect("json deserialization");
//! assert_eq!(decoded, trade);
//! ```

use serde::de::DeserializeOwned;

use crate::core::PricingResult;
use crate::instruments::VanillaOption;
use crate::market::Market;

/// Trade metadata required for persistence and audit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TradeMetadata {
    pub trade_id: String,
    pub version: u64,
    /// RFC3339 timestamp string (UTC recommended).
    pub timestamp: String,
}

/// Canonical trade payload.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trade {
    pub metadata: TradeMetadata,
    pub product: VanillaOption,
}

/// Point-in-time market state backing a valuation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarketSnapshot {
    pub snapshot_id: String,
    /// RFC3339 timestamp string (UTC recommended).
    pub as_of: String,
    pub market: Market,
}

/// Serializable pricing output with its full input audit trail.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValuationAudit {
    pub trade: Trade,
    pub market_snapshot: MarketSnapshot,
    pub engine_name: String,
    pub result: PricingResult,
}

/// Serialize a value to pretty JSON.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Deserialize a value from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload)
}
