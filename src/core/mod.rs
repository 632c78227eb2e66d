//! Core traits, common domain types, and library-wide result/error structures.

use crate::market::Market;

pub mod serialization;
pub mod types;

pub use serialization::{
    from_json, to_json_pretty, MarketSnapshot, Trade, TradeMetadata, ValuationAudit,
};
pub use types::*;

/// Standardized Greeks container used by engine results.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Greeks {
    /// First derivative to spot.
    pub delta: f64,
    /// Second derivative to spot.
    pub gamma: f64,
    /// First derivative to volatility.
    pub vega: f64,
    /// First derivative to time.
    pub theta: f64,
    /// First derivative to rate.
    pub rho: f64,
}

/// Common trait implemented by every priceable instrument.
pub trait Instrument: std::fmt::Debug {
    /// Returns a short type identifier for diagnostics and serialization.
    fn instrument_type(&self) -> &str;
}

/// Pricing engine abstraction over an instrument type.
pub trait PricingEngine<I: Instrument> {
    /// Prices an instrument under the provided market state.
    fn price(&self, instrument: &I, market: &Market) -> Result<PricingResult, PricingError>;
}

/// Compact key set for engine diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DiagKey {
    D,
    D1,
    D2,
    DiscountFactor,
    NumSpaceSteps,
    NumSteps,
    NumTimeSteps,
    Pu,
    PxCall,
    PxPut,
    SMax,
    U,
    Vol,
}

impl DiagKey {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::D => "d",
            Self::D1 => "d1",
            Self::D2 => "d2",
            Self::DiscountFactor => "discount_factor",
            Self::NumSpaceSteps => "num_space_steps",
            Self::NumSteps => "num_steps",
            Self::NumTimeSteps => "num_time_steps",
            Self::Pu => "pu",
            Self::PxCall => "px_call",
            Self::PxPut => "px_put",
            Self::SMax => "s_max",
            Self::U => "u",
            Self::Vol => "vol",
        }
    }
}

impl std::str::FromStr for DiagKey {
    type Err = ();

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "d" => Ok(Self::D),
            "d1" => Ok(Self::D1),
            "d2" => Ok(Self::D2),
            "discount_factor" => Ok(Self::DiscountFactor),
            "num_space_steps" => Ok(Self::NumSpaceSteps),
            "num_steps" => Ok(Self::NumSteps),
            "num_time_steps" => Ok(Self::NumTimeSteps),
            "pu" => Ok(Self::Pu),
            "px_call" => Ok(Self::PxCall),
            "px_put" => Ok(Self::PxPut),
            "s_max" => Ok(Self::SMax),
            "u" => Ok(Self::U),
            "vol" => Ok(Self::Vol),
            _ => Err(()),
        }
    }
}

/// Inline diagnostics storage used in [`PricingResult`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostics {
    entries: [Option<(DiagKey, f64)>; 8],
}

impl Diagnostics {
    pub const CAPACITY: usize = 8;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries[0].is_none()
    }

    /// Insert a diagnostic value, replacing any previous value under the key.
    #[inline]
    pub fn insert(&mut self, key: DiagKey, value: f64) -> Option<f64> {
        for (entry_key, existing) in self.entries.iter_mut().flatten() {
            if *entry_key == key {
                let prev = *existing;
                *existing = value;
                return Some(prev);
            }
        }

        for entry in &mut self.entries {
            if entry.is_none() {
                *entry = Some((key, value));
                return None;
            }
        }

        panic!("diagnostics capacity exceeded ({})", Self::CAPACITY);
    }

    #[inline]
    fn iter_entries(&self) -> impl Iterator<Item = &(DiagKey, f64)> {
        self.entries.iter().filter_map(Option::as_ref)
    }

    #[inline]
    pub fn contains_key(&self, key: DiagKey) -> bool {
        self.get(key).is_some()
    }

    #[inline]
    pub fn get(&self, key: DiagKey) -> Option<&f64> {
        self.iter_entries()
            .find_map(|(entry_key, value)| (*entry_key == key).then_some(value))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &f64)> {
        self.iter_entries().map(|(k, v)| (k.as_str(), v))
    }
}

/// Unified engine result payload.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PricingResult {
    /// Present value.
    pub price: f64,
    /// Greeks when available from the engine.
    pub greeks: Option<Greeks>,
    /// Engine-specific scalar diagnostics.
    pub diagnostics: Diagnostics,
}

/// Engine and model errors surfaced by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Input validation error.
    InvalidInput(String),
    /// Numerical issue (degenerate probability, singular system, etc.).
    NumericalError(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::NumericalError(msg) => write!(f, "numerical error: {msg}"),
        }
    }
}

impl std::error::Error for PricingError {}
