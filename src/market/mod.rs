//! Market data container used by all pricing engines.

pub mod market;

pub use market::{Market, MarketBuilder};
