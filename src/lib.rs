//! Vanquant is a European vanilla option valuation library built around three
//! interchangeable methodologies: closed-form Black-Scholes-Merton pricing, a
//! Cox-Ross-Rubinstein binomial lattice, and an implicit finite-difference
//! solver for the Black-Scholes PDE.
//!
//! References used across modules:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 13, 15,
//!   and the finite-difference treatment around p.482.
//! - Cox, Ross, and Rubinstein (1979) for the lattice parameterization.
//!
//! Numerical considerations:
//! - The lattice exposes a full backward roll (retaining every tree layer)
//!   and a closed-form collapse of the terminal distribution computed in log
//!   space; the two agree to floating tolerance by construction.
//! - The PDE engine assembles its tridiagonal system once and re-solves it
//!   per time step; grid resolution trades accuracy for repeated solves.
//!
//! # Quick Start
//! Price a Black-Scholes put:
//! ```rust
//! use vanquant::core::{OptionType, PricingEngine};
//! use vanquant::engines::analytic::BlackScholesEngine;
//! use vanquant::instruments::VanillaOption;
//! use vanquant::market::Market;
//!
//! let market = Market::builder()
//!     .spot(42.0)
//!     .rate(0.10)
//!     .flat_vol(0.20)
//!     .build()
//!     .unwrap();
//! let option = VanillaOption::european_put(40.0, 0.5);
//! let result = BlackScholesEngine::new().price(&option, &market).unwrap();
//! assert!(result.price > 0.80 && result.price < 0.81);
//! ```
//!
//! Price the same contract on a lattice and keep the tree:
//! ```rust
//! use vanquant::engines::tree::BinomialTreeEngine;
//! use vanquant::instruments::VanillaOption;
//! use vanquant::market::Market;
//!
//! let market = Market::builder()
//!     .spot(42.0)
//!     .rate(0.10)
//!     .flat_vol(0.20)
//!     .build()
//!     .unwrap();
//! let option = VanillaOption::european_put(40.0, 0.5);
//! let engine = BinomialTreeEngine::new(2).with_history();
//! let (result, history) = engine.price_with_history(&option, &market).unwrap();
//! assert_eq!(history.asset.len(), 3);
//! assert!(result.price > 0.0);
//! ```

pub mod core;
pub mod engines;
pub mod instruments;
pub mod market;
pub mod math;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::analytic::BlackScholesEngine;
    pub use crate::engines::pde::ImplicitFdEngine;
    pub use crate::engines::tree::BinomialTreeEngine;
    pub use crate::instruments::VanillaOption;
    pub use crate::market::{Market, MarketBuilder};
}
