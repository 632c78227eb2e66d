//! Tree-based pricing engines.

pub mod binomial;

pub use binomial::{
    binomial_price_collapsed, binomial_price_full, lattice_specs, BinomialTreeEngine,
    LatticeSpecs, TreeHistory,
};
