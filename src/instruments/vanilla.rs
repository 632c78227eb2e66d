//! European plain-vanilla option contract definition used throughout the library.
//!
//! [`VanillaOption`] stores side, strike, and expiry. Validation accepts
//! `expiry == 0` (intrinsic-value edge case). This type is the input for the
//! analytic, lattice, and finite-difference engines alike.

use crate::core::{Instrument, OptionType, PricingError};

/// Strike assigned to [`VanillaOption::low_exercise`] contracts.
pub const LOW_EXERCISE_STRIKE: f64 = 0.01;

/// European vanilla option contract.
///
/// # Examples
/// ```
/// use vanquant::core::OptionType;
/// use vanquant::instruments::VanillaOption;
///
/// let option = VanillaOption {
///     option_type: OptionType::Call,
///     strike: 40.0,
///     expiry: 0.5,
/// };
/// assert!(option.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VanillaOption {
    /// Call or put.
    pub option_type: OptionType,
    /// Strike level.
    pub strike: f64,
    /// Expiry in years.
    pub expiry: f64,
}

impl VanillaOption {
    /// Builds a European call option.
    pub fn european_call(strike: f64, expiry: f64) -> Self {
        Self {
            option_type: OptionType::Call,
            strike,
            expiry,
        }
    }

    /// Builds a European put option.
    pub fn european_put(strike: f64, expiry: f64) -> Self {
        Self {
            option_type: OptionType::Put,
            strike,
            expiry,
        }
    }

    /// Builds a low-exercise-price contract: a European call struck at a
    /// nominal 0.01, so the holder is all but certain to exercise.
    ///
    /// # Examples
    /// ```
    /// use vanquant::core::OptionType;
    /// use vanquant::instruments::VanillaOption;
    ///
    /// let lepo = VanillaOption::low_exercise(4.0);
    /// assert_eq!(lepo.option_type, OptionType::Call);
    /// assert_eq!(lepo.strike, 0.01);
    /// ```
    pub fn low_exercise(expiry: f64) -> Self {
        Self {
            option_type: OptionType::Call,
            strike: LOW_EXERCISE_STRIKE,
            expiry,
        }
    }

    /// Validates instrument fields.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidInput`] when `strike <= 0` or
    /// `expiry < 0`. `expiry == 0` is accepted to support immediate-expiry
    /// intrinsic-value pricing.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(
                "vanilla strike must be > 0".to_string(),
            ));
        }
        if self.expiry < 0.0 {
            return Err(PricingError::InvalidInput(
                "vanilla expiry must be >= 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Intrinsic payoff at the given underlying level.
    #[inline]
    pub fn payoff(&self, spot: f64) -> f64 {
        (self.option_type.sign() * (spot - self.strike)).max(0.0)
    }
}

impl Instrument for VanillaOption {
    fn instrument_type(&self) -> &str {
        "VanillaOption"
    }
}
