//! Analytic Black-Scholes-Merton pricing for European vanilla options.
//!
//! References: Hull (11th ed.) Ch. 15, notably the formulas around p.335.
//! Both side prices are cheap once `d1`/`d2` are known, so the engine
//! reports call and put values in its diagnostics regardless of the side
//! being priced.

use crate::core::{
    DiagKey, Greeks, OptionType, PricingEngine, PricingError, PricingResult,
};
use crate::instruments::vanilla::VanillaOption;
use crate::market::Market;
use crate::math::{normal_cdf, normal_pdf};

/// Analytic Black-Scholes engine for European vanilla options.
#[derive(Debug, Clone, Default)]
pub struct BlackScholesEngine;

impl BlackScholesEngine {
    /// Creates a Black-Scholes engine instance.
    pub fn new() -> Self {
        Self
    }
}

#[inline]
fn intrinsic(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    (option_type.sign() * (spot - strike)).max(0.0)
}

#[inline]
fn d1_d2(
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 =
        ((spot / strike).ln() + (rate - dividend_yield + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Black-Scholes-Merton price of a European option.
///
/// Edge cases: `expiry <= 0` returns intrinsic value; `vol <= 0` returns the
/// discounted forward intrinsic value.
///
/// # Examples
/// ```rust
/// use vanquant::core::OptionType;
/// use vanquant::engines::analytic::black_scholes::bs_price;
///
/// let put = bs_price(OptionType::Put, 42.0, 40.0, 0.10, 0.0, 0.20, 0.5);
/// assert!((put - 0.8086).abs() < 1.0e-4);
/// ```
#[inline]
pub fn bs_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 {
        return intrinsic(option_type, spot, strike);
    }
    let df_r = (-rate * expiry).exp();
    let df_q = (-dividend_yield * expiry).exp();
    if vol <= 0.0 {
        return match option_type {
            OptionType::Call => (spot * df_q - strike * df_r).max(0.0),
            OptionType::Put => (strike * df_r - spot * df_q).max(0.0),
        };
    }

    let (d1, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    match option_type {
        OptionType::Call => spot * df_q * normal_cdf(d1) - strike * df_r * normal_cdf(d2),
        OptionType::Put => strike * df_r * normal_cdf(-d2) - spot * df_q * normal_cdf(-d1),
    }
}

#[inline]
pub fn bs_delta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let df_q = (-dividend_yield * expiry).exp();
    match option_type {
        OptionType::Call => df_q * normal_cdf(d1),
        OptionType::Put => df_q * (normal_cdf(d1) - 1.0),
    }
}

#[inline]
pub fn bs_gamma(
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let df_q = (-dividend_yield * expiry).exp();
    df_q * normal_pdf(d1) / (spot * vol * expiry.sqrt())
}

#[inline]
pub fn bs_vega(
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let df_q = (-dividend_yield * expiry).exp();
    spot * df_q * normal_pdf(d1) * expiry.sqrt()
}

#[inline]
pub fn bs_theta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let sqrt_t = expiry.sqrt();
    let df_q = (-dividend_yield * expiry).exp();
    let df_r = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => {
            -spot * df_q * normal_pdf(d1) * vol / (2.0 * sqrt_t)
                + dividend_yield * spot * df_q * normal_cdf(d1)
                - rate * strike * df_r * normal_cdf(d2)
        }
        OptionType::Put => {
            -spot * df_q * normal_pdf(d1) * vol / (2.0 * sqrt_t)
                - dividend_yield * spot * df_q * normal_cdf(-d1)
                + rate * strike * df_r * normal_cdf(-d2)
        }
    }
}

#[inline]
pub fn bs_rho(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (_, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let df_r = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => strike * expiry * df_r * normal_cdf(d2),
        OptionType::Put => -strike * expiry * df_r * normal_cdf(-d2),
    }
}

impl PricingEngine<VanillaOption> for BlackScholesEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;

        if instrument.expiry == 0.0 {
            return Ok(PricingResult {
                price: intrinsic(instrument.option_type, market.spot, instrument.strike),
                greeks: None,
                diagnostics: crate::core::Diagnostics::new(),
            });
        }

        if market.vol <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market volatility must be > 0".to_string(),
            ));
        }

        let (spot, strike) = (market.spot, instrument.strike);
        let (rate, q) = (market.rate, market.dividend_yield);
        let (vol, expiry) = (market.vol, instrument.expiry);

        let (d1, d2) = d1_d2(spot, strike, rate, q, vol, expiry);
        let px_call = bs_price(OptionType::Call, spot, strike, rate, q, vol, expiry);
        let px_put = bs_price(OptionType::Put, spot, strike, rate, q, vol, expiry);
        let price = match instrument.option_type {
            OptionType::Call => px_call,
            OptionType::Put => px_put,
        };

        let side = instrument.option_type;
        let greeks = Greeks {
            delta: bs_delta(side, spot, strike, rate, q, vol, expiry),
            gamma: bs_gamma(spot, strike, rate, q, vol, expiry),
            vega: bs_vega(spot, strike, rate, q, vol, expiry),
            theta: bs_theta(side, spot, strike, rate, q, vol, expiry),
            rho: bs_rho(side, spot, strike, rate, q, vol, expiry),
        };

        let mut diagnostics = crate::core::Diagnostics::new();
        diagnostics.insert(DiagKey::D1, d1);
        diagnostics.insert(DiagKey::D2, d2);
        diagnostics.insert(DiagKey::PxCall, px_call);
        diagnostics.insert(DiagKey::PxPut, px_put);
        diagnostics.insert(DiagKey::Vol, vol);

        Ok(PricingResult {
            price,
            greeks: Some(greeks),
            diagnostics,
        })
    }
}
