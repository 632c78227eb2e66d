use nalgebra::DMatrix;

use crate::core::{DiagKey, OptionType, PricingEngine, PricingError, PricingResult};
use crate::instruments::vanilla::VanillaOption;
use crate::market::Market;

/// Implicit (Backward Euler) finite-difference engine for the Black-Scholes
/// PDE on a `[0, 2 * spot]` price grid.
///
/// `time_levels` and `price_levels` are grid point counts along each axis;
/// the solver performs `time_levels - 1` backward steps over
/// `price_levels - 2` interior price nodes. The optional `payout_threshold`
/// gates the terminal payoff by moneyness against a secondary level: a call
/// pays only where `S >= threshold`, a put only where `S <= threshold`.
#[derive(Debug, Clone)]
pub struct ImplicitFdEngine {
    /// Number of time grid points.
    pub time_levels: usize,
    /// Number of price grid points.
    pub price_levels: usize,
    /// Secondary payout gate; `None` leaves the payoff ungated.
    pub payout_threshold: Option<f64>,
}

impl Default for ImplicitFdEngine {
    fn default() -> Self {
        Self {
            time_levels: 200,
            price_levels: 200,
            payout_threshold: None,
        }
    }
}

impl ImplicitFdEngine {
    pub fn new(time_levels: usize, price_levels: usize) -> Self {
        Self {
            time_levels,
            price_levels,
            ..Self::default()
        }
    }

    /// Gates the terminal payoff by moneyness against `threshold`.
    pub fn with_payout_threshold(mut self, threshold: f64) -> Self {
        self.payout_threshold = Some(threshold);
        self
    }
}

/// In-place tridiagonal solve using pre-allocated scratch buffers.
///
/// `lower[i]`/`upper[i]` are the off-diagonal coefficients of row `i`;
/// `lower[0]` and `upper[n - 1]` are ignored.
#[inline]
fn solve_tridiagonal_inplace(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
    c_star: &mut [f64],
    d_star: &mut [f64],
    x: &mut [f64],
) -> Result<(), PricingError> {
    let n = diag.len();

    let inv_denom0 = 1.0 / diag[0];
    if !inv_denom0.is_finite() {
        return Err(PricingError::NumericalError(
            "tridiagonal solver singular matrix".to_string(),
        ));
    }
    c_star[0] = if n > 1 { upper[0] * inv_denom0 } else { 0.0 };
    d_star[0] = rhs[0] * inv_denom0;

    for i in 1..n {
        let denom = diag[i] - lower[i] * c_star[i - 1];
        if denom.abs() <= 1.0e-14 {
            return Err(PricingError::NumericalError(
                "tridiagonal solver singular matrix".to_string(),
            ));
        }
        let inv_denom = 1.0 / denom;
        c_star[i] = if i < n - 1 { upper[i] * inv_denom } else { 0.0 };
        d_star[i] = (rhs[i] - lower[i] * d_star[i - 1]) * inv_denom;
    }

    x[n - 1] = d_star[n - 1];
    for i in (0..(n - 1)).rev() {
        x[i] = d_star[i] - c_star[i] * x[i + 1];
    }
    Ok(())
}

#[inline]
fn gated_payoff(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    threshold: Option<f64>,
) -> f64 {
    let open = match (threshold, option_type) {
        (None, _) => true,
        (Some(k2), OptionType::Call) => spot >= k2,
        (Some(k2), OptionType::Put) => spot <= k2,
    };
    if open {
        (option_type.sign() * (spot - strike)).max(0.0)
    } else {
        0.0
    }
}

/// Implicit finite-difference price of a European option.
///
/// Discretizes the Black-Scholes PDE backward in time over
/// `S in [0, 2 * spot]`. The tridiagonal coefficient matrix is constant in
/// time, so it is assembled once and re-solved per step with the fixed edge
/// values injected into the right-hand side. The returned price is column 0
/// interpolated linearly at `spot`.
///
/// # Errors
/// [`PricingError::InvalidInput`] when `vol <= 0`, `strike <= 0`,
/// `expiry <= 0`, `spot < 0`, `rate < 0`, `time_levels < 2`, or
/// `price_levels < 3`; [`PricingError::NumericalError`] when a tridiagonal
/// pivot degenerates.
#[allow(clippy::too_many_arguments)]
pub fn implicit_fd_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    payout_threshold: Option<f64>,
    vol: f64,
    rate: f64,
    dividend_yield: f64,
    expiry: f64,
    time_levels: usize,
    price_levels: usize,
) -> Result<f64, PricingError> {
    if vol <= 0.0 {
        return Err(PricingError::InvalidInput(
            "volatility must be > 0".to_string(),
        ));
    }
    if strike <= 0.0 {
        return Err(PricingError::InvalidInput("strike must be > 0".to_string()));
    }
    if expiry <= 0.0 {
        return Err(PricingError::InvalidInput("expiry must be > 0".to_string()));
    }
    if spot < 0.0 {
        return Err(PricingError::InvalidInput("spot must be >= 0".to_string()));
    }
    if rate < 0.0 {
        return Err(PricingError::InvalidInput("rate must be >= 0".to_string()));
    }
    if time_levels < 2 {
        return Err(PricingError::InvalidInput(
            "time_levels must be >= 2".to_string(),
        ));
    }
    if price_levels < 3 {
        return Err(PricingError::InvalidInput(
            "price_levels must be >= 3".to_string(),
        ));
    }

    let m = price_levels - 1;
    let n = time_levels - 1;
    let s_max = 2.0 * spot;
    let ds = s_max / m as f64;
    let dt = expiry / n as f64;

    let mut grid = DMatrix::<f64>::zeros(m + 1, n + 1);

    // Terminal condition at maturity.
    for j in 0..=m {
        grid[(j, n)] = gated_payoff(option_type, j as f64 * ds, strike, payout_threshold);
    }

    // Fixed edge rows across all times: worthless on the out-of-the-money
    // edge, discounted deep-in-the-money payoff on the other.
    let deep_payoff = match option_type {
        OptionType::Call => gated_payoff(option_type, s_max, strike, payout_threshold),
        OptionType::Put => gated_payoff(option_type, 0.0, strike, payout_threshold),
    };
    for t in 0..=n {
        let df = (-rate * (expiry - t as f64 * dt)).exp();
        match option_type {
            OptionType::Call => {
                grid[(0, t)] = 0.0;
                grid[(m, t)] = deep_payoff * df;
            }
            OptionType::Put => {
                grid[(0, t)] = deep_payoff * df;
                grid[(m, t)] = 0.0;
            }
        }
    }

    // Per-price-level coefficients; the grid spacing cancels because
    // S_j / ds == j.
    let drift = rate - dividend_yield;
    let var = vol * vol;
    let a: Vec<f64> = (0..=m)
        .map(|j| {
            let jf = j as f64;
            0.5 * dt * (drift * jf - var * jf * jf)
        })
        .collect();
    let b: Vec<f64> = (0..=m)
        .map(|j| {
            let jf = j as f64;
            1.0 + dt * (var * jf * jf + rate)
        })
        .collect();
    let c: Vec<f64> = (0..=m)
        .map(|j| {
            let jf = j as f64;
            0.5 * dt * (-drift * jf - var * jf * jf)
        })
        .collect();

    // Constant tridiagonal system over interior price indices 1..=m-1,
    // assembled once and re-solved every step.
    let interior = m - 1;
    let mut lower = vec![0.0_f64; interior];
    let mut diag = vec![0.0_f64; interior];
    let mut upper = vec![0.0_f64; interior];
    for k in 0..interior {
        let j = k + 1;
        if k > 0 {
            lower[k] = a[j];
        }
        diag[k] = b[j];
        if k < interior - 1 {
            upper[k] = c[j];
        }
    }

    let mut rhs = vec![0.0_f64; interior];
    let mut c_star = vec![0.0_f64; interior];
    let mut d_star = vec![0.0_f64; interior];
    let mut x = vec![0.0_f64; interior];

    for idx in (0..n).rev() {
        for k in 0..interior {
            rhs[k] = grid[(k + 1, idx + 1)];
        }
        rhs[0] -= a[1] * grid[(0, idx)];
        rhs[interior - 1] -= c[m - 1] * grid[(m, idx)];

        solve_tridiagonal_inplace(&lower, &diag, &upper, &rhs, &mut c_star, &mut d_star, &mut x)?;

        for k in 0..interior {
            grid[(k + 1, idx)] = x[k];
        }
    }

    // Valuation-date column, interpolated at the spot level.
    let price = if spot <= 0.0 {
        grid[(0, 0)]
    } else if spot >= s_max {
        grid[(m, 0)]
    } else {
        let pos = spot / ds;
        let i = pos.floor() as usize;
        let w = pos - i as f64;
        (1.0 - w) * grid[(i, 0)] + w * grid[(i + 1, 0)]
    };
    Ok(price)
}

impl PricingEngine<VanillaOption> for ImplicitFdEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;

        let price = implicit_fd_price(
            instrument.option_type,
            market.spot,
            instrument.strike,
            self.payout_threshold,
            market.vol,
            market.rate,
            market.dividend_yield,
            instrument.expiry,
            self.time_levels,
            self.price_levels,
        )?;

        let mut diagnostics = crate::core::Diagnostics::new();
        diagnostics.insert(DiagKey::NumTimeSteps, (self.time_levels - 1) as f64);
        diagnostics.insert(DiagKey::NumSpaceSteps, (self.price_levels - 1) as f64);
        diagnostics.insert(DiagKey::SMax, 2.0 * market.spot);
        diagnostics.insert(DiagKey::Vol, market.vol);

        Ok(PricingResult {
            price,
            greeks: None,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PricingEngine;
    use crate::engines::analytic::black_scholes::bs_price;

    #[test]
    fn european_call_approaches_black_scholes() {
        let option = VanillaOption::european_call(40.0, 0.5);
        let market = Market::builder()
            .spot(42.0)
            .rate(0.10)
            .flat_vol(0.20)
            .build()
            .unwrap();

        let pde = ImplicitFdEngine::new(200, 401)
            .price(&option, &market)
            .unwrap();
        let bs = bs_price(OptionType::Call, 42.0, 40.0, 0.10, 0.0, 0.20, 0.5);
        assert!(
            (pde.price - bs).abs() <= 5.0e-3,
            "PDE/BS mismatch: pde={} bs={}",
            pde.price,
            bs
        );
    }

    #[test]
    fn european_put_approaches_black_scholes() {
        let option = VanillaOption::european_put(40.0, 0.5);
        let market = Market::builder()
            .spot(42.0)
            .rate(0.10)
            .flat_vol(0.20)
            .build()
            .unwrap();

        let pde = ImplicitFdEngine::new(200, 401)
            .price(&option, &market)
            .unwrap();
        let bs = bs_price(OptionType::Put, 42.0, 40.0, 0.10, 0.0, 0.20, 0.5);
        assert!(
            (pde.price - bs).abs() <= 5.0e-3,
            "PDE/BS mismatch: pde={} bs={}",
            pde.price,
            bs
        );
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert!(implicit_fd_price(
            OptionType::Call,
            42.0,
            40.0,
            None,
            0.20,
            0.10,
            0.0,
            0.5,
            1,
            10
        )
        .is_err());
        assert!(implicit_fd_price(
            OptionType::Call,
            42.0,
            40.0,
            None,
            0.20,
            0.10,
            0.0,
            0.5,
            10,
            2
        )
        .is_err());
    }
}
