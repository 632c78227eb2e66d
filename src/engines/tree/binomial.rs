//! Cox-Ross-Rubinstein binomial lattice pricing for European vanilla options.
//!
//! References: Hull (11th ed.) Ch. 13 and Cox-Ross-Rubinstein (1979).
//!
//! Two evaluation strategies share the same terminal distribution. The
//! full-history roll walks the tree backward one step at a time and retains
//! every layer; the collapsed form skips the walk entirely and evaluates the
//! discounted expectation under the binomial terminal distribution, with the
//! binomial coefficients accumulated in log space so that moderate-to-large
//! step counts neither overflow the factorials nor underflow the weights.
//! Both must agree to floating tolerance for identical inputs.

use crate::core::{DiagKey, OptionType, PricingEngine, PricingError, PricingResult};
use crate::instruments::vanilla::VanillaOption;
use crate::market::Market;
use crate::math::Array;

/// Derived lattice constants for an `n`-step CRR tree.
///
/// Invariant: `0 < down < 1 < up` and `up * down == 1`. A `prob_up` outside
/// `[0, 1]` means the parameter set admits arbitrage; the engine rejects it,
/// the raw builder does not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSpecs {
    /// Up multiplier per step.
    pub up: f64,
    /// Down multiplier per step, `1 / up`.
    pub down: f64,
    /// Risk-neutral probability of an up move.
    pub prob_up: f64,
    /// Discount factor over one step.
    pub df_step: f64,
    /// Discount factor over the full horizon.
    pub df_expiry: f64,
}

/// Derives CRR lattice constants for an `n`-step tree.
///
/// `up = exp(vol * sqrt(dt))`, `down = 1 / up`, and the risk-neutral
/// probability is `(exp((rate - q) * dt) - down) / (up - down)` with
/// `dt = expiry / steps`.
///
/// # Errors
/// [`PricingError::InvalidInput`] when `steps < 1`, `vol <= 0`, or
/// `expiry <= 0`.
///
/// # Examples
/// ```
/// use vanquant::engines::tree::lattice_specs;
///
/// let specs = lattice_specs(3, 0.20, 0.05, 0.02, 0.5).unwrap();
/// assert!((specs.up * specs.down - 1.0).abs() < 1.0e-12);
/// assert!(specs.prob_up > 0.0 && specs.prob_up < 1.0);
/// ```
pub fn lattice_specs(
    steps: usize,
    vol: f64,
    rate: f64,
    dividend_yield: f64,
    expiry: f64,
) -> Result<LatticeSpecs, PricingError> {
    if steps < 1 {
        return Err(PricingError::InvalidInput(
            "lattice steps must be >= 1".to_string(),
        ));
    }
    if vol <= 0.0 {
        return Err(PricingError::InvalidInput(
            "lattice volatility must be > 0".to_string(),
        ));
    }
    if expiry <= 0.0 {
        return Err(PricingError::InvalidInput(
            "lattice expiry must be > 0".to_string(),
        ));
    }

    let dt = expiry / steps as f64;
    let up = (vol * dt.sqrt()).exp();
    let down = 1.0 / up;
    let growth = ((rate - dividend_yield) * dt).exp();

    Ok(LatticeSpecs {
        up,
        down,
        prob_up: (growth - down) / (up - down),
        df_step: (-rate * dt).exp(),
        df_expiry: (-rate * expiry).exp(),
    })
}

/// Per-step node layers retained by the full-history roll.
///
/// Layer `i` holds the `i + 1` node values at step `i`, ordered from the
/// valuation date (layer 0) to maturity (layer `n`).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeHistory {
    /// Underlying price at each node.
    pub asset: Vec<Vec<f64>>,
    /// Option value at each node.
    pub option: Vec<Vec<f64>>,
}

/// Terminal price and payoff layers: `S0 * down^(n-i) * up^i` for `i` in
/// `0..=n`, floored signed moneyness per node.
fn terminal_layers(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    specs: &LatticeSpecs,
    steps: usize,
) -> (Array, Array) {
    let incr = Array::from_fn(steps + 1, |i| i as f64);
    let decr = Array::from_fn(steps + 1, |i| (steps - i) as f64);
    let prices = decr
        .pow_base(specs.down)
        .component_mul(&incr.pow_base(specs.up))
        .scale(spot);
    let sign = option_type.sign();
    let values = prices.map(|s| (sign * (s - strike)).max(0.0));
    (prices, values)
}

/// Full-history binomial price: rolls the tree backward one step at a time,
/// retaining every layer.
///
/// Each backward step discounts the adjacent-pair expectation,
/// `df_step * ((1 - p) * O[j] + p * O[j + 1])`, and shortens the price layer
/// by one node via `down * S[j + 1]`. Requires `steps >= 1`; the returned
/// price is the single node of layer 0.
pub fn binomial_price_full(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    specs: &LatticeSpecs,
    steps: usize,
) -> (f64, TreeHistory) {
    let (mut prices, mut values) = terminal_layers(option_type, spot, strike, specs, steps);

    let mut asset = Vec::with_capacity(steps + 1);
    let mut option = Vec::with_capacity(steps + 1);
    asset.push(prices.to_vec());
    option.push(values.to_vec());

    for i in (1..=steps).rev() {
        values = (values.head(i).scale(1.0 - specs.prob_up) + values.tail(i).scale(specs.prob_up))
            .scale(specs.df_step);
        prices = prices.tail(i).scale(specs.down);
        asset.push(prices.to_vec());
        option.push(values.to_vec());
    }

    // Layers were collected maturity-first.
    asset.reverse();
    option.reverse();

    (values[0], TreeHistory { asset, option })
}

/// Collapsed binomial price: the discounted expectation of the terminal
/// payoffs under the binomial distribution, without materializing the tree.
///
/// Weights are assembled in log space,
/// `ln C(n,i) + i ln(p) + (n-i) ln(1-p)` with `ln C(n,i)` taken from
/// cumulative sums of `ln(1..=n)`, and exponentiated once at the end.
/// Requires `steps >= 1` and `0 < prob_up < 1`; agrees with
/// [`binomial_price_full`] to floating tolerance.
pub fn binomial_price_collapsed(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    specs: &LatticeSpecs,
    steps: usize,
) -> f64 {
    let n = steps;
    let (_, values) = terminal_layers(option_type, spot, strike, specs, n);

    let mut log_fact = vec![0.0];
    log_fact.extend(
        Array::from_fn(n, |k| ((k + 1) as f64).ln())
            .cumsum()
            .to_vec(),
    );
    let log_fact = Array::from_vec(log_fact);
    let ln_n_fact = log_fact[n];

    let incr = Array::from_fn(n + 1, |i| i as f64);
    let decr = Array::from_fn(n + 1, |i| (n - i) as f64);
    let log_binom = log_fact.map(|x| ln_n_fact - x) - log_fact.reversed();
    let log_prob =
        incr.scale(specs.prob_up.ln()) + decr.scale((1.0 - specs.prob_up).ln());

    specs.df_expiry * (log_binom + log_prob).exp().component_mul(&values).sum()
}

/// Cox-Ross-Rubinstein binomial tree engine.
#[derive(Debug, Clone)]
pub struct BinomialTreeEngine {
    /// Number of tree steps.
    pub steps: usize,
    /// Roll the full tree instead of collapsing the terminal distribution.
    pub keep_history: bool,
}

impl BinomialTreeEngine {
    /// Creates a tree engine with the given number of steps, pricing through
    /// the collapsed terminal distribution.
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            keep_history: false,
        }
    }

    /// Switches the engine to the full backward roll.
    pub fn with_history(mut self) -> Self {
        self.keep_history = true;
        self
    }

    fn checked_specs(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<LatticeSpecs, PricingError> {
        let specs = lattice_specs(
            self.steps,
            market.vol,
            market.rate,
            market.dividend_yield,
            instrument.expiry,
        )?;
        if !(0.0..=1.0).contains(&specs.prob_up) || !specs.prob_up.is_finite() {
            return Err(PricingError::NumericalError(
                "risk-neutral probability is outside [0, 1]".to_string(),
            ));
        }
        Ok(specs)
    }

    fn result(&self, price: f64, specs: &LatticeSpecs, vol: f64) -> PricingResult {
        let mut diagnostics = crate::core::Diagnostics::new();
        diagnostics.insert(DiagKey::NumSteps, self.steps as f64);
        diagnostics.insert(DiagKey::U, specs.up);
        diagnostics.insert(DiagKey::D, specs.down);
        diagnostics.insert(DiagKey::Pu, specs.prob_up);
        diagnostics.insert(DiagKey::DiscountFactor, specs.df_expiry);
        diagnostics.insert(DiagKey::Vol, vol);
        PricingResult {
            price,
            greeks: None,
            diagnostics,
        }
    }

    /// Prices through the full backward roll and returns the retained
    /// price/value layers alongside the result.
    pub fn price_with_history(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<(PricingResult, TreeHistory), PricingError> {
        instrument.validate()?;

        if instrument.expiry == 0.0 || self.steps == 0 {
            let price = degenerate_price(instrument, market);
            let history = TreeHistory {
                asset: vec![vec![market.spot]],
                option: vec![vec![price]],
            };
            let mut diagnostics = crate::core::Diagnostics::new();
            diagnostics.insert(DiagKey::NumSteps, self.steps as f64);
            return Ok((
                PricingResult {
                    price,
                    greeks: None,
                    diagnostics,
                },
                history,
            ));
        }

        let specs = self.checked_specs(instrument, market)?;
        let (price, history) = binomial_price_full(
            instrument.option_type,
            market.spot,
            instrument.strike,
            &specs,
            self.steps,
        );
        Ok((self.result(price, &specs, market.vol), history))
    }
}

/// Zero-step and zero-expiry degenerate prices: the horizon-discounted
/// intrinsic payoff (the discount factor is 1 at zero expiry).
fn degenerate_price(instrument: &VanillaOption, market: &Market) -> f64 {
    (-market.rate * instrument.expiry).exp() * instrument.payoff(market.spot)
}

impl PricingEngine<VanillaOption> for BinomialTreeEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;

        if instrument.expiry == 0.0 || self.steps == 0 {
            let mut diagnostics = crate::core::Diagnostics::new();
            diagnostics.insert(DiagKey::NumSteps, self.steps as f64);
            return Ok(PricingResult {
                price: degenerate_price(instrument, market),
                greeks: None,
                diagnostics,
            });
        }

        let specs = self.checked_specs(instrument, market)?;
        let price = if self.keep_history {
            binomial_price_full(
                instrument.option_type,
                market.spot,
                instrument.strike,
                &specs,
                self.steps,
            )
            .0
        } else {
            binomial_price_collapsed(
                instrument.option_type,
                market.spot,
                instrument.strike,
                &specs,
                self.steps,
            )
        };

        Ok(self.result(price, &specs, market.vol))
    }
}
