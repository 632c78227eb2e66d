use crate::core::PricingError;

/// Market snapshot used by all pricing engines.
///
/// Rates and the dividend yield are continuously compounded; volatility is a
/// single flat annualized quote.
///
/// # Examples
/// ```
/// use vanquant::market::Market;
///
/// let market = Market::builder()
///     .spot(42.0)
///     .rate(0.10)
///     .flat_vol(0.20)
///     .build()
///     .unwrap();
/// assert_eq!(market.spot, 42.0);
/// assert_eq!(market.dividend_yield, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Market {
    /// Spot price.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Continuously compounded dividend yield.
    pub dividend_yield: f64,
    /// Flat annualized volatility.
    pub vol: f64,
}

impl Market {
    /// Starts a market builder.
    #[inline]
    pub fn builder() -> MarketBuilder {
        MarketBuilder::default()
    }
}

/// Builder for [`Market`].
#[derive(Debug, Clone, Default)]
pub struct MarketBuilder {
    spot: Option<f64>,
    rate: Option<f64>,
    dividend_yield: Option<f64>,
    flat_vol: Option<f64>,
}

impl MarketBuilder {
    /// Sets the spot price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the flat risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the continuous dividend yield.
    #[inline]
    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = Some(dividend_yield);
        self
    }

    /// Sets the flat volatility quote.
    #[inline]
    pub fn flat_vol(mut self, vol: f64) -> Self {
        self.flat_vol = Some(vol);
        self
    }

    /// Validates and builds a [`Market`].
    ///
    /// Rate and dividend yield default to zero; spot and volatility are
    /// required and must be positive.
    pub fn build(self) -> Result<Market, PricingError> {
        let spot = self
            .spot
            .ok_or_else(|| PricingError::InvalidInput("market spot is required".to_string()))?;
        if spot <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market spot must be > 0".to_string(),
            ));
        }

        let vol = self
            .flat_vol
            .ok_or_else(|| PricingError::InvalidInput("market flat_vol is required".to_string()))?;
        if vol <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market flat_vol must be > 0".to_string(),
            ));
        }

        Ok(Market {
            spot,
            rate: self.rate.unwrap_or(0.0),
            dividend_yield: self.dividend_yield.unwrap_or(0.0),
            vol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_rate_and_dividend_to_zero() {
        let market = Market::builder()
            .spot(100.0)
            .flat_vol(0.25)
            .build()
            .unwrap();
        assert_eq!(market.rate, 0.0);
        assert_eq!(market.dividend_yield, 0.0);
    }

    #[test]
    fn builder_rejects_missing_or_non_positive_inputs() {
        assert!(Market::builder().flat_vol(0.2).build().is_err());
        assert!(Market::builder().spot(100.0).build().is_err());
        assert!(Market::builder().spot(0.0).flat_vol(0.2).build().is_err());
        assert!(Market::builder().spot(100.0).flat_vol(-0.2).build().is_err());
    }
}
