//! Reference values for European vanilla pricing, checked against the
//! DerivaGem/Hull figures: S0=42, K=40, vol=0.20, T=0.5, r=0.10 (Hull p.339)
//! and the dividend-paying three-step tree of Hull p.291.

use vanquant::core::{OptionType, PricingEngine};
use vanquant::engines::analytic::black_scholes::bs_price;
use vanquant::engines::analytic::BlackScholesEngine;
use vanquant::engines::pde::implicit_fd_price;
use vanquant::engines::tree::{
    binomial_price_collapsed, binomial_price_full, lattice_specs, BinomialTreeEngine,
};
use vanquant::instruments::VanillaOption;
use vanquant::market::Market;

fn hull_p339_market() -> Market {
    Market::builder()
        .spot(42.0)
        .rate(0.10)
        .flat_vol(0.20)
        .build()
        .expect("reference market should be valid")
}

#[test]
fn black_scholes_matches_hull_p339() {
    let market = hull_p339_market();
    let engine = BlackScholesEngine::new();

    let put = engine
        .price(&VanillaOption::european_put(40.0, 0.5), &market)
        .unwrap();
    let call = engine
        .price(&VanillaOption::european_call(40.0, 0.5), &market)
        .unwrap();

    assert!(
        (put.price - 0.808_599_373).abs() < 1.0e-5,
        "put={}",
        put.price
    );
    assert!(
        (call.price - 4.759_422_393).abs() < 1.0e-5,
        "call={}",
        call.price
    );
}

#[test]
fn put_call_parity_holds_for_the_analytic_method() {
    for (spot, strike, rate, q, vol, expiry) in [
        (42.0, 40.0, 0.10, 0.0, 0.20, 0.5),
        (810.0, 800.0, 0.05, 0.02, 0.20, 0.5),
        (100.0, 120.0, 0.03, 0.01, 0.35, 2.0),
    ] {
        let call = bs_price(OptionType::Call, spot, strike, rate, q, vol, expiry);
        let put = bs_price(OptionType::Put, spot, strike, rate, q, vol, expiry);
        let forward = spot * (-q * expiry).exp() - strike * (-rate * expiry).exp();
        assert!(
            (call - put - forward).abs() < 1.0e-10,
            "parity violated: call={call} put={put} forward={forward}"
        );
    }
}

#[test]
fn full_history_and_collapsed_tree_agree() {
    // Hull p.339 parameters through a two-step tree, then a sweep of
    // parameter sets; the two evaluation strategies must agree to floating
    // tolerance.
    let specs = lattice_specs(2, 0.20, 0.10, 0.0, 0.5).unwrap();
    let (full, _) = binomial_price_full(OptionType::Call, 42.0, 40.0, &specs, 2);
    let collapsed = binomial_price_collapsed(OptionType::Call, 42.0, 40.0, &specs, 2);
    assert!((full - collapsed).abs() < 1.0e-8 * full.max(1.0));

    for (spot, strike, side, vol, rate, q, expiry, steps) in [
        (42.0, 40.0, OptionType::Put, 0.20, 0.10, 0.0, 0.5, 7),
        (810.0, 800.0, OptionType::Call, 0.20, 0.05, 0.02, 0.5, 25),
        (100.0, 95.0, OptionType::Put, 0.40, 0.02, 0.01, 1.5, 60),
        (5.0, 0.01, OptionType::Call, 0.30, 0.10, 0.0, 4.0, 120),
    ] {
        let specs = lattice_specs(steps, vol, rate, q, expiry).unwrap();
        let (full, _) = binomial_price_full(side, spot, strike, &specs, steps);
        let collapsed = binomial_price_collapsed(side, spot, strike, &specs, steps);
        assert!(
            (full - collapsed).abs() < 1.0e-8 * full.abs().max(1.0),
            "strategies diverge at {steps} steps: full={full} collapsed={collapsed}"
        );
    }
}

#[test]
fn dividend_tree_matches_hull_p291() {
    let specs = lattice_specs(3, 0.20, 0.05, 0.02, 0.5).unwrap();
    let (price, history) = binomial_price_full(OptionType::Call, 810.0, 800.0, &specs, 3);
    assert!((price - 59.867_529_938).abs() < 1.0e-6, "price={price}");

    let specs2 = lattice_specs(2, 0.20, 0.05, 0.02, 0.5).unwrap();
    let (root, _) = binomial_price_full(OptionType::Call, 810.0, 800.0, &specs2, 2);
    assert!((root - 53.394_716_374_961_34).abs() < 1.0e-9, "root={root}");

    // Terminal layer of the three-step tree brackets the spot.
    let terminal = history.asset.last().unwrap();
    assert_eq!(terminal.len(), 4);
    assert!(terminal.first().unwrap() < &810.0);
    assert!(terminal.last().unwrap() > &810.0);
}

#[test]
fn binomial_converges_to_black_scholes() {
    let bs = bs_price(OptionType::Call, 42.0, 40.0, 0.10, 0.0, 0.20, 0.5);
    let mut previous_err = f64::INFINITY;
    for steps in [10, 50, 500] {
        let specs = lattice_specs(steps, 0.20, 0.10, 0.0, 0.5).unwrap();
        let price = binomial_price_collapsed(OptionType::Call, 42.0, 40.0, &specs, steps);
        let err = (price - bs).abs();
        assert!(
            err < previous_err + 1.0e-12,
            "error grew at {steps} steps: {err} vs {previous_err}"
        );
        previous_err = err;
    }
    assert!(previous_err < 1.0e-3, "500-step error {previous_err}");
}

#[test]
fn finite_difference_converges_to_black_scholes() {
    for side in [OptionType::Call, OptionType::Put] {
        let bs = bs_price(side, 42.0, 40.0, 0.10, 0.0, 0.20, 0.5);
        let mut previous_err = f64::INFINITY;
        for (time_levels, price_levels) in [(10, 21), (50, 101), (200, 401)] {
            let price = implicit_fd_price(
                side,
                42.0,
                40.0,
                None,
                0.20,
                0.10,
                0.0,
                0.5,
                time_levels,
                price_levels,
            )
            .unwrap();
            let err = (price - bs).abs();
            assert!(price >= 0.0);
            assert!(
                err < previous_err,
                "error grew at {time_levels}x{price_levels}: {err} vs {previous_err}"
            );
            previous_err = err;
        }
        assert!(previous_err < 5.0e-3, "finest-grid error {previous_err}");
    }
}

#[test]
fn zero_step_tree_reduces_to_discounted_intrinsic() {
    let market = hull_p339_market();
    let result = BinomialTreeEngine::new(0)
        .price(&VanillaOption::european_call(40.0, 0.5), &market)
        .unwrap();
    assert!((result.price - 2.0 * (-0.10_f64 * 0.5).exp()).abs() < 1.0e-12);

    let expired = BinomialTreeEngine::new(12)
        .price(&VanillaOption::european_call(40.0, 0.0), &market)
        .unwrap();
    assert_eq!(expired.price, 2.0);
}

#[test]
fn tree_layers_are_never_negative() {
    let engine = BinomialTreeEngine::new(40).with_history();
    let market = hull_p339_market();
    for option in [
        VanillaOption::european_call(40.0, 0.5),
        VanillaOption::european_put(40.0, 0.5),
    ] {
        let (result, history) = engine.price_with_history(&option, &market).unwrap();
        assert!(result.price >= 0.0);
        for layer in &history.option {
            assert!(layer.iter().all(|&v| v >= 0.0));
        }
    }
}
