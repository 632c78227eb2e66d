use vanquant::core::{
    from_json, to_json_pretty, MarketSnapshot, PricingEngine, Trade, TradeMetadata,
    ValuationAudit,
};
use vanquant::engines::analytic::BlackScholesEngine;
use vanquant::instruments::VanillaOption;
use vanquant::market::Market;

fn sample_audit() -> ValuationAudit {
    let market = Market::builder()
        .spot(42.0)
        .rate(0.10)
        .flat_vol(0.20)
        .build()
        .unwrap();
    let product = VanillaOption::european_put(40.0, 0.5);
    let result = BlackScholesEngine::new().price(&product, &market).unwrap();

    ValuationAudit {
        trade: Trade {
            metadata: TradeMetadata {
                trade_id: "TRD-0001".to_string(),
                version: 1,
                timestamp: "2026-08-04T09:00:00Z".to_string(),
            },
            product,
        },
        market_snapshot: MarketSnapshot {
            snapshot_id: "SNAP-2026-08-04".to_string(),
            as_of: "2026-08-04T09:00:00Z".to_string(),
            market,
        },
        engine_name: "BlackScholesEngine".to_string(),
        result,
    }
}

#[test]
fn valuation_audit_round_trips_through_json() {
    let audit = sample_audit();
    let json = to_json_pretty(&audit).expect("audit should serialize");
    let decoded: ValuationAudit = from_json(&json).expect("audit should deserialize");
    assert_eq!(decoded, audit);
}

#[test]
fn option_side_serializes_in_snake_case() {
    let product = VanillaOption::european_call(40.0, 0.5);
    let json = to_json_pretty(&product).unwrap();
    assert!(json.contains("\"call\""), "payload: {json}");

    let decoded: VanillaOption = from_json(&json).unwrap();
    assert_eq!(decoded, product);
}

#[test]
fn diagnostics_survive_the_round_trip() {
    let audit = sample_audit();
    let json = to_json_pretty(&audit).unwrap();
    let decoded: ValuationAudit = from_json(&json).unwrap();
    assert_eq!(decoded.result.diagnostics, audit.result.diagnostics);
    assert_eq!(decoded.result.greeks, audit.result.greeks);
}
