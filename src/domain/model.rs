use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inputs posted to the pricing engine. Non-finite values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub production_cost_ha: f64,
    pub yield_ha: f64,
    pub commercial_yield_pct: f64,
    pub quality_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub base_cost_kg: f64,
    pub margin_value: f64,
    pub quality_adj: f64,
    pub yield_ratio: f64,
    pub risk_premium: f64,
    pub consortium_min: f64,
    pub marketable_yield_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub final_price: f64,
    pub breakdown: Breakdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRejection {
    pub status: u16,
    pub error: String,
}

/// What the engine answered, keyed on HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationOutcome {
    Priced(CalculationResponse),
    Rejected(ServerRejection),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTable {
    pub thresholds: Vec<f64>,
    pub premiums: Vec<f64>,
}

/// Tunables held by the engine's parameter store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    pub min_margin_pct: f64,
    pub reference_yield_kg_ha: f64,
    pub certification_defaults_ha: f64,
    #[serde(default)]
    pub min_consortium_price: f64,
    pub quality_table: BTreeMap<String, f64>,
    pub risk_table: RiskTable,
}

impl Default for PricingParameters {
    fn default() -> Self {
        Self {
            min_margin_pct: 0.15,
            reference_yield_kg_ha: 1600.0,
            certification_defaults_ha: 200.0,
            min_consortium_price: 0.0,
            quality_table: BTreeMap::from([
                ("A".to_string(), 0.20),
                ("B".to_string(), 0.00),
                ("C".to_string(), -0.15),
            ]),
            risk_table: RiskTable {
                thresholds: vec![0.90, 0.70, 0.50],
                premiums: vec![0.00, 0.10, 0.25, 0.40],
            },
        }
    }
}

/// One labelled row of the rendered breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub final_price: String,
    pub breakdown: Vec<BreakdownLine>,
}
