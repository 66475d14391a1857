use anyhow::Result;
use httpmock::prelude::*;
use hazelnut_calc::config::NumericPolicy;
use hazelnut_calc::core::collector::{COMM_YIELD, PROD_COST, QUALITY_CLASS, YIELD};
use hazelnut_calc::core::handler::CONNECTIVITY_FAILURE;
use hazelnut_calc::{
    CalculatorConfig, FormValues, HttpPricingEngine, MemoryView, SubmitHandler, SubmitOutcome,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn form(prod_cost: &str, yield_ha: &str, comm_yield: &str, quality: &str) -> FormValues {
    FormValues::new()
        .with(PROD_COST, prod_cost)
        .with(YIELD, yield_ha)
        .with(COMM_YIELD, comm_yield)
        .with(QUALITY_CLASS, quality)
}

fn config_for(base_url: &str) -> Result<CalculatorConfig> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        "[engine]\nbase_url = \"{}\"\ntimeout_seconds = 5\n",
        base_url
    )?;
    Ok(CalculatorConfig::from_file(file.path())?)
}

fn handler_for(config: &CalculatorConfig) -> Result<SubmitHandler<HttpPricingEngine, MemoryView>> {
    let engine = HttpPricingEngine::new(&config.engine)?;
    Ok(SubmitHandler::from_config(engine, MemoryView::new(), config))
}

#[tokio::test]
async fn test_end_to_end_priced_submission() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/calculate")
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "production_cost_ha": 4200.0,
                    "yield_ha": 2000.0,
                    "commercial_yield_pct": 80.0,
                    "quality_class": "A"
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "final_price": 3.78,
                    "breakdown": {
                        "marketable_yield_kg": 1600.0,
                        "yield_ratio": 1.0,
                        "base_cost_kg": 2.75,
                        "margin_value": 0.41,
                        "quality_adj": 0.2,
                        "risk_premium": 0.0,
                        "consortium_min": 0
                    }
                }));
        })
        .await;

    let config = config_for(&server.base_url())?;
    let handler = handler_for(&config)?;

    let outcome = handler.submit(&form("4200", "2000", "80", "A")).await;

    api_mock.assert_async().await;
    assert!(matches!(outcome, SubmitOutcome::Rendered { ticket: 1, .. }));

    let state = handler.view().snapshot();
    assert!(state.results_visible);
    assert_eq!(state.final_price.as_deref(), Some("€3.78"));

    let rows: Vec<(String, String)> = state
        .breakdown
        .iter()
        .map(|l| (l.label.clone(), l.value.clone()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Base Cost + Margin:".to_string(), "€3.16".to_string()),
            ("Quality Adjustment:".to_string(), "+€0.20".to_string()),
            ("Risk Premium (Yield Ratio 1):".to_string(), "+€0.00".to_string()),
            ("Consortium Floor Price:".to_string(), "€0.00".to_string()),
            ("Marketable Yield: 1600 kg/ha".to_string(), String::new()),
        ]
    );
    assert!(state.alerts.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_server_rejection() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/calculate");
            then.status(400)
                .json_body(serde_json::json!({"error": "Marketable yield cannot be zero"}));
        })
        .await;

    let handler = handler_for(&config_for(&server.base_url())?)?;
    let outcome = handler.submit(&form("4200", "2000", "0", "B")).await;

    api_mock.assert_async().await;
    assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));

    let state = handler.view().snapshot();
    assert!(!state.results_visible);
    assert_eq!(
        state.alerts,
        vec!["Error: Marketable yield cannot be zero".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_unreachable_engine() -> Result<()> {
    let handler = handler_for(&config_for("http://127.0.0.1:1")?)?;

    let outcome = handler.submit(&form("4200", "2000", "80", "A")).await;

    assert_eq!(outcome, SubmitOutcome::TransportFailed { ticket: 1 });
    let state = handler.view().snapshot();
    assert!(!state.results_visible);
    assert_eq!(state.final_price, None);
    assert_eq!(state.alerts, vec![CONNECTIVITY_FAILURE.to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_forward_policy_sends_null_for_unparseable_input() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/calculate").json_body(serde_json::json!({
                "production_cost_ha": null,
                "yield_ha": 2000.0,
                "commercial_yield_pct": 80.0,
                "quality_class": "C"
            }));
            then.status(400)
                .json_body(serde_json::json!({"error": "Invalid input: must be real number, not NoneType"}));
        })
        .await;

    let mut config = config_for(&server.base_url())?;
    config.form.numeric_policy = NumericPolicy::Forward;
    let handler = handler_for(&config)?;

    let outcome = handler.submit(&form("", "2000", "80", "C")).await;

    api_mock.assert_async().await;
    assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));
    Ok(())
}

#[tokio::test]
async fn test_reject_policy_never_contacts_engine() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/calculate");
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;

    let handler = handler_for(&config_for(&server.base_url())?)?;
    let outcome = handler.submit(&form("4200", "lots", "80", "A")).await;

    assert!(matches!(outcome, SubmitOutcome::InvalidInput { .. }));
    assert_eq!(api_mock.hits_async().await, 0);
    Ok(())
}
