use crate::config::EngineConfig;
use crate::domain::model::{
    CalculationOutcome, CalculationRequest, CalculationResponse, ServerRejection,
};
use crate::domain::ports::PricingEngine;
use crate::utils::error::{CalcError, Result};
use reqwest::Client;
use std::time::Duration;

/// Talks to the remote `/calculate` endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPricingEngine {
    client: Client,
    endpoint: String,
}

impl HttpPricingEngine {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint_url(&config.base_url, "calculate"),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub(crate) fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// The `error` member of a rejection body, stringified the way a browser
/// would interpolate it.
pub(crate) fn rejection_message(body: &serde_json::Value) -> String {
    match body.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(serde_json::Value::Null) => "null".to_string(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    }
}

#[async_trait::async_trait]
impl PricingEngine for HttpPricingEngine {
    async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationOutcome> {
        tracing::debug!("Making API request to: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| CalcError::transport(format!("POST {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CalcError::transport(format!("reading response body failed: {}", e)))?;

        // The body is parsed whatever the status.
        let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            CalcError::transport(format!("response body is not JSON ({}): {}", status, e))
        })?;

        if status.is_success() {
            let priced: CalculationResponse = serde_json::from_value(body).map_err(|e| {
                CalcError::transport(format!("unexpected success response shape: {}", e))
            })?;
            Ok(CalculationOutcome::Priced(priced))
        } else {
            Ok(CalculationOutcome::Rejected(ServerRejection {
                status: status.as_u16(),
                error: rejection_message(&body),
            }))
        }
    }
}
