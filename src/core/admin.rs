use crate::config::EngineConfig;
use crate::core::client::{endpoint_url, rejection_message};
use crate::domain::model::PricingParameters;
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{validate_finite_at_least, Validate};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

const RISK_THRESHOLDS: usize = 3;
const RISK_PREMIUMS: usize = 4;

/// Session-authenticated access to the engine's parameter store.
///
/// The session lives in the client's cookie jar, so `login` must succeed
/// before `fetch_parameters` or `update_parameters` are accepted.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
}

impl AdminClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub async fn login(&self, password: &str) -> Result<()> {
        let url = endpoint_url(&self.base_url, "admin/login");
        let body = serde_json::json!({ "password": password });
        self.send(self.client.post(&url).json(&body), &url).await?;
        tracing::info!("Admin session opened");
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        let url = endpoint_url(&self.base_url, "admin/logout");
        self.send(self.client.post(&url), &url).await?;
        tracing::info!("Admin session closed");
        Ok(())
    }

    pub async fn fetch_parameters(&self) -> Result<PricingParameters> {
        let url = endpoint_url(&self.base_url, "admin/parameters");
        let body = self.send(self.client.get(&url), &url).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Uploads the full parameter set after a local structural check.
    /// Returns the server's confirmation message.
    pub async fn update_parameters(&self, params: &PricingParameters) -> Result<String> {
        params.validate()?;
        self.post_parameters(params).await
    }

    async fn post_parameters(&self, params: &PricingParameters) -> Result<String> {
        let url = endpoint_url(&self.base_url, "admin/parameters");
        let body = self.send(self.client.post(&url).json(params), &url).await?;

        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Parameters updated")
            .to_string();
        tracing::info!("{}", message);
        Ok(message)
    }

    /// Login, fetch, logout. A failing logout is logged rather than
    /// returned so the fetch result is what the caller sees.
    pub async fn fetch_parameters_in_session(&self, password: &str) -> Result<PricingParameters> {
        self.login(password).await?;
        let params = self.fetch_parameters().await;
        self.end_session().await;
        params
    }

    /// Login, upload, logout, with the same logout handling as
    /// [`AdminClient::fetch_parameters_in_session`].
    pub async fn update_parameters_in_session(
        &self,
        password: &str,
        params: &PricingParameters,
    ) -> Result<String> {
        params.validate()?;

        self.login(password).await?;
        let message = self.post_parameters(params).await;
        self.end_session().await;
        message
    }

    async fn end_session(&self) {
        if let Err(e) = self.logout().await {
            tracing::warn!("Admin logout failed: {}", e);
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<serde_json::Value> {
        tracing::debug!("Making admin request to: {}", url);

        let response = request
            .send()
            .await
            .map_err(|e| CalcError::transport(format!("request to {} failed: {}", url, e)))?;
        let status = response.status();
        tracing::debug!("Admin response status: {}", status);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CalcError::transport(format!("reading response body failed: {}", e)))?;
        let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            CalcError::transport(format!("response body is not JSON ({}): {}", status, e))
        })?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(CalcError::ServerRejection {
                status: status.as_u16(),
                message: rejection_message(&body),
            })
        }
    }
}

fn invalid(field: &str, value: String, reason: &str) -> CalcError {
    CalcError::InvalidConfigValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    }
}

impl Validate for PricingParameters {
    /// Shape checks only; the pricing rules themselves belong to the engine.
    fn validate(&self) -> Result<()> {
        validate_finite_at_least("min_margin_pct", self.min_margin_pct, 0.0, true)?;
        validate_finite_at_least("reference_yield_kg_ha", self.reference_yield_kg_ha, 0.0, false)?;
        validate_finite_at_least(
            "certification_defaults_ha",
            self.certification_defaults_ha,
            0.0,
            true,
        )?;
        validate_finite_at_least("min_consortium_price", self.min_consortium_price, 0.0, true)?;

        if self.quality_table.is_empty() {
            return Err(invalid(
                "quality_table",
                "{}".to_string(),
                "At least one quality class is required",
            ));
        }
        for (class, adjustment) in &self.quality_table {
            if !adjustment.is_finite() {
                return Err(invalid(
                    &format!("quality_table.{}", class),
                    adjustment.to_string(),
                    "Adjustment must be a finite number",
                ));
            }
        }

        let thresholds = &self.risk_table.thresholds;
        if thresholds.len() != RISK_THRESHOLDS {
            return Err(invalid(
                "risk_table.thresholds",
                format!("{:?}", thresholds),
                "Exactly 3 thresholds are required",
            ));
        }
        if thresholds.iter().any(|t| !t.is_finite()) || thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(invalid(
                "risk_table.thresholds",
                format!("{:?}", thresholds),
                "Thresholds must be finite and strictly descending",
            ));
        }

        let premiums = &self.risk_table.premiums;
        if premiums.len() != RISK_PREMIUMS || premiums.iter().any(|p| !p.is_finite()) {
            return Err(invalid(
                "risk_table.premiums",
                format!("{:?}", premiums),
                "Exactly 4 finite premiums are required",
            ));
        }

        Ok(())
    }
}
