use crate::domain::model::{BreakdownLine, CalculationOutcome, CalculationRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Raw text of form inputs, addressed by field identifier.
pub trait FormSource: Send + Sync {
    fn value(&self, field_id: &str) -> Option<String>;
}

/// Display regions the results are written into.
pub trait ResultView: Send + Sync {
    fn show_results(&self);
    fn set_final_price(&self, text: &str);
    fn set_breakdown(&self, lines: &[BreakdownLine]);
    /// Blocking notification to the user.
    fn alert(&self, message: &str);
}

#[async_trait]
pub trait PricingEngine: Send + Sync {
    async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationOutcome>;
}
