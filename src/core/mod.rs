pub mod admin;
pub mod client;
pub mod collector;
pub mod handler;
pub mod renderer;

pub use crate::domain::model::{
    Breakdown, CalculationOutcome, CalculationRequest, CalculationResponse, PricingParameters,
    RenderedResult,
};
pub use crate::domain::ports::{FormSource, PricingEngine, ResultView};
pub use crate::utils::error::Result;
