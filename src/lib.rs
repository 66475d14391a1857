pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    form::FormValues,
    view::{MemoryView, TerminalView},
};
pub use config::CalculatorConfig;
pub use core::{
    admin::AdminClient,
    client::HttpPricingEngine,
    collector::FormCollector,
    handler::{SubmitHandler, SubmitOutcome},
};
pub use utils::error::{CalcError, Result};
