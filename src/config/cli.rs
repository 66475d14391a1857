use crate::adapters::form::FormValues;
use crate::config::toml_config::{CalculatorConfig, LogFormat, NumericPolicy};
use crate::core::collector::{COMM_YIELD, PROD_COST, QUALITY_CLASS, YIELD};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "hazelnut-calc")]
#[command(about = "Client for the hazelnut minimum price calculation engine")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override engine.base_url from the configuration file
    #[arg(long, env = "HAZELNUT_ENGINE_URL")]
    pub base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Submit the calculator form once and print the price breakdown
    Calculate(CalculateArgs),

    /// Manage the engine's pricing parameters
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

/// Form inputs, taken as raw text exactly as typed.
#[derive(Debug, Clone, Args)]
pub struct CalculateArgs {
    /// Production cost per hectare
    #[arg(long, allow_hyphen_values = true)]
    pub prod_cost: String,

    /// Gross yield per hectare (kg)
    #[arg(long = "yield", allow_hyphen_values = true)]
    pub yield_ha: String,

    /// Commercial (marketable) yield percentage
    #[arg(long, allow_hyphen_values = true)]
    pub comm_yield: String,

    /// Quality class, forwarded verbatim
    #[arg(long)]
    pub quality_class: String,

    /// Send unparseable numbers to the engine instead of refusing them
    #[arg(long)]
    pub forward_invalid: bool,
}

impl CalculateArgs {
    pub fn to_form(&self) -> FormValues {
        FormValues::new()
            .with(PROD_COST, &self.prod_cost)
            .with(YIELD, &self.yield_ha)
            .with(COMM_YIELD, &self.comm_yield)
            .with(QUALITY_CLASS, &self.quality_class)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// Print the current pricing parameters
    ShowParams {
        #[arg(long, env = "HAZELNUT_ADMIN_PASS", hide_env_values = true)]
        password: String,
    },

    /// Upload pricing parameters from a JSON file
    UpdateParams {
        /// JSON document with the full parameter set
        #[arg(long)]
        file: PathBuf,

        #[arg(long, env = "HAZELNUT_ADMIN_PASS", hide_env_values = true)]
        password: String,
    },
}

impl CliConfig {
    /// Configuration file (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<CalculatorConfig> {
        let mut config = match &self.config {
            Some(path) => CalculatorConfig::from_file(path)?,
            None => CalculatorConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.engine.base_url = base_url.clone();
        }
        if self.log_json {
            config.logging.format = LogFormat::Json;
        }
        if let Command::Calculate(args) = &self.command {
            if args.forward_invalid {
                config.form.numeric_policy = NumericPolicy::Forward;
            }
        }

        Ok(config)
    }
}
