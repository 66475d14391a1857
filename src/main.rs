use clap::Parser;
use hazelnut_calc::config::cli::{AdminCommand, CalculateArgs, Command};
use hazelnut_calc::config::LogFormat;
use hazelnut_calc::core::PricingParameters;
use hazelnut_calc::utils::{logger, validation::Validate};
use hazelnut_calc::{
    AdminClient, CalcError, CalculatorConfig, CliConfig, HttpPricingEngine, SubmitHandler,
    TerminalView,
};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match config.logging.format {
        LogFormat::Json => logger::init_json_logger(cli.verbose),
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
    }
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let exit_code = match &cli.command {
        Command::Calculate(args) => run_calculate(&config, args).await,
        Command::Admin { action } => match run_admin(&config, action).await {
            Ok(()) => 0,
            Err(e) => {
                tracing::error!("❌ Admin command failed: {} (Severity: {:?})", e, e.severity());
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                e.severity().exit_code()
            }
        },
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run_calculate(config: &CalculatorConfig, args: &CalculateArgs) -> i32 {
    let engine = match HttpPricingEngine::new(&config.engine) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            return e.severity().exit_code();
        }
    };
    tracing::info!("🚀 Submitting to {}", engine.endpoint());

    let handler = SubmitHandler::from_config(engine, TerminalView, config);

    handler.submit(&args.to_form()).await.exit_code()
}

async fn run_admin(config: &CalculatorConfig, action: &AdminCommand) -> Result<(), CalcError> {
    let admin = AdminClient::new(&config.engine)?;

    match action {
        AdminCommand::ShowParams { password } => {
            let params = admin.fetch_parameters_in_session(password).await?;
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
        AdminCommand::UpdateParams { file, password } => {
            let params = load_parameters(file)?;
            let message = admin.update_parameters_in_session(password, &params).await?;
            println!("✅ {}", message);
        }
    }

    Ok(())
}

fn load_parameters(path: &Path) -> Result<PricingParameters, CalcError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
