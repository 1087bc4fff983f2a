//! Meander API - Application entry point

use clap::Parser;

use meander_api::{
    cli::{Cli, Commands},
    commands, telemetry, AppError, Settings,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Settings failures abort startup before anything else runs
    let (settings, skipped) = Settings::load_reporting().map_err(AppError::from)?;

    // Tracing starts only once settings exist; replay skipped env file lines
    telemetry::init_tracing(cli.verbose, &settings);
    for line in &skipped {
        line.warn();
    }
    tracing::debug!(?settings, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, settings).await,
        Commands::Config => commands::config::execute(&settings),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
