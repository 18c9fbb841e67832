use std::{env, process::ExitCode};

use clap::Parser;
use dotenv::dotenv;
use scripts::{cli::Cli, config::ScriptConfig, errors::ScriptError, networks::NetworkTable};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Build the config from the CLI and the environment, then run the command
async fn run(cli: Cli) -> Result<(), ScriptError> {
    let table = NetworkTable::load()?;
    let config = ScriptConfig::build(&table, cli.config_options(), |var| env::var(var).ok())?;

    cli.command
        .unwrap_or_default()
        .run(config, &table)
        .await
}
