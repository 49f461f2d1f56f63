use anyhow::Context;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyport_cli::cli::Cli;
use skyport_cli::{commands, state::AppState};
use skyport_store::app_config::Config;

const DEFAULT_LOG_FILTER: &str =
    "skyport_cli=info,skyport_catalog=info,skyport_order=info,skyport_store=warn";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let state = match startup(cli.token.as_deref()) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match commands::execute(&state, cli.command, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("error: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn startup(token: Option<&str>) -> anyhow::Result<AppState> {
    let config = Config::load().context("Failed to load config")?;
    AppState::from_config(&config, token)
}
