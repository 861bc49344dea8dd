use std::process::ExitCode;

use stowage::api;
use stowage::config::{AppConfig, LogFormat, LoggingConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_target(false).with_env_filter(filter);

    match config.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_result = dotenvy::dotenv();

    // Logging settings come first so that the remaining configuration can report problems.
    init_logging(&LoggingConfig::from_env());

    if let Err(err) = dotenv_result {
        if !err.not_found() {
            warn!(%err, "could not load .env");
        }
    }

    let app_config = AppConfig::from_env();
    info!(version = env!("CARGO_PKG_VERSION"), "stowage starting");

    match api::start_api_server(app_config.api, app_config.optimizer).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "API server terminated with an error");
            ExitCode::FAILURE
        }
    }
}
