//! http-probe
//!
//! Runs a single HTTP health probe and prints the result as JSON.
//!
//! ```text
//! http-probe --config probe.toml
//! http-probe --description auth-service --url http://auth:8080/health
//! ```
//!
//! Exit status is 0 for healthy or degraded, 1 for unhealthy, 2 when the
//! configuration is invalid.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use http_probe::config::validation::validate_probe;
use http_probe::config::{read_config, AppConfig, ConfigError};
use http_probe::health::{HttpClient, HttpHealthProbe, ReqwestClient};
use http_probe::lifecycle::{signals::spawn_signal_listener, Shutdown};
use http_probe::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "http-probe")]
#[command(
    about = "Probe an HTTP dependency and classify it as healthy, degraded or unhealthy",
    long_about = None
)]
struct Cli {
    /// TOML config file; flags below override its probe settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Label identifying the checked dependency.
    #[arg(short, long)]
    description: Option<String>,

    /// URL to GET.
    #[arg(short, long)]
    url: Option<String>,

    /// Latency in ms above which a successful response is degraded.
    #[arg(long, allow_negative_numbers = true)]
    degradation_ms: Option<i64>,

    /// Hard request timeout in ms.
    #[arg(long, allow_negative_numbers = true)]
    cancellation_ms: Option<i64>,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => AppConfig::default(),
        };

        if let Some(description) = self.description {
            config.probe.description = description;
        }
        if let Some(url) = self.url {
            config.probe.url = url;
        }
        if let Some(ms) = self.degradation_ms {
            config.probe.degradation_threshold_ms = ms;
        }
        if let Some(ms) = self.cancellation_ms {
            config.probe.cancellation_threshold_ms = ms;
        }

        validate_probe(&config.probe).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    init_logging(&config.observability);

    match run(config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Probe could not be started");
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(config: AppConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(&config.client)?);
    let probe = HttpHealthProbe::new(&config.probe, client)?;

    let shutdown = Shutdown::new();
    let listener = spawn_signal_listener(shutdown.clone());

    let result = probe.check(&shutdown.subscribe()).await;
    listener.abort();

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(if result.is_unhealthy() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
