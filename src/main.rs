use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onvif_tester::{OnvifTester, TesterConfig};

const EXAMPLE: &str = "Example: onvif-tester 192.168.1.100 8080";

/// Sends GetDeviceInformation, GetCapabilities, GetProfiles and GetStreamUri
/// to a camera and reports which of them succeed.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// IP address or hostname of the camera
    ip_address: String,

    /// ONVIF HTTP port [default: 8080]
    port: Option<u16>,

    /// YAML file with default settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Profile token sent with GetStreamUri [default: Profile_1]
    #[arg(long, value_name = "TOKEN")]
    profile_token: Option<String>,

    /// Request the stream URI of the first profile GetProfiles reports
    #[arg(long)]
    discover_profile: bool,
}

impl Cli {
    fn tester_config(&self) -> Result<TesterConfig> {
        let mut config = match &self.config {
            Some(path) => TesterConfig::load_from_file(path)
                .context("Failed to load configuration")?,
            None => TesterConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(token) = &self.profile_token {
            config.profile_token = token.clone();
        }
        if self.discover_profile {
            config.discover_profile = true;
        }

        Ok(config)
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("onvif_tester={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<bool> {
    let config = cli.tester_config()?;
    init_tracing(&config.log_level);

    tracing::debug!("Effective configuration: {:?}", config);

    let tester = OnvifTester::with_config(&cli.ip_address, &config)
        .context("Failed to create HTTP client")?;

    let report = tester.run_suite().await;
    for (name, reason) in report.failures() {
        tracing::info!("{} failed: {}", name, reason);
    }

    Ok(report.all_passed())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprint!("{}", e);
            eprintln!("{}", EXAMPLE);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
