//! kyc-adapter server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `ADAPTER_*`
//! environment variables, then serves the bridge protocol over HTTP.
//!
//! ```sh
//! ADAPTER_API_KEY=… ADAPTER_CHAINLINK_SERVICE_URL=https://ids.example.com/api/status/ \
//! ADAPTER_PORT=8080 LOG_LEVEL=debug cargo run -p kyc-adapter --bin adapter
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use kyc_adapter::{AdapterConfig, HttpSource, QueryHandler, Settings};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "KYC status external adapter")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Validate the configuration, print it (secrets redacted) and exit.
  #[arg(long)]
  check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing; `LOG_LEVEL` takes directives like `debug` or
  // `kyc_adapter=trace`.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("LOG_LEVEL")
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = AdapterConfig::load(&cli.config)
    .with_context(|| format!("invalid configuration ({})", cli.config.display()))?;

  if cli.check_config {
    println!("{cfg:#?}");
    return Ok(());
  }

  let source = HttpSource::new(&cfg).context("failed to build upstream HTTP client")?;
  let handler = Arc::new(QueryHandler::new(source, Settings::from(&cfg)));
  let app = kyc_adapter::router(handler);

  let address = format!("{}:{}", cfg.host, cfg.port);
  tracing::info!(
    upstream = %cfg.chainlink_service_url,
    timeout_secs = cfg.request_timeout_secs,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
