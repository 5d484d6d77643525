//! Entry point for the Brutto-Netto binary.
//!
//! Running this binary starts the HTTP server.  The listening port is
//! taken from the `PORT` environment variable (default 3000) and the
//! interface from `HOST`; log verbosity follows `RUST_LOG`.

use brutto_netto::{api, config::Config, tax::StandardCalculator};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    api::serve(config, Arc::new(StandardCalculator)).await
}
