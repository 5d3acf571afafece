//! Brand tracker dashboard: binary entrypoint.
//! Loads config, installs logging and endpoints, then hands the terminal to
//! the runtime until the user quits.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use brand_tracker_dashboard::shell::runtime::Runtime;
use brand_tracker_dashboard::{logging, ApiClient, App, Backend, DashboardConfig, Tab};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cfg = DashboardConfig::load_default().context("loading dashboard config")?;
    let _log_guard = logging::init(&PathBuf::from(&cfg.log_dir), cfg.log_format)?;

    let endpoints = cfg
        .endpoints()
        .with_context(|| format!("resolving endpoints for {}", cfg.location))?
        .install();

    let backend: Arc<dyn Backend> =
        Arc::new(ApiClient::new(endpoints.clone()).with_mentions_limit(cfg.mentions_limit));

    let mut runtime = Runtime::new(
        App::new(Tab::Dashboard),
        backend,
        endpoints.alert_stream(),
        cfg.refresh(),
    )?;
    let result = runtime.run().await;
    drop(runtime);

    match &result {
        Ok(()) => tracing::info!("dashboard exited"),
        Err(e) => tracing::error!(error = %e, "dashboard stopped with error"),
    }
    result
}
