//! MongoDB connectivity check
//!
//! Loads the MongoDB settings, connects, pings the configured database and
//! reports the result. Exits with a non-zero status when the deployment is
//! unreachable.
//!
//! # Usage
//!
//! ```bash
//! MONGO_URI=mongodb://localhost:27017 MONGO_DATABASE=shop cargo run --bin mongo-repo-check
//! ```
//!
//! # Environment Variables
//!
//! * `MONGO_URI` - Connection string (default: mongodb://localhost:27017)
//! * `MONGO_DATABASE` - Database name (default: app)
//! * `MONGO_APP_NAME` - Application name reported to the server
//! * `MONGO_MAX_POOL_SIZE` / `MONGO_MIN_POOL_SIZE` - Pool bounds (default: 10 / 2)
//! * `MONGO_CONNECT_TIMEOUT_SECS` - Connection timeout (default: 30)
//! * `MONGO_SERVER_SELECTION_TIMEOUT_SECS` - Server selection timeout (default: 30)
//! * `MONGO_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `MONGO_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use anyhow::{bail, Context};
use infra_mongo::{MongoDbContext, MongoSettings};
use repo_kernel::{CollectionRegistry, HealthCheckable};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let settings = MongoSettings::from_env().context("failed to load MONGO_* settings")?;
    init_tracing(&settings.log_level, settings.json_logs());

    tracing::info!(
        database = %settings.database,
        max_pool_size = settings.max_pool_size,
        "Checking MongoDB connectivity"
    );

    let context = MongoDbContext::connect(&settings.database_config(), CollectionRegistry::new())
        .await
        .context("failed to create MongoDB client")?;

    let report = context.health_check().await;
    if !report.is_healthy() {
        bail!(
            "{} is unreachable after {}ms: {}",
            report.adapter_id,
            report.latency_ms,
            report.message.unwrap_or_default()
        );
    }

    tracing::info!(
        adapter = %report.adapter_id,
        latency_ms = report.latency_ms,
        "MongoDB is reachable"
    );
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}
