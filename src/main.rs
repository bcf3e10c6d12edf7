use std::path::Path;
use std::sync::Arc;

use api_rest::AppState;
use pronto_core::config::{load_vital_thresholds, search_limit_from_env_value};
use pronto_core::{CoreConfig, VitalThresholds};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Resolves the core configuration from the environment.
///
/// # Environment Variables
/// - `PRONTO_VITAL_THRESHOLDS`: YAML file overriding the vital-sign alert thresholds (optional)
/// - `PRONTO_SEARCH_LIMIT_MAX`: maximum number of patient search results (optional)
///
/// # Errors
/// Returns an error if the thresholds file cannot be read or parsed, or if the search limit is
/// not a positive integer.
fn core_config_from_env() -> anyhow::Result<CoreConfig> {
    let thresholds = match std::env::var("PRONTO_VITAL_THRESHOLDS") {
        Ok(path) if !path.trim().is_empty() => {
            let thresholds = load_vital_thresholds(Path::new(path.trim()))?;
            tracing::info!("Loaded vital-sign thresholds from {}", path.trim());
            thresholds
        }
        _ => VitalThresholds::default(),
    };
    let search_limit_max =
        search_limit_from_env_value(std::env::var("PRONTO_SEARCH_LIMIT_MAX").ok())?;

    Ok(CoreConfig::new(thresholds, search_limit_max)?)
}

/// Main entry point for the Pronto application
///
/// Starts the REST server, which serves the API with its OpenAPI/Swagger documentation. Every
/// route except `/health` and the documentation requires the `x-api-key` header.
///
/// # Environment Variables
/// - `PRONTO_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `API_KEY`: API key clients must send (required)
/// - `PRONTO_VITAL_THRESHOLDS`, `PRONTO_SEARCH_LIMIT_MAX`: see [`core_config_from_env`]
///
/// # Returns
/// * `Ok(())` - If the server runs until shut down with Ctrl-C
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pronto=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PRONTO_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let api_key = match std::env::var("API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => anyhow::bail!("API_KEY must be set"),
    };
    let cfg = Arc::new(core_config_from_env()?);

    tracing::info!("++ Starting Pronto REST on {}", rest_addr);

    let state = AppState::new(cfg, api_key);
    tokio::select! {
        result = api_rest::serve(&rest_addr, state) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("-- Shutting down"),
    }

    Ok(())
}
