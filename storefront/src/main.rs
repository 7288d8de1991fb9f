//! Storefront Binary
//!
//! Loads the catalog and the daily rate table, then serves the storefront.

use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;
use storefront_fx::{FxEngine, HttpFeedSource, RateFeedSource, StaticFeedSource};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront::{create_router, AppState, Catalog, StorefrontConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = StorefrontConfig::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting storefront");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let catalog = Catalog::load(&config.catalog_path)?;
    info!(products = catalog.len(), path = %config.catalog_path, "Catalog loaded");

    let source: Arc<dyn RateFeedSource> = match &config.feed.file {
        Some(path) => Arc::new(StaticFeedSource::from_file(path)?),
        None => Arc::new(HttpFeedSource::new(config.feed.url.clone(), config.feed.timeout)?),
    };

    let fx = match FxEngine::load(source, config.fx_config()).await {
        Ok(fx) => fx,
        Err(e) => {
            error!(
                error = %e,
                code = e.error_code(),
                fatal = e.is_fatal(),
                "Could not retrieve currency rates"
            );
            return Err(e.into());
        }
    };

    let addr = format!("{}:{}", config.listen_addr, config.listen_port);
    let state = AppState::new(fx, catalog, config);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Storefront listening");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Storefront shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
