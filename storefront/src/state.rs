//! Shared application state.

use std::sync::Arc;

use storefront_common::Currency;
use storefront_fx::FxEngine;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::metrics::Metrics;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Rate engine, loaded before serving starts.
    pub fx: Arc<FxEngine>,
    /// Product catalog.
    pub catalog: Arc<Catalog>,
    /// Service configuration.
    pub config: Arc<StorefrontConfig>,
    /// Request counters.
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create application state.
    pub fn new(fx: FxEngine, catalog: Catalog, config: StorefrontConfig) -> Self {
        Self {
            fx: Arc::new(fx),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Resolve a visitor's stored preference to a displayable currency,
    /// falling back to the default currency.
    pub fn resolve_currency(&self, preference: Option<&str>) -> Currency {
        preference
            .map(Currency::new)
            .filter(|currency| self.fx.is_allowed(currency))
            .unwrap_or_else(|| self.config.default_currency.clone())
    }
}
