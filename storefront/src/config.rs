//! Storefront configuration.

use std::time::Duration;

use storefront_common::Currency;
use storefront_fx::{AllowList, FeedShape, FxEngineConfig, ECB_DAILY_FEED_URL};

/// Rate feed configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// URL of the daily rate feed.
    pub url: String,
    /// Read the feed from this file instead of the network.
    pub file: Option<String>,
    /// Schema version of the feed document.
    pub shape: FeedShape,
    /// HTTP timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: ECB_DAILY_FEED_URL.to_string(),
            file: None,
            shape: FeedShape::Nested,
            timeout: None,
        }
    }
}

/// Main storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Rate feed configuration.
    pub feed: FeedConfig,
    /// Currency the feed quotes rates against.
    pub anchor_currency: Currency,
    /// Currency shown to visitors without a preference. Prices in the
    /// catalog are in this currency and are shown without conversion.
    pub default_currency: Currency,
    /// Currencies visitors may choose.
    pub allowed_currencies: AllowList,
    /// Path to the product catalog JSON.
    pub catalog_path: String,
    /// Directory served under `/static`.
    pub static_dir: String,
    /// Banner color shown on pages.
    pub banner_color: String,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON formatted logs.
    pub log_json: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 3000,
            feed: FeedConfig::default(),
            anchor_currency: Currency::eur(),
            default_currency: Currency::usd(),
            allowed_currencies: AllowList::default(),
            catalog_path: "products.json".to_string(),
            static_dir: "static".to_string(),
            banner_color: "green".to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Some(url) = lookup("RATE_FEED_URL") {
            config.feed.url = url;
        }

        if let Some(file) = lookup("RATE_FEED_FILE") {
            if !file.trim().is_empty() {
                config.feed.file = Some(file);
            }
        }

        if let Some(shape) = lookup("RATE_FEED_SHAPE") {
            if let Ok(shape) = shape.parse() {
                config.feed.shape = shape;
            }
        }

        if let Some(secs) = lookup("FEED_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.feed.timeout = Some(Duration::from_secs(secs));
            }
        }

        if let Some(code) = lookup("ANCHOR_CURRENCY") {
            config.anchor_currency = Currency::new(code);
        }

        if let Some(code) = lookup("DEFAULT_CURRENCY") {
            config.default_currency = Currency::new(code);
        }

        if let Some(list) = lookup("ALLOWED_CURRENCIES") {
            config.allowed_currencies = AllowList::parse(&list);
        }

        if let Some(path) = lookup("CATALOG_PATH") {
            config.catalog_path = path;
        }

        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = dir;
        }

        if let Some(color) = lookup("BANNER_COLOR") {
            config.banner_color = color;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_json = format.eq_ignore_ascii_case("json");
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.feed.file.is_none() && self.feed.url.is_empty() {
            return Err("Rate feed URL cannot be empty".to_string());
        }

        if self.allowed_currencies.is_empty() {
            return Err("At least one currency must be allowed".to_string());
        }

        if !self.allowed_currencies.contains(&self.anchor_currency) {
            return Err(format!(
                "Anchor currency {} is not in the allowed currencies",
                self.anchor_currency
            ));
        }

        if !self.allowed_currencies.contains(&self.default_currency) {
            return Err(format!(
                "Default currency {} is not in the allowed currencies",
                self.default_currency
            ));
        }

        Ok(())
    }

    /// Settings for the FX engine.
    pub fn fx_config(&self) -> FxEngineConfig {
        FxEngineConfig {
            feed_shape: self.feed.shape,
            allow_list: self.allowed_currencies.clone(),
            anchor: self.anchor_currency.clone(),
            pass_through: self.default_currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_port, 3000);
        assert_eq!(config.feed.timeout, None);
    }

    #[test]
    fn test_from_lookup() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("RATE_FEED_SHAPE", "flat"),
            ("FEED_TIMEOUT_SECS", "5"),
            ("ALLOWED_CURRENCIES", "usd,eur"),
            ("LOG_FORMAT", "JSON"),
        ]));

        assert_eq!(config.listen_port, 8081);
        assert_eq!(config.feed.shape, FeedShape::Flat);
        assert_eq!(config.feed.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.allowed_currencies, AllowList::new(["USD", "EUR"]));
        assert!(config.log_json);
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("PORT", "http"),
            ("RATE_FEED_SHAPE", "spiral"),
        ]));
        assert_eq!(config.listen_port, 3000);
        assert_eq!(config.feed.shape, FeedShape::Nested);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = StorefrontConfig::default();
        config.listen_port = 0;
        assert!(config.validate().is_err());

        let config = StorefrontConfig::from_lookup(lookup(&[("ALLOWED_CURRENCIES", "JPY,GBP")]));
        assert!(config.validate().is_err());

        let config = StorefrontConfig::from_lookup(lookup(&[("ALLOWED_CURRENCIES", " , ")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fx_config() {
        let config = StorefrontConfig::default();
        let fx = config.fx_config();
        assert_eq!(fx.anchor, Currency::eur());
        assert_eq!(fx.pass_through, Currency::usd());
    }
}
