//! Main FX engine implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use storefront_common::{Currency, Money};
use tracing::{info, instrument, warn};

use crate::conversion::{Conversion, Converter};
use crate::error::{FxError, FxResult};
use crate::feed::{FeedShape, RateFeedParser};
use crate::provider::RateFeedSource;
use crate::table::{AllowList, RateTable};

/// Configuration for the FX engine.
#[derive(Debug, Clone)]
pub struct FxEngineConfig {
    /// Schema version of the rate feed.
    pub feed_shape: FeedShape,
    /// Currencies kept in the rate table.
    pub allow_list: AllowList,
    /// Currency all feed rates are quoted against.
    pub anchor: Currency,
    /// Currency whose conversions are skipped. Also the currency of
    /// prices submitted through conversion requests.
    pub pass_through: Currency,
}

impl Default for FxEngineConfig {
    fn default() -> Self {
        Self {
            feed_shape: FeedShape::Nested,
            allow_list: AllowList::default(),
            anchor: Currency::eur(),
            pass_through: Currency::usd(),
        }
    }
}

/// The main FX engine.
///
/// Holds the current [`RateTable`] as a shared snapshot. Readers take a
/// cheap `Arc` clone and never observe a partially built table; a refresh
/// swaps in a whole new table.
pub struct FxEngine {
    source: Arc<dyn RateFeedSource>,
    parser: RateFeedParser,
    converter: Converter,
    table: RwLock<Arc<RateTable>>,
    config: FxEngineConfig,
}

impl FxEngine {
    /// Fetch and decode the feed, then build the engine.
    ///
    /// Any error here means the process has no rates and must not serve.
    #[instrument(skip_all, fields(source = %source.name(), shape = %config.feed_shape))]
    pub async fn load(source: Arc<dyn RateFeedSource>, config: FxEngineConfig) -> FxResult<Self> {
        let parser = RateFeedParser::new(config.feed_shape);
        let table = Self::acquire(source.as_ref(), &parser, &config).await?;

        info!(
            rates = table.len(),
            as_of = ?table.as_of(),
            "Currency rates successfully retrieved"
        );

        Ok(Self {
            source,
            parser,
            converter: Converter::new(config.pass_through.clone()),
            table: RwLock::new(Arc::new(table)),
            config,
        })
    }

    /// Re-run acquisition and swap in the new table.
    ///
    /// On failure the current table stays in place.
    #[instrument(skip(self), fields(source = %self.source.name()))]
    pub async fn refresh(&self) -> FxResult<usize> {
        match Self::acquire(self.source.as_ref(), &self.parser, &self.config).await {
            Ok(table) => {
                let count = table.len();
                *self.table.write() = Arc::new(table);
                info!(rates = count, "Currency rates refreshed");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Rate refresh failed, keeping previous rates");
                Err(e)
            }
        }
    }

    async fn acquire(
        source: &dyn RateFeedSource,
        parser: &RateFeedParser,
        config: &FxEngineConfig,
    ) -> FxResult<RateTable> {
        let document = source.fetch().await?;
        let feed = parser.parse(&document)?;
        Ok(RateTable::build(&feed.entries, &config.allow_list, &config.anchor).with_as_of(feed.as_of))
    }

    /// The current rate table.
    pub fn snapshot(&self) -> Arc<RateTable> {
        self.table.read().clone()
    }

    /// All current rates, keyed by currency code.
    pub fn rates(&self) -> BTreeMap<Currency, f64> {
        self.snapshot().rates().clone()
    }

    /// Allow-listed currencies with a rate, sorted by code.
    pub fn currencies(&self) -> Vec<Currency> {
        self.snapshot().currencies()
    }

    /// Check whether a currency may be displayed.
    pub fn is_allowed(&self, currency: &Currency) -> bool {
        self.config.allow_list.contains(currency)
    }

    /// Convert a price using the current table.
    pub fn convert(&self, price: &Money, target: &Currency) -> Conversion {
        self.converter.convert(&self.snapshot(), price, target)
    }

    /// Validate a conversion request made of a currency code and a decimal
    /// price in the pass-through currency.
    ///
    /// Rejects an empty code, a code not on the allow-list, a price that is
    /// not a number, and a price of exactly zero.
    pub fn validate_request(&self, currency_code: &str, raw_price: &str) -> FxResult<(Currency, Money)> {
        if currency_code.trim().is_empty() {
            return Err(FxError::InvalidConversionRequest(
                "currency code is empty".to_string(),
            ));
        }

        let amount: f64 = raw_price.trim().parse().map_err(|_| {
            FxError::InvalidConversionRequest(format!("price '{}' is not a number", raw_price))
        })?;
        if !amount.is_finite() {
            return Err(FxError::InvalidConversionRequest(format!(
                "price '{}' is not finite",
                raw_price
            )));
        }
        if amount == 0.0 {
            return Err(FxError::InvalidConversionRequest(
                "price must not be zero".to_string(),
            ));
        }

        let target = Currency::new(currency_code);
        if !self.is_allowed(&target) {
            return Err(FxError::InvalidConversionRequest(format!(
                "currency {} is not supported",
                target
            )));
        }

        let base = self.config.pass_through.clone();
        let price = Money::parse(raw_price, base.clone())
            .or_else(|_| Money::from_f64(amount, base))
            .map_err(|e| FxError::InvalidConversionRequest(e.to_string()))?;

        Ok((target, price))
    }

    /// Validate and run a conversion request.
    pub fn convert_request(&self, currency_code: &str, raw_price: &str) -> FxResult<Conversion> {
        let (target, price) = self.validate_request(currency_code, raw_price)?;
        Ok(self.convert(&price, &target))
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &FxEngineConfig {
        &self.config
    }
}
