//! Storefront FX Engine
//!
//! Daily exchange-rate acquisition and price conversion.
//!
//! # Features
//!
//! - Rate feed decoding for both published feed schemas
//! - Allow-listed rate table anchored on a single currency
//! - Truncating per-field conversion of fixed-point prices
//! - Atomically swapped rate snapshots for refresh
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_fx::{FxEngine, FxEngineConfig, HttpFeedSource};
//! use storefront_common::{Currency, Money};
//!
//! let source = Arc::new(HttpFeedSource::ecb()?);
//! let engine = FxEngine::load(source, FxEngineConfig::default()).await?;
//!
//! let price = Money::parse("19.99", Currency::usd())?;
//! let yen = engine.convert(&price, &Currency::jpy()).into_money();
//! ```

pub mod conversion;
pub mod engine;
pub mod error;
pub mod feed;
pub mod provider;
pub mod table;

pub use conversion::{Conversion, Converter};
pub use engine::{FxEngine, FxEngineConfig};
pub use error::{FxError, FxResult};
pub use feed::{FeedShape, RateFeed, RateFeedEntry, RateFeedParser};
pub use provider::{HttpFeedSource, RateFeedSource, StaticFeedSource, ECB_DAILY_FEED_URL};
pub use table::{AllowList, RateTable, DEFAULT_ALLOWED_CURRENCIES};
