//! Rate table and currency allow-list.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use storefront_common::Currency;
use tracing::debug;

use crate::error::FxError;
use crate::feed::RateFeedEntry;

/// Currencies the storefront displays when none are configured.
pub const DEFAULT_ALLOWED_CURRENCIES: [&str; 6] = ["USD", "EUR", "CAD", "JPY", "GBP", "TRY"];

/// The fixed set of currency codes the storefront will display or convert to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList(BTreeSet<Currency>);

impl AllowList {
    /// Create an allow-list from currency codes.
    pub fn new<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Currency>,
    {
        Self(codes.into_iter().map(Into::into).collect())
    }

    /// Parse a comma separated list such as `"USD,EUR,JPY"`. Blank items are skipped.
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty()),
        )
    }

    /// Check whether a currency is allowed.
    pub fn contains(&self, currency: &Currency) -> bool {
        self.0.contains(currency)
    }

    /// Number of allowed currencies.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether nothing is allowed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_CURRENCIES)
    }
}

/// Exchange rates relative to a single anchor currency.
///
/// `amount_in_x = amount_in_anchor * rate[x]`. The anchor is always present
/// with a rate of exactly 1.0. A table is immutable once built.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: BTreeMap<Currency, f64>,
    allow_list: AllowList,
    anchor: Currency,
    as_of: Option<NaiveDate>,
}

impl RateTable {
    /// Build a table from feed entries.
    ///
    /// Entries for currencies outside `allow_list`, or whose rate text does not
    /// decode, are dropped. The anchor is set to 1.0 regardless of what the
    /// feed says about it.
    pub fn build<'a, I>(entries: I, allow_list: &AllowList, anchor: &Currency) -> Self
    where
        I: IntoIterator<Item = &'a RateFeedEntry>,
    {
        let mut rates = BTreeMap::new();

        for entry in entries {
            match Self::accept(entry, allow_list) {
                Ok((currency, rate)) => {
                    rates.insert(currency, rate);
                }
                Err(e) => debug!(error = %e, "Dropping rate entry"),
            }
        }

        rates.insert(anchor.clone(), 1.0);

        Self {
            rates,
            allow_list: allow_list.clone(),
            anchor: anchor.clone(),
            as_of: None,
        }
    }

    /// Attach the publication date of the feed.
    pub fn with_as_of(mut self, as_of: Option<NaiveDate>) -> Self {
        self.as_of = as_of;
        self
    }

    fn accept(entry: &RateFeedEntry, allow_list: &AllowList) -> Result<(Currency, f64), FxError> {
        let currency = Currency::new(entry.currency.as_str());
        if !allow_list.contains(&currency) {
            return Err(FxError::EntryParse {
                currency: entry.currency.clone(),
                reason: "currency is not allow-listed".to_string(),
            });
        }
        let rate = entry.parse_rate()?;
        Ok((currency, rate))
    }

    /// All rates, keyed by currency code.
    pub fn rates(&self) -> &BTreeMap<Currency, f64> {
        &self.rates
    }

    /// Rate for one currency, if known.
    pub fn rate(&self, currency: &Currency) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Allow-listed currencies present in the table, sorted by code.
    pub fn currencies(&self) -> Vec<Currency> {
        self.rates
            .keys()
            .filter(|currency| self.allow_list.contains(currency))
            .cloned()
            .collect()
    }

    /// The anchor currency.
    pub fn anchor(&self) -> &Currency {
        &self.anchor
    }

    /// Publication date of the feed, when it carried one.
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    /// Number of currencies with a rate.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table holds no rates.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
