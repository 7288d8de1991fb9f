//! Currency conversion through the anchor currency.

use storefront_common::{Currency, Money};

use crate::table::RateTable;

/// Outcome of converting a price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// The price in the target currency.
    Priced(Money),
    /// Source or target currency has no known rate.
    Unpriced { currency: Currency },
}

impl Conversion {
    /// Check whether a rate was available.
    pub fn is_priced(&self) -> bool {
        matches!(self, Conversion::Priced(_))
    }

    /// Collapse to a money value. Unpriced conversions become zero in the
    /// target currency.
    pub fn into_money(self) -> Money {
        match self {
            Conversion::Priced(money) => money,
            Conversion::Unpriced { currency } => Money::zero(currency),
        }
    }
}

/// Converts prices between currencies using a [`RateTable`].
#[derive(Debug, Clone)]
pub struct Converter {
    pass_through: Currency,
}

impl Converter {
    /// Create a converter. Requests targeting `pass_through` return the
    /// price untouched.
    pub fn new(pass_through: Currency) -> Self {
        Self { pass_through }
    }

    /// Convert `price` into `target`.
    ///
    /// Units and nanos are scaled independently: each is divided by the
    /// source rate and multiplied by the target rate, then truncated toward
    /// zero. Fractional units lost from the `units` field are not carried
    /// into `nanos`. Whole units that accumulate in `nanos` are carried
    /// into `units`.
    pub fn convert(&self, table: &RateTable, price: &Money, target: &Currency) -> Conversion {
        if *target == self.pass_through {
            return Conversion::Priced(price.clone());
        }

        let from = table.rate(&price.currency_code).filter(|r| *r != 0.0);
        let to = table.rate(target).filter(|r| *r != 0.0);
        let (Some(from), Some(to)) = (from, to) else {
            return Conversion::Unpriced {
                currency: target.clone(),
            };
        };

        let anchor_units = price.units as f64 / from;
        let anchor_nanos = f64::from(price.nanos) / from;

        Conversion::Priced(Money::from_parts(
            target.clone(),
            (anchor_units * to) as i64,
            (anchor_nanos * to) as i64,
        ))
    }
}
