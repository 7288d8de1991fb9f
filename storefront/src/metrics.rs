//! Request counters for storefront monitoring.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use storefront_fx::Conversion;

/// Storefront metrics.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Pages rendered.
    pub pages_rendered: AtomicU64,
    /// Conversions that produced a price.
    pub conversions_priced: AtomicU64,
    /// Conversions with no known rate.
    pub conversions_unpriced: AtomicU64,
    /// Conversion requests rejected during validation.
    pub conversions_rejected: AtomicU64,
    /// Currency preference changes.
    pub currency_changes: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rendered page.
    pub fn page_rendered(&self) {
        self.pages_rendered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a conversion outcome.
    pub fn conversion(&self, conversion: &Conversion) {
        if conversion.is_priced() {
            self.conversions_priced.fetch_add(1, Ordering::Relaxed);
        } else {
            self.conversions_unpriced.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a rejected conversion request.
    pub fn conversion_rejected(&self) {
        self.conversions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a currency preference change.
    pub fn currency_changed(&self) {
        self.currency_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_rendered: self.pages_rendered.load(Ordering::Relaxed),
            conversions_priced: self.conversions_priced.load(Ordering::Relaxed),
            conversions_unpriced: self.conversions_unpriced.load(Ordering::Relaxed),
            conversions_rejected: self.conversions_rejected.load(Ordering::Relaxed),
            currency_changes: self.currency_changes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub pages_rendered: u64,
    pub conversions_priced: u64,
    pub conversions_unpriced: u64,
    pub conversions_rejected: u64,
    pub currency_changes: u64,
}
