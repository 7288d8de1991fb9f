//! Storefront
//!
//! Web front end that lists a product catalog and shows prices in the
//! visitor's chosen currency, using daily reference rates from the fx crate.

pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod views;

pub use catalog::{Catalog, CatalogError, Product};
pub use config::{FeedConfig, StorefrontConfig};
pub use error::{AppError, ErrorResponse};
pub use routes::{create_router, App};
pub use state::AppState;
