//! Storefront Common Types
//!
//! Shared value types used across the storefront: currencies and the
//! fixed-point `Money` amount carried by catalog prices and conversions.

pub mod error;
pub mod monetary;

pub use error::*;
pub use monetary::*;
