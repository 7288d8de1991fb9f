//! Flat-file product catalog.

use std::path::Path;

use serde::{Deserialize, Serialize};
use storefront_common::Money;
use thiserror::Error;
use tracing::info;

/// Errors raised by the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to open product catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The catalog file is not valid catalog JSON.
    #[error("Failed to parse the catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product has the requested ID.
    #[error("No product with ID {0}")]
    NotFound(String),
}

/// A product on sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub picture: String,
    pub price_usd: Money,
    /// Categories such as "vintage" or "gardening".
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
}

/// Read-only product list loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from products.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load `{"products": [...]}` from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&contents)?;
        info!(products = catalog.len(), path = %path.display(), "Parsed product catalog");
        Ok(catalog)
    }

    /// Parse catalog JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.products))
    }

    /// All products in catalog order.
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    pub fn get(&self, id: &str) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Products whose name or description contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
