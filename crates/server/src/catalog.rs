//! Product catalog seam.
//!
//! The prize catalog is an external commerce system; this service only
//! depends on the shape of the data it returns. [`ProductCatalog`] is the
//! seam, and [`StaticCatalog`] is the deployment-friendly implementation
//! that serves a fixed product list loaded from a JSON file.

use std::path::Path;

use serde::Deserialize;
use tombola_types::{PrizeProduct, Result, TombolaError};

/// A page of catalog products.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProductPage {
    /// Products in this page.
    pub products: Vec<PrizeProduct>,
    /// Total products in the catalog.
    pub total: usize,
    /// Products in this page (mirrors the upstream commerce API shape).
    pub count: usize,
    /// Offset of this page.
    pub offset: usize,
}

/// Read access to the external product catalog.
pub trait ProductCatalog: Send + Sync {
    /// Lists a page of products.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] or implementation-specific failures
    /// when the catalog cannot be reached.
    fn list(&self, limit: usize, offset: usize) -> Result<ProductPage>;
}

/// Catalog backed by a fixed product list.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: Vec<PrizeProduct>,
}

/// JSON file shape: either a bare array or `{"products": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Bare(Vec<PrizeProduct>),
    Wrapped { products: Vec<PrizeProduct> },
}

impl StaticCatalog {
    /// Creates an empty catalog. `/products` serves an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from an in-memory product list.
    pub fn with_products(products: Vec<PrizeProduct>) -> Self {
        Self { products }
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Io`] if the file cannot be read and
    /// [`TombolaError::Config`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| TombolaError::Io {
            source,
            location: snafu::location!(),
        })?;
        let parsed: CatalogFile = serde_json::from_str(&raw).map_err(|e| TombolaError::Config {
            message: format!("catalog file {}: {e}", path.display()),
        })?;
        let products = match parsed {
            CatalogFile::Bare(products) | CatalogFile::Wrapped { products } => products,
        };
        tracing::info!(path = %path.display(), products = products.len(), "loaded product catalog");
        Ok(Self { products })
    }
}

impl ProductCatalog for StaticCatalog {
    fn list(&self, limit: usize, offset: usize) -> Result<ProductPage> {
        let page: Vec<PrizeProduct> =
            self.products.iter().skip(offset).take(limit).cloned().collect();
        Ok(ProductPage {
            total: self.products.len(),
            count: page.len(),
            offset,
            products: page,
        })
    }
}
