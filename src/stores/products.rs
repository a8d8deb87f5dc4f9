//! Product catalog table.

use std::path::PathBuf;

use crate::cart::validate_product_id;
use crate::csv_utils::{load_table, save_table};
use crate::dto::{Product, PRODUCT_COLUMNS};
use crate::error::{Error, Result};
use crate::ids::next_product_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveBy {
    /// Exact match
    Id,
    /// Case-insensitive
    Name,
}

pub struct ProductsStore {
    path: PathBuf,
}

impl ProductsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All products in table order. A missing table is an empty catalog.
    pub fn list(&self) -> Result<Vec<Product>> {
        Ok(load_table(&self.path)?)
    }

    /// Case-insensitive substring search over id, name and category.
    pub fn search(&self, query: &str) -> Result<Vec<Product>> {
        let query = query.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| {
                [&p.id, &p.name, &p.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            })
            .collect())
    }

    /// Suggests the next free `P###` identifier.
    pub fn next_id(&self) -> Result<String> {
        let products = self.list()?;
        Ok(next_product_id(products.iter().map(|p| p.id.as_str())))
    }

    /// Appends a product. Fails if its id is already in the catalog.
    /// Surrounding whitespace is stripped from text fields first, matching
    /// what the table reader returns on the next load.
    pub fn add(&self, product: Product) -> Result<()> {
        let product = Product {
            id: product.id.trim().to_string(),
            name: product.name.trim().to_string(),
            category: product.category.trim().to_string(),
            ..product
        };
        validate_product_id(&product.id)?;
        let mut products = self.list()?;
        if products.iter().any(|p| p.id == product.id) {
            return Err(Error::DuplicateId(product.id));
        }
        tracing::info!(id = %product.id, name = %product.name, "product added");
        products.push(product);
        save_table(&self.path, &PRODUCT_COLUMNS, &products)?;
        Ok(())
    }

    /// Removes every matching product and returns how many were removed.
    pub fn remove(&self, key: &str, by: RemoveBy) -> Result<usize> {
        let key = key.trim();
        let products = self.list()?;
        let before = products.len();
        let key_lower = key.to_lowercase();
        let kept: Vec<Product> = products
            .into_iter()
            .filter(|p| match by {
                RemoveBy::Id => p.id != key,
                RemoveBy::Name => p.name.to_lowercase() != key_lower,
            })
            .collect();
        let removed = before - kept.len();
        if removed == 0 {
            return Err(Error::NotFound(key.to_string()));
        }
        save_table(&self.path, &PRODUCT_COLUMNS, &kept)?;
        tracing::info!(key, ?by, removed, "products removed");
        Ok(removed)
    }
}
