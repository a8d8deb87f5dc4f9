//! Store locations.
//!
//! Every store receives a [`StoreConfig`] at construction; nothing in the
//! crate reads paths from process-wide state after that point.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Customer table (CSV, rewritten on every mutation)
    pub customers_path: PathBuf,
    /// Product catalog table (CSV, rewritten on every mutation)
    pub products_path: PathBuf,
    /// Directory holding one `<customer_id>.txt` ledger per customer
    pub ledger_dir: PathBuf,
}

impl StoreConfig {
    /// Lays out all stores under a single data directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            customers_path: root.join("customers.csv"),
            products_path: root.join("products.csv"),
            ledger_dir: root.join("ledger"),
        }
    }

    /// Loads configuration from the environment (and a `.env` file if present).
    ///
    /// `FROG_DATA_DIR` picks the root directory; `FROG_CUSTOMERS_CSV`,
    /// `FROG_PRODUCTS_CSV` and `FROG_LEDGER_DIR` override single locations.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let root = env::var("FROG_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::new(root).with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("FROG_CUSTOMERS_CSV") {
            self.customers_path = path.into();
        }
        if let Some(path) = lookup("FROG_PRODUCTS_CSV") {
            self.products_path = path.into();
        }
        if let Some(path) = lookup("FROG_LEDGER_DIR") {
            self.ledger_dir = path.into();
        }
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
