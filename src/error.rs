//! Domain-specific errors for the storefront.
//!
//! Contains error variants for common failure cases like:
//! - Uniqueness violations (duplicate email, duplicate product id)
//! - Lookups that match nothing (unknown customer or product)
//! - Shape checks on user input (email, phone, customer id, product id, quantity)
//! - Unreadable ledger lines
//!
//! Technical failures (I/O, CSV parsing) are wrapped unchanged so callers
//! can still see the underlying cause.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("a customer with email {0} already exists")]
    DuplicateEmail(String),

    #[error("a product with id {0} already exists")]
    DuplicateId(String),

    #[error("no record matches {0}")]
    NotFound(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid phone number (expected 9 digits): {0}")]
    InvalidPhone(String),

    #[error("invalid customer id: {0:?}")]
    InvalidCustomerId(String),

    #[error("invalid product id: {0:?}")]
    InvalidProductId(String),

    #[error("quantity must be positive for product {0}")]
    InvalidQuantity(String),

    #[error("malformed ledger entry: {0}")]
    InvalidLedgerEntry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
