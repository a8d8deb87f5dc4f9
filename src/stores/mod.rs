//! Storage layer for the storefront. Provides flat-file stores for:
//! - Customer accounts ([`CustomersStore`])
//! - The product catalog ([`ProductsStore`])
//! - Per-customer purchase history ([`Ledger`])
//!
//! Tables are read and rewritten whole on every mutation; the ledger is
//! append-only.

mod customers;
mod ledger;
mod products;

pub use customers::{CustomersStore, DeleteBy, NewCustomer};
pub use ledger::Ledger;
pub use products::{ProductsStore, RemoveBy};
