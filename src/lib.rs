mod cart;
mod config;
mod csv_utils;
mod dto;
mod error;
mod ids;
mod password;
mod receipt;
mod shop;
mod stores;

pub use cart::{Cart, CartLine, PricedCart, PricedLine};
pub use config::StoreConfig;
pub use dto::{Customer, Product};
pub use error::{Error, Result};
pub use ids::{next_numeric_id, next_product_id, CUSTOMER_ID_FLOOR};
pub use password::hash_password;
pub use receipt::{HistoryRow, Receipt};
pub use shop::Shop;
pub use stores::{DeleteBy, RemoveBy};
