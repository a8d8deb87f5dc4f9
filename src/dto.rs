use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Header of the customer table, in field order.
pub const CUSTOMER_COLUMNS: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "registration_date",
    "password_hash",
    "phone",
];

/// Header of the product table, in field order.
pub const PRODUCT_COLUMNS: [&str; 5] = ["id", "name", "category", "price", "stock"];

/// One row of the customer table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub registration_date: NaiveDate,
    pub password_hash: String,
    pub phone: Option<String>,
}

/// One row of the product catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(deserialize_with = "deserialize_price_2dp")]
    pub price: Decimal,
    pub stock: u32,
}

fn deserialize_price_2dp<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer)
        .map(|dec| dec.round_dp_with_strategy(2, RoundingStrategy::ToZero))
}
