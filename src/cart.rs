//! Shopping cart and pricing against the catalog.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::dto::Product;
use crate::error::{Error, Result};

/// Characters that may not appear in a product id because the ledger
/// encoding uses them as separators.
const RESERVED_ID_CHARS: [char; 2] = [';', '='];

/// Checks that a product id can be stored in the catalog and in a ledger line.
pub fn validate_product_id(id: &str) -> Result<()> {
    let invalid = id.is_empty()
        || id.chars().any(char::is_whitespace)
        || id.contains(&RESERVED_ID_CHARS[..]);
    if invalid {
        return Err(Error::InvalidProductId(id.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
}

/// Ordered list of (product id, quantity) pairs assembled before checkout.
/// The same product may appear on several lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Builds a cart from pairs, validating each one.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut cart = Self::new();
        for (product_id, quantity) in pairs {
            cart.add(product_id, quantity)?;
        }
        Ok(cart)
    }

    /// Appends a line. Quantity must be positive.
    pub fn add(&mut self, product_id: impl Into<String>, quantity: u32) -> Result<()> {
        let product_id = product_id.into();
        validate_product_id(&product_id)?;
        if quantity == 0 {
            return Err(Error::InvalidQuantity(product_id));
        }
        self.lines.push(CartLine {
            product_id,
            quantity,
        });
        Ok(())
    }

    /// Removes the line at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
}

/// Joins cart lines with catalog prices.
/// Lines naming products missing from the catalog are skipped, as are lines
/// whose amount would overflow `Decimal`.
pub fn price_cart(lines: &[CartLine], catalog: &[Product]) -> PricedCart {
    let by_id: HashMap<&str, &Product> = catalog.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;
    for line in lines {
        let Some(product) = by_id.get(line.product_id.as_str()) else {
            tracing::warn!(product_id = %line.product_id, "product not in catalog, skipping line");
            continue;
        };
        let priced_line = product
            .price
            .checked_mul(Decimal::from(line.quantity))
            .and_then(|line_total| Some((line_total, total.checked_add(line_total)?)));
        let Some((line_total, new_total)) = priced_line else {
            tracing::warn!(
                product_id = %line.product_id,
                quantity = line.quantity,
                "line amount overflows, skipping line"
            );
            continue;
        };
        total = new_total;
        priced.push(PricedLine {
            product_id: line.product_id.clone(),
            name: product.name.clone(),
            quantity: line.quantity,
            unit_price: product.price,
            line_total,
        });
    }
    PricedCart {
        lines: priced,
        total,
    }
}
