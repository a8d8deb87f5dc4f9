//! Human-readable receipt and purchase-history summaries.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;

use crate::cart::PricedCart;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Receipt printed after a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub customer_id: String,
    pub at: NaiveDateTime,
    pub cart: PricedCart,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== RECEIPT Frog ===")?;
        writeln!(f, "Customer: {}", self.customer_id)?;
        writeln!(f, "Date: {}", self.at.format(TIMESTAMP_FORMAT))?;
        writeln!(f)?;
        for line in &self.cart.lines {
            writeln!(
                f,
                "{} {} x{} @ {:.2} = {:.2}",
                line.product_id, line.name, line.quantity, line.unit_price, line.line_total
            )?;
        }
        writeln!(f)?;
        write!(f, "TOTAL: {:.2} PLN", self.cart.total)
    }
}

/// One row of the purchase-history view.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub at: NaiveDateTime,
    pub details: String,
    pub total: Decimal,
}

impl HistoryRow {
    pub fn new(at: NaiveDateTime, cart: &PricedCart) -> Self {
        let details = cart
            .lines
            .iter()
            .map(|line| format!("{}x{}={:.2}", line.product_id, line.quantity, line.line_total))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            at,
            details,
            total: cart.total,
        }
    }
}

impl fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {:.2} PLN",
            self.at.format(TIMESTAMP_FORMAT),
            self.details,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::PricedLine;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    fn priced() -> PricedCart {
        PricedCart {
            lines: vec![
                PricedLine {
                    product_id: "P001".to_string(),
                    name: "Cola".to_string(),
                    quantity: 2,
                    unit_price: dec!(3.49),
                    line_total: dec!(6.98),
                },
                PricedLine {
                    product_id: "P002".to_string(),
                    name: "Chips".to_string(),
                    quantity: 1,
                    unit_price: dec!(5),
                    line_total: dec!(5),
                },
            ],
            total: dec!(11.98),
        }
    }

    #[test]
    fn test_receipt_layout() {
        let receipt = Receipt {
            customer_id: "1000".to_string(),
            at: at(),
            cart: priced(),
        };
        let expected = "=== RECEIPT Frog ===
Customer: 1000
Date: 2025-06-01 14:05

P001 Cola x2 @ 3.49 = 6.98
P002 Chips x1 @ 5.00 = 5.00

TOTAL: 11.98 PLN";
        assert_eq!(receipt.to_string(), expected);
    }

    #[test]
    fn test_history_row() {
        let row = HistoryRow::new(at(), &priced());
        assert_eq!(row.details, "P001x2=6.98, P002x1=5.00");
        assert_eq!(row.to_string(), "2025-06-01 14:05 | P001x2=6.98, P002x1=5.00 | 11.98 PLN");
    }
}
