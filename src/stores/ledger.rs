//! Append-only purchase ledger, one text file per customer.
//!
//! Each checkout appends a single line:
//!
//! ```text
//! 2025-06-01 14:05 -> v1 P001=2;P002=1
//! ```
//!
//! The cart part carries a version tag so the encoding can change without
//! misreading older files. Stored text is only ever parsed, never evaluated.

use chrono::NaiveDateTime;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cart::{Cart, CartLine};
use crate::error::{Error, Result};
use crate::receipt::TIMESTAMP_FORMAT;

const SEPARATOR: &str = " -> ";
const CART_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub at: NaiveDateTime,
    pub lines: Vec<CartLine>,
}

pub struct Ledger {
    dir: PathBuf,
}

impl Ledger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location of a customer's ledger. The id becomes a file name, so only
    /// ASCII letters, digits, `-` and `_` are accepted.
    pub fn path(&self, customer_id: &str) -> Result<PathBuf> {
        let valid = !customer_id.is_empty()
            && customer_id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(Error::InvalidCustomerId(customer_id.to_string()));
        }
        Ok(self.dir.join(format!("{customer_id}.txt")))
    }

    /// Creates an empty ledger for a new customer. Existing content is kept.
    pub fn open_account(&self, customer_id: &str) -> Result<()> {
        let path = self.path(customer_id)?;
        fs::create_dir_all(&self.dir)?;
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(())
    }

    /// Appends one line for the cart and returns it unchanged.
    /// An empty cart writes nothing.
    pub fn append(&self, customer_id: &str, cart: Cart, at: NaiveDateTime) -> Result<Cart> {
        let path = self.path(customer_id)?;
        if cart.is_empty() {
            tracing::debug!(customer_id, "empty cart, nothing recorded");
            return Ok(cart);
        }

        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = format!(
            "{}{SEPARATOR}{}\n",
            at.format(TIMESTAMP_FORMAT),
            encode_cart(cart.lines())
        );
        file.write_all(line.as_bytes())?;
        tracing::info!(customer_id, lines = cart.len(), "purchase recorded");
        Ok(cart)
    }

    /// Reads every entry back in append order.
    /// A missing ledger is an empty history; lines without a separator are skipped.
    pub fn history(&self, customer_id: &str) -> Result<Vec<LedgerEntry>> {
        let content = match fs::read_to_string(self.path(customer_id)?) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        content
            .lines()
            .filter(|line| line.contains(SEPARATOR))
            .map(parse_entry)
            .collect()
    }
}

fn encode_cart(lines: &[CartLine]) -> String {
    let pairs = lines
        .iter()
        .map(|line| format!("{}={}", line.product_id, line.quantity))
        .collect::<Vec<_>>()
        .join(";");
    format!("{CART_VERSION} {pairs}")
}

fn parse_entry(line: &str) -> Result<LedgerEntry> {
    let malformed = || Error::InvalidLedgerEntry(line.to_string());

    let (timestamp, encoded) = line.trim().split_once(SEPARATOR).ok_or_else(malformed)?;
    let at = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).map_err(|_| malformed())?;
    let (version, pairs) = encoded.split_once(' ').ok_or_else(malformed)?;
    if version != CART_VERSION {
        return Err(malformed());
    }

    let lines = pairs
        .split(';')
        .map(|pair| -> Result<CartLine> {
            let (product_id, quantity) = pair.split_once('=').ok_or_else(malformed)?;
            let quantity: u32 = quantity.parse().map_err(|_| malformed())?;
            if product_id.is_empty() || quantity == 0 {
                return Err(malformed());
            }
            Ok(CartLine {
                product_id: product_id.to_string(),
                quantity,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LedgerEntry { at, lines })
}
