//! Sequential identifier allocation.
//!
//! Both allocators scan every existing identifier, keep only those in the
//! expected shape, and return `max + 1`. Identifiers that do not parse are
//! ignored, so a hand-edited non-numeric id is tolerated rather than rejected.

/// First id handed out to customers when the table is empty.
pub const CUSTOMER_ID_FLOOR: u64 = 1000;

const PRODUCT_ID_PREFIX: char = 'P';

/// Next all-digit identifier after the largest numeric one, or `floor`.
pub fn next_numeric_id<'a, I>(existing: I, floor: u64) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(parse_digits)
        .max()
        .map_or(floor, |max| max + 1)
        .to_string()
}

/// Next `P###` product identifier, starting at `P001`.
pub fn next_product_id<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let next = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(PRODUCT_ID_PREFIX))
        .filter_map(parse_digits)
        .max()
        .map_or(1, |max| max + 1);
    format!("{PRODUCT_ID_PREFIX}{next:03}")
}

fn parse_digits(id: &str) -> Option<u64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}
