//! CSV serialization and deserialization utilities.
//!
//! Provides the whole-table load and rewrite used by every store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Creates an iterator that reads CSV records from a file.
/// Each record is deserialized into type T.
pub fn read_csv<T, P>(path: P) -> csv::Result<impl Iterator<Item = csv::Result<T>>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?
        .into_deserialize())
}

/// Reads the whole table into memory.
/// A missing file is an empty table, not an error.
pub fn load_table<T, P>(path: P) -> csv::Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match read_csv::<T, _>(path) {
        Ok(records) => records.collect(),
        Err(err) if is_not_found(&err) => {
            tracing::debug!(path = %path.display(), "table missing, treating as empty");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

/// Rewrites the whole table. The header row is always written, even when
/// there are no records. The parent directory is created if needed.
pub fn save_table<T, P>(path: P, header: &[&str], records: &[T]) -> csv::Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_csv(file, header, records.iter())?;
    tracing::debug!(path = %path.display(), rows = records.len(), "table rewritten");
    Ok(())
}

/// Writes a header row followed by an iterator of records to a CSV writer.
/// Each record must implement Serialize.
pub fn write_csv<T, W>(
    writer: W,
    header: &[&str],
    records: impl Iterator<Item = T>,
) -> csv::Result<()>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(header)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{Product, PRODUCT_COLUMNS};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv() -> csv::Result<()> {
        let products: Vec<Product> =
            read_csv("data/products.csv")?.collect::<Result<_, _>>()?;

        let expected_products = vec![
            Product {
                id: "P001".to_string(),
                name: "Cola".to_string(),
                category: "Drinks".to_string(),
                price: dec!(3.49),
                stock: 120,
            },
            Product {
                id: "P002".to_string(),
                name: "Potato Chips".to_string(),
                category: "Snacks".to_string(),
                price: dec!(5.99),
                stock: 45,
            },
            Product {
                id: "P003".to_string(),
                name: "Sourdough Bread".to_string(),
                category: "Bakery".to_string(),
                price: dec!(7.5),
                stock: 12,
            },
        ];
        assert_eq!(products, expected_products);

        Ok(())
    }

    #[test]
    fn test_missing_table_is_empty() -> csv::Result<()> {
        let dir = TempDir::new().unwrap();
        let products: Vec<Product> = load_table(dir.path().join("nope.csv"))?;
        assert!(products.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_creates_parent_and_writes_header() -> csv::Result<()> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("products.csv");
        let rows = vec![Product {
            id: "P001".to_string(),
            name: "Cola, Cherry".to_string(),
            category: "Drinks".to_string(),
            price: dec!(3.49),
            stock: 1,
        }];
        save_table(&path, &PRODUCT_COLUMNS, &rows)?;

        let written = fs::read_to_string(&path)?;
        assert_eq!(
            written,
            "id,name,category,price,stock\nP001,\"Cola, Cherry\",Drinks,3.49,1\n"
        );
        assert_eq!(load_table::<Product, _>(&path)?, rows);
        Ok(())
    }

    #[test]
    fn test_empty_table_rewrite_keeps_header() -> csv::Result<()> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.csv");
        save_table::<Product, _>(&path, &PRODUCT_COLUMNS, &[])?;
        assert_eq!(fs::read_to_string(&path)?, "id,name,category,price,stock\n");
        assert!(load_table::<Product, _>(&path)?.is_empty());
        Ok(())
    }
}
