//! One-shot catalog ingestion.
//!
//! Parses a TOML resource with a top-level `products` array of tables into
//! an ordered sequence of [`Product`] records. The load runs exactly once
//! per process, fails fast on the first malformed entry, and rejects
//! duplicate product ids so every later lookup is unambiguous.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use toml::Value;
use tracing::info;

use crate::domain::product::{Product, ProductId};
use crate::errors::LoadError;

/// Parses catalog text that is already in memory.
///
/// A document without a `products` key yields an empty sequence; an empty
/// catalog is valid, a malformed one is not.
pub fn load_str(input: &str) -> Result<Vec<Product>, LoadError> {
    let document: Value = toml::from_str(input)?;
    let products = extract_products(&document)?;
    info!(record_count = products.len(), "catalog loaded");
    Ok(products)
}

/// Reads the stream to completion and parses it. The stream is consumed and
/// dropped when this returns, success or failure.
pub fn load_reader<R: Read>(mut reader: R) -> Result<Vec<Product>, LoadError> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .map_err(|source| LoadError::Resource { path: PathBuf::from("<stream>"), source })?;
    load_str(&raw)
}

/// Opens and parses a catalog file. Open/read failures surface as
/// [`LoadError::Resource`] with the offending path.
pub fn load_path(path: &Path) -> Result<Vec<Product>, LoadError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| LoadError::Resource { path: path.to_path_buf(), source })?;
    load_str(&raw)
}

fn extract_products(document: &Value) -> Result<Vec<Product>, LoadError> {
    let entries = match document.get("products") {
        Some(value) => value.as_array().ok_or_else(|| LoadError::Field {
            index: 0,
            field: "products",
            reason: "is not an array of entries".to_string(),
        })?,
        None => return Ok(Vec::new()),
    };

    let mut products = Vec::with_capacity(entries.len());
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let table = entry.as_table().ok_or_else(|| LoadError::Field {
            index,
            field: "products",
            reason: "entry is not a table of fields".to_string(),
        })?;

        let id = string_field(table, index, "id")?;
        let name = string_field(table, index, "name")?;
        let price = decimal_field(table, index, "price")?;
        let weight = decimal_field(table, index, "weight")?;

        if let Some(&first_index) = seen.get(&id) {
            return Err(LoadError::DuplicateId { id, first_index, index });
        }
        seen.insert(id.clone(), index);

        products.push(Product { id: ProductId(id), name, price, weight });
    }

    Ok(products)
}

/// `id` and `name` accept any scalar and are coerced to its string form.
fn string_field(
    table: &toml::map::Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<String, LoadError> {
    let value = table.get(field).ok_or_else(|| LoadError::Field {
        index,
        field,
        reason: "is missing".to_string(),
    })?;

    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Integer(number) => Ok(number.to_string()),
        Value::Float(number) => Ok(number.to_string()),
        other => Err(LoadError::Field {
            index,
            field,
            reason: format!("is not a string or numeric value (found {})", other.type_str()),
        }),
    }
}

/// `price` and `weight` are coerced to a string and parsed as a decimal, so
/// `9.99` and `"9.99"` yield the identical value.
fn decimal_field(
    table: &toml::map::Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Decimal, LoadError> {
    let raw = string_field(table, index, field)?;
    let value = raw.parse::<Decimal>().map_err(|_| LoadError::Field {
        index,
        field,
        reason: format!("is not a decimal number (`{raw}`)"),
    })?;

    if value < Decimal::ZERO {
        return Err(LoadError::Field {
            index,
            field,
            reason: format!("must be non-negative (`{raw}`)"),
        });
    }

    Ok(value)
}
