//! Tolerant field decoders for documents read back from the store.
//!
//! The store is schemaless and other clients write numbers as strings
//! (`"Price": "499"`). These helpers accept any JSON value and fall back to a
//! default instead of failing, so one odd document never rejects a fetch.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::product::DEFAULT_RATING;
use crate::product_id::ProductId;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Value::deserialize(de).map(as_string)
}

pub fn product_id<'de, D: Deserializer<'de>>(de: D) -> Result<ProductId, D::Error> {
    string(de).map(ProductId::from_stored)
}

pub fn price<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(as_f64(&Value::deserialize(de)?).unwrap_or(0.0))
}

pub fn rating<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(as_f64(&Value::deserialize(de)?).unwrap_or(DEFAULT_RATING))
}

/// Whole units; fractions are truncated and negatives read as zero.
pub fn stock<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(de)?;
    let stock = match &value {
        Value::Number(n) => n.as_u64().map(|u| u.min(u32::MAX as u64) as u32),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(stock
        .or_else(|| as_f64(&value).map(|f| f.max(0.0) as u32))
        .unwrap_or(0))
}

pub fn list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Value>, D::Error> {
    match Value::deserialize(de)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::price")]
        price: f64,
        #[serde(deserialize_with = "super::stock")]
        stock: u32,
        #[serde(deserialize_with = "super::string")]
        name: String,
    }

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_strings() {
        let r = row(json!({ "price": " 499.5 ", "stock": "10", "name": "Top" }));
        assert_eq!(r.price, 499.5);
        assert_eq!(r.stock, 10);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let r = row(json!({ "price": "free", "stock": [1], "name": null }));
        assert_eq!(r.price, 0.0);
        assert_eq!(r.stock, 0);
        assert_eq!(r.name, "");
    }

    #[test]
    fn test_stock_from_float_and_negative() {
        assert_eq!(row(json!({ "price": 1, "stock": 3.7, "name": "a" })).stock, 3);
        assert_eq!(row(json!({ "price": 1, "stock": -2, "name": "a" })).stock, 0);
        assert_eq!(row(json!({ "price": 1, "stock": "2.5", "name": "a" })).stock, 2);
    }

    #[test]
    fn test_non_string_name_is_rendered() {
        assert_eq!(row(json!({ "price": 1, "stock": 1, "name": 42 })).name, "42");
    }
}
