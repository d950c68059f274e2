use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;
use crate::product_id::ProductId;
use crate::store::{Document, Fields, StoreError};

/// Rating given to every newly created product.
pub const DEFAULT_RATING: f64 = 5.0;

fn default_rating() -> f64 {
    DEFAULT_RATING
}

/// A document in the `Products` collection.
///
/// Field names on the wire are PascalCase (`Name`, `Price`, ...). Reading is
/// lenient: every field is optional, numbers may arrive as strings, and
/// values that cannot be read fall back to their defaults. A missing `Id` is
/// taken from the document id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(deserialize_with = "lenient::product_id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::price")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    /// Localized account-creation time of the admin who added the product.
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default = "default_rating", deserialize_with = "lenient::rating")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub reviews: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::stock")]
    pub stock: u32,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            description: String::new(),
            created_at: String::new(),
            rating: DEFAULT_RATING,
            reviews: Vec::new(),
            category: String::new(),
            stock: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Encodes the product as the top-level fields of its document.
    pub fn to_fields(&self) -> Result<Fields, StoreError> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(StoreError::Serialization(format!(
                "product encoded as {} instead of an object",
                other
            ))),
            Err(e) => Err(StoreError::Serialization(e.to_string())),
        }
    }

    /// Decodes a product from a document's data payload.
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        let Document { id, mut data } = document;
        if !data.contains_key("Id") {
            data.insert("Id".to_string(), serde_json::Value::String(id.clone()));
        }
        serde_json::from_value(serde_json::Value::Object(data))
            .map_err(|e| StoreError::Serialization(format!("document {}: {}", id, e)))
    }
}

/// Renders an instant the way the storefront displays dates:
/// `M/D/YYYY, h:mm:ss AM`.
pub fn localized_timestamp<Tz>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    instant
        .with_timezone(tz)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "Id: {}", self.id)?;
        writeln!(f, "Price: {}", self.price)?;
        if !self.category.is_empty() {
            writeln!(f, "Category: {}", self.category)?;
        }
        writeln!(f, "Stock: {}", self.stock)?;
        writeln!(f, "Rating: {:.1} ({} review(s))", self.rating, self.reviews.len())?;
        if !self.created_at.is_empty() {
            writeln!(f, "Created: {}", self.created_at)?;
        }
        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Product {
        Product::new(ProductId::parse("1b4e28ba-2fa1-11").unwrap(), "Kurti A", 499.0)
            .with_description("desc")
            .with_category("Kurti")
            .with_stock(10)
            .with_created_at("1/1/2023, 12:00:00 AM")
    }

    #[test]
    fn test_product_new_defaults() {
        let product = Product::new(ProductId::new(), "Top", 250.0);
        assert_eq!(product.rating, DEFAULT_RATING);
        assert!(product.reviews.is_empty());
        assert!(product.category.is_empty());
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_to_fields_uses_pascal_case() {
        let fields = sample().to_fields().unwrap();
        assert_eq!(fields["Id"], json!("1b4e28ba-2fa1-11"));
        assert_eq!(fields["Name"], json!("Kurti A"));
        assert_eq!(fields["Price"], json!(499.0));
        assert_eq!(fields["Description"], json!("desc"));
        assert_eq!(fields["CreatedAt"], json!("1/1/2023, 12:00:00 AM"));
        assert_eq!(fields["Rating"], json!(5.0));
        assert_eq!(fields["Reviews"], json!([]));
        assert_eq!(fields["Category"], json!("Kurti"));
        assert_eq!(fields["Stock"], json!(10));
        assert_eq!(fields.len(), 9);
    }

    #[test]
    fn test_from_document_minimal_payload() {
        let data = json!({ "Id": "1b4e28ba-2fa1-11", "Name": "Pant", "Price": 300 });
        let document = Document {
            id: "1b4e28ba-2fa1-11".to_string(),
            data: data.as_object().unwrap().clone(),
        };

        let product = Product::from_document(document).unwrap();
        assert_eq!(product.name, "Pant");
        assert_eq!(product.price, 300.0);
        assert_eq!(product.rating, DEFAULT_RATING);
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_from_document_string_numbers() {
        let data = json!({
            "Id": "2c5f39cb-3ab2-22",
            "Name": "Kurti A",
            "Price": "499",
            "Stock": "10",
            "Rating": "4.5",
            "Category": "Kurti"
        });
        let document = Document {
            id: "2c5f39cb-3ab2-22".to_string(),
            data: data.as_object().unwrap().clone(),
        };

        let product = Product::from_document(document).unwrap();
        assert_eq!(product.price, 499.0);
        assert_eq!(product.stock, 10);
        assert_eq!(product.rating, 4.5);
        assert_eq!(product.category, "Kurti");
    }

    #[test]
    fn test_from_document_sparse_payload() {
        let data = json!({ "Price": 300, "Reviews": "none" });
        let document = Document {
            id: "legacy-product-7".to_string(),
            data: data.as_object().unwrap().clone(),
        };

        let product = Product::from_document(document).unwrap();
        assert_eq!(product.id.as_str(), "legacy-product-7");
        assert!(product.name.is_empty());
        assert_eq!(product.price, 300.0);
        assert!(product.reviews.is_empty());
        assert_eq!(product.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_localized_timestamp_utc() {
        let instant = DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(localized_timestamp(instant, &Utc), "1/1/2023, 12:00:00 AM");
    }

    #[test]
    fn test_localized_timestamp_afternoon_offset() {
        let instant = DateTime::parse_from_rfc3339("2023-07-15T09:05:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let ist = chrono::FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(localized_timestamp(instant, &ist), "7/15/2023, 2:35:30 PM");
    }

    #[test]
    fn test_product_display() {
        let output = format!("{}", sample());
        assert!(output.contains("Kurti A"));
        assert!(output.contains("Price: 499"));
        assert!(output.contains("Category: Kurti"));
        assert!(output.contains("Rating: 5.0 (0 review(s))"));
    }
}
