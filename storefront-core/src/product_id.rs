//! Product identifiers.
//!
//! A product id is the first 16 characters of the hyphenated form of a
//! freshly generated v4 UUID, e.g. `1b4e28ba-2fa1-11`. Ids are never derived
//! from product content, so two identical submissions get different ids.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Number of characters kept from the hyphenated UUID.
pub const PRODUCT_ID_LEN: usize = 16;

/// Errors that can occur when parsing a product ID
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    #[error("Invalid product ID length: expected {PRODUCT_ID_LEN} characters, got {0}")]
    InvalidLength(usize),

    #[error("Invalid character in product ID: {0:?}")]
    InvalidCharacter(char),
}

/// Identifier of a document in the `Products` collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Generate a new random product ID
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Truncate a UUID to its product ID form
    pub fn from_uuid(uuid: Uuid) -> Self {
        let hyphenated = uuid.hyphenated().to_string();
        Self(hyphenated[..PRODUCT_ID_LEN].to_string())
    }

    /// Parse an existing product ID
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let len = s.chars().count();
        if len != PRODUCT_ID_LEN {
            return Err(ProductIdError::InvalidLength(len));
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_hexdigit() && *c != '-') {
            return Err(ProductIdError::InvalidCharacter(c));
        }
        Ok(Self(s.to_string()))
    }

    /// Wraps an id read back from a stored document without validating it.
    pub(crate) fn from_stored(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ProductId {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl Serialize for ProductId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
