use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::product_id::ProductId;

/// Name of the wishlist field on a `Users` document.
pub const WISHLIST_FIELD: &str = "wishList";

/// A product a user has added to their wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub user_id: String,
    pub product_id: ProductId,
}

impl WishlistEntry {
    pub fn new(user_id: impl Into<String>, product_id: ProductId) -> Self {
        Self {
            user_id: user_id.into(),
            product_id,
        }
    }
}

/// How add-to-wishlist writes the user's remote wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistPolicy {
    /// Overwrite the remote list with just the new entry; the local wishlist
    /// is left as it was.
    #[default]
    Replace,
    /// Append to the remote list and mirror the result locally.
    Append,
}

impl fmt::Display for WishlistPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WishlistPolicy::Replace => write!(f, "replace"),
            WishlistPolicy::Append => write!(f, "append"),
        }
    }
}

impl FromStr for WishlistPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(WishlistPolicy::Replace),
            "append" => Ok(WishlistPolicy::Append),
            _ => Err(format!(
                "Invalid wishlist policy '{}'. Valid options: replace, append",
                s
            )),
        }
    }
}
