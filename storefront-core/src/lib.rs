//! Storefront Core Library
//!
//! Product models, document stores, the authentication session and the
//! product state slice shared by the Storefront CLI and server.

pub mod form;
pub mod models;
pub mod notify;
pub mod product_id;
pub mod session;
pub mod slice;
pub mod store;

pub use form::{ProductForm, SubmitError, ValidationError};
pub use models::{Category, Product, WishlistEntry, WishlistPolicy};
pub use notify::{LogNotifier, MemoryNotifier, Notification, Notifier};
pub use product_id::{ProductId, ProductIdError};
pub use session::{AuthSubscription, AuthUser, Session};
pub use slice::{
    reduce, Phase, ProductAction, ProductSlice, ProductState, Settlement, SliceError,
    WishlistOutcome,
};
pub use store::{
    AutomergeStore, Collection, Document, DocumentStore, Fields, HttpStore, MemoryStore,
    StoreError,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
