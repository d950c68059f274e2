//! Product synchronization slice.
//!
//! [`ProductState`] mirrors the remote product list and the signed-in user's
//! wishlist. It changes only through [`reduce`], a pure function of the
//! previous state and a [`ProductAction`]. [`ProductSlice`] owns the state,
//! runs the asynchronous operations against a [`DocumentStore`], and feeds
//! each settlement (pending, fulfilled, rejected) back through `reduce`.
//!
//! Operations are not cancelled when superseded: if two fetches overlap, the
//! one that settles last wins.

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use crate::models::{Product, WishlistEntry, WishlistPolicy, WISHLIST_FIELD};
use crate::store::{Collection, DocumentStore, Fields, StoreError};

/// Lifecycle phase of an asynchronous operation.
///
/// `Fulfilled` and `Rejected` are settled phases: the operation is idle again
/// and the phase records how it last ended. The next run moves it back to
/// `Pending`. `Idle` means the operation has never run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// How an asynchronous operation settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

impl<T> Settlement<T> {
    pub fn phase(&self) -> Phase {
        match self {
            Settlement::Pending => Phase::Pending,
            Settlement::Fulfilled(_) => Phase::Fulfilled,
            Settlement::Rejected(_) => Phase::Rejected,
        }
    }
}

/// Result of a fulfilled add-to-wishlist.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistOutcome {
    /// The remote list was overwritten with this entry. The local wishlist
    /// is not touched.
    Replaced(WishlistEntry),
    /// The remote list now holds these entries; the local wishlist mirrors it.
    Appended(Vec<WishlistEntry>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Replace the product list directly.
    SetProduct(Vec<Product>),
    FetchAllProducts(Settlement<Vec<Product>>),
    AddToWishlist(Settlement<WishlistOutcome>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductState {
    pub products: Vec<Product>,
    pub wishlist: Vec<WishlistEntry>,
    pub fetch_all_products: Phase,
    pub add_to_wishlist: Phase,
    /// Why the last fetch was rejected, cleared when a fetch is fulfilled.
    pub fetch_error: Option<String>,
    /// Why the last add-to-wishlist was rejected, cleared when one is fulfilled.
    pub wishlist_error: Option<String>,
}

impl ProductState {
    /// The recorded rejection of either operation, fetch first.
    pub fn last_error(&self) -> Option<&str> {
        self.fetch_error
            .as_deref()
            .or(self.wishlist_error.as_deref())
    }
}

/// Applies an action to the state.
pub fn reduce(mut state: ProductState, action: ProductAction) -> ProductState {
    match action {
        ProductAction::SetProduct(products) => {
            state.products = products;
        }
        ProductAction::FetchAllProducts(settlement) => {
            state.fetch_all_products = settlement.phase();
            match settlement {
                Settlement::Pending => {}
                Settlement::Fulfilled(products) => {
                    state.products = products;
                    state.fetch_error = None;
                }
                Settlement::Rejected(error) => {
                    state.fetch_error = Some(error);
                }
            }
        }
        ProductAction::AddToWishlist(settlement) => {
            state.add_to_wishlist = settlement.phase();
            match settlement {
                Settlement::Pending => {}
                Settlement::Fulfilled(WishlistOutcome::Replaced(_)) => {
                    state.wishlist_error = None;
                }
                Settlement::Fulfilled(WishlistOutcome::Appended(wishlist)) => {
                    state.wishlist = wishlist;
                    state.wishlist_error = None;
                }
                Settlement::Rejected(error) => {
                    state.wishlist_error = Some(error);
                }
            }
        }
    }
    state
}

#[derive(Error, Debug)]
pub enum SliceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed wishlist on user {user_id}: {message}")]
    MalformedWishlist { user_id: String, message: String },
}

/// Owner of a [`ProductState`] bound to a document store.
pub struct ProductSlice<S> {
    store: S,
    policy: WishlistPolicy,
    state: watch::Sender<ProductState>,
}

impl<S: DocumentStore> ProductSlice<S> {
    pub fn new(store: S) -> Self {
        let (state, _) = watch::channel(ProductState::default());
        Self {
            store,
            policy: WishlistPolicy::default(),
            state,
        }
    }

    pub fn with_policy(mut self, policy: WishlistPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> WishlistPolicy {
        self.policy
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ProductState {
        self.state.borrow().clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.borrow().products.clone()
    }

    pub fn wishlist(&self) -> Vec<WishlistEntry> {
        self.state.borrow().wishlist.clone()
    }

    /// Follows every state change.
    pub fn subscribe(&self) -> watch::Receiver<ProductState> {
        self.state.subscribe()
    }

    /// Runs an action through [`reduce`] and publishes the new state.
    pub fn dispatch(&self, action: ProductAction) {
        self.state.send_modify(|state| {
            let previous = std::mem::take(state);
            *state = reduce(previous, action);
        });
    }

    pub fn set_product(&self, products: Vec<Product>) {
        self.dispatch(ProductAction::SetProduct(products));
    }

    /// Reads every document in `Products` and replaces the held list.
    ///
    /// Documents are decoded leniently, so every retrieved document becomes
    /// one product. On failure the held list is kept and the error is both
    /// recorded in `fetch_error` and returned.
    pub async fn fetch_all_products(&self) -> Result<Vec<Product>, SliceError> {
        self.dispatch(ProductAction::FetchAllProducts(Settlement::Pending));

        match self.load_products().await {
            Ok(products) => {
                tracing::debug!("Fetched {} product(s)", products.len());
                self.dispatch(ProductAction::FetchAllProducts(Settlement::Fulfilled(
                    products.clone(),
                )));
                Ok(products)
            }
            Err(e) => {
                tracing::warn!("Fetching products failed: {}", e);
                self.dispatch(ProductAction::FetchAllProducts(Settlement::Rejected(
                    e.to_string(),
                )));
                Err(e)
            }
        }
    }

    async fn load_products(&self) -> Result<Vec<Product>, SliceError> {
        let documents = self
            .store
            .get_collection(Collection::Products.name())
            .await?;

        let products = documents
            .into_iter()
            .map(Product::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Writes `entry` to the user's remote wishlist according to the policy
    /// and returns it.
    pub async fn add_to_wishlist(&self, entry: WishlistEntry) -> Result<WishlistEntry, SliceError> {
        self.dispatch(ProductAction::AddToWishlist(Settlement::Pending));

        let result = match self.policy {
            WishlistPolicy::Replace => self.replace_wishlist(&entry).await,
            WishlistPolicy::Append => self.append_wishlist(&entry).await,
        };

        match result {
            Ok(outcome) => {
                tracing::info!(
                    "Added product {} to wishlist of {}",
                    entry.product_id,
                    entry.user_id
                );
                self.dispatch(ProductAction::AddToWishlist(Settlement::Fulfilled(outcome)));
                Ok(entry)
            }
            Err(e) => {
                tracing::warn!("Adding to wishlist of {} failed: {}", entry.user_id, e);
                self.dispatch(ProductAction::AddToWishlist(Settlement::Rejected(
                    e.to_string(),
                )));
                Err(e)
            }
        }
    }

    async fn replace_wishlist(&self, entry: &WishlistEntry) -> Result<WishlistOutcome, SliceError> {
        self.write_wishlist(&entry.user_id, std::slice::from_ref(entry))
            .await?;
        Ok(WishlistOutcome::Replaced(entry.clone()))
    }

    async fn append_wishlist(&self, entry: &WishlistEntry) -> Result<WishlistOutcome, SliceError> {
        let user_id = entry.user_id.as_str();
        let user = self
            .store
            .get_document(Collection::Users.name(), user_id)
            .await?
            .ok_or_else(|| StoreError::not_found(Collection::Users.name(), user_id))?;

        let mut wishlist: Vec<WishlistEntry> = match user.data.get(WISHLIST_FIELD) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                SliceError::MalformedWishlist {
                    user_id: user_id.to_string(),
                    message: e.to_string(),
                }
            })?,
        };
        if !wishlist.contains(entry) {
            wishlist.push(entry.clone());
        }

        self.write_wishlist(user_id, &wishlist).await?;
        Ok(WishlistOutcome::Appended(wishlist))
    }

    async fn write_wishlist(
        &self,
        user_id: &str,
        wishlist: &[WishlistEntry],
    ) -> Result<(), SliceError> {
        let value = serde_json::to_value(wishlist)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut fields = Fields::new();
        fields.insert(WISHLIST_FIELD.to_string(), value);

        self.store
            .update_document(Collection::Users.name(), user_id, fields)
            .await?;
        Ok(())
    }
}
