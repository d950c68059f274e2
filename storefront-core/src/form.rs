//! Admin form for adding a product.
//!
//! The form holds the editable input, validates it, and writes one document
//! to the `Products` collection on submit:
//!
//! 1. name, price, description and image URL must be set
//! 2. somebody must be signed in
//! 3. a fresh [`ProductId`] is generated and the product is written
//! 4. on success the editable fields are reset
//!
//! Steps 1 and 2 run before any store call. Validation failures are returned
//! to the caller; persistence outcomes also go to the [`Notifier`].

use chrono::Local;
use thiserror::Error;

use crate::models::{localized_timestamp, Product};
use crate::notify::Notifier;
use crate::product_id::ProductId;
use crate::session::{AuthUser, Session};
use crate::store::{Collection, DocumentStore, StoreError};

/// Notification sent after a product was written.
pub const SUCCESS_MESSAGE: &str = "Operation successful!";
/// Notification sent when the write failed.
pub const ERROR_MESSAGE: &str = "An error occurred. Please try again.";
/// Initial value of the image URL field.
pub const DEFAULT_IMAGE_URL: &str = "link";

/// Input rejected before anything was written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("User is not authenticated")]
    Unauthenticated,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save product: {0}")]
    Persistence(#[source] StoreError),
}

/// Editable state of the add-product form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub stock: u32,
    pub image_url: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: 0.0,
            description: String::new(),
            category: String::new(),
            stock: 0,
            image_url: DEFAULT_IMAGE_URL.to_string(),
        }
    }
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that the required fields are set. Category and stock are not
    /// checked; a price of zero counts as unset.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let price_set = self.price != 0.0 && !self.price.is_nan();
        if self.name.is_empty()
            || !price_set
            || self.description.is_empty()
            || self.image_url.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }

    /// Restores name, price, description, category and stock to their
    /// defaults. The image URL keeps its value.
    pub fn reset(&mut self) {
        let defaults = Self::default();
        self.name = defaults.name;
        self.price = defaults.price;
        self.description = defaults.description;
        self.category = defaults.category;
        self.stock = defaults.stock;
    }

    /// Builds the product document for this input.
    ///
    /// `CreatedAt` is the author's account-creation time in the local zone,
    /// not the submission time.
    pub fn build_product(&self, id: ProductId, author: &AuthUser) -> Product {
        Product::new(id, self.name.clone(), self.price)
            .with_description(self.description.clone())
            .with_category(self.category.clone())
            .with_stock(self.stock)
            .with_created_at(localized_timestamp(author.created_at, &Local))
    }

    /// Validates the input and writes a new product.
    ///
    /// Every successful call creates a new document with a new id, even for
    /// identical input.
    pub async fn submit<S, N>(
        &mut self,
        store: &S,
        session: &Session,
        notifier: &N,
    ) -> Result<Product, SubmitError>
    where
        S: DocumentStore + ?Sized,
        N: Notifier + ?Sized,
    {
        self.validate()?;
        let author = session
            .current_user()
            .ok_or(ValidationError::Unauthenticated)?;

        let product = self.build_product(ProductId::new(), &author);
        let written = match product.to_fields() {
            Ok(fields) => {
                store
                    .set_document(Collection::Products.name(), product.id.as_str(), fields)
                    .await
            }
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => {
                tracing::info!("Added product {} ({})", product.id, product.name);
                notifier.notify_success(SUCCESS_MESSAGE);
                self.reset();
                Ok(product)
            }
            Err(e) => {
                tracing::error!("Failed to add product {}: {}", product.name, e);
                notifier.notify_error(ERROR_MESSAGE);
                Err(SubmitError::Persistence(e))
            }
        }
    }
}
