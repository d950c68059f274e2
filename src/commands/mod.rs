mod config_cmd;
mod product;
mod wishlist;

pub use config_cmd::ConfigCommand;
pub use product::ProductCommand;
pub use wishlist::WishlistCommand;

use clap::ValueEnum;
use std::sync::Arc;
use storefront::config::Config;
use storefront_core::{AutomergeStore, DocumentStore, HttpStore, Notifier, StoreError};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints notifications to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_success(&self, message: &str) {
        println!("{}", message);
    }

    fn notify_error(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Opens the configured document store: the remote server when `server_url`
/// is set, otherwise the local Automerge files under `data_dir`.
pub fn open_store(config: &Config) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match &config.server_url.value {
        Some(url) => {
            tracing::debug!("Using server at {}", url);
            Ok(Arc::new(HttpStore::new(url)?))
        }
        None => {
            let dir = &config.data_dir.value;
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Io(dir.clone(), e))?;
            tracing::debug!("Using local store at {}", dir.display());
            Ok(Arc::new(AutomergeStore::new(dir.clone())))
        }
    }
}
