//! Storefront Document Server
//!
//! Serves the `Products` and `Users` collections (and any other valid
//! collection) over HTTP, persisting each collection as an Automerge document.
//!
//! # Configuration
//!
//! Environment variables:
//! - `STOREFRONT_PORT`: Port to listen on (default: 8080)
//! - `STOREFRONT_DATA_DIR`: Directory to store documents (default: ~/.local/share/storefront-server)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint
//! - `GET /collections/{collection}`: All documents in a collection
//! - `GET /collections/{collection}/{id}`: One document, 404 if missing
//! - `PUT /collections/{collection}/{id}`: Overwrite a document
//! - `PATCH /collections/{collection}/{id}`: Merge fields into a document, 404 if missing

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::server;
use storefront_core::AutomergeStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// Directory to store Automerge documents
    data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("STOREFRONT_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let data_dir = std::env::var("STOREFRONT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("storefront-server")
            });

        Self { port, data_dir }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "storefront_server=info,storefront=info,storefront_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    std::fs::create_dir_all(&config.data_dir)?;
    tracing::info!("Data directory: {}", config.data_dir.display());

    let store = Arc::new(AutomergeStore::new(config.data_dir));
    let app = server::router(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
