//! Storefront admin CLI and document server.

pub mod config;
pub mod server;
