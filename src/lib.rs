pub mod config;
pub mod db;
pub mod error;
pub mod form_utils;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod server;
pub mod services;
pub mod state;
pub mod store;

/// Application version from Cargo.toml (single source of truth)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
