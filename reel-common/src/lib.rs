//! # Reel Common Library
//!
//! Shared code for the Reel services including:
//! - Error types
//! - Network tuning profiles (timeout/retry/concurrency)
//! - Catalog and stream-proxy configuration loading

pub mod config;
pub mod error;

pub use config::{CatalogConfig, ClientClass, NetworkProfile, Settings, StreamConfig};
pub use error::{Error, Result};
