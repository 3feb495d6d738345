//! # Reel Catalog Client
//!
//! Read-only client for the media catalog API with mobile-aware network
//! tuning:
//! - [`dispatch::RequestDispatcher`] caps how many catalog requests are in
//!   flight at once (FIFO start order, per-task failure isolation)
//! - [`retry::retry_request`] wraps each attempt in a fresh timeout window
//!   and retries transient failures a bounded number of times
//! - [`client::CatalogClient`] composes both around `reqwest`
//! - [`urls`] builds image and player-embed URLs

pub mod client;
pub mod dispatch;
pub mod error;
pub mod retry;
pub mod types;
pub mod urls;

pub use client::{CatalogClient, TrendingWindow};
pub use dispatch::{DispatchError, RequestDispatcher};
pub use error::CatalogError;
pub use retry::{retry_request, RetryPolicy};
