//! InOpen Dashboard Client
//!
//! Fetches the link analytics dashboard (click counts, top links, recent
//! links and a chart breakdown) from the InOpen API. The payload is decoded
//! into typed models and published as observable state for a presentation
//! layer to render.
//!
//! # Features
//!
//! - **Strict decoding**: the wire payload maps onto [`DashboardResponse`]
//!   or fails as a whole
//! - **Observable state**: [`DashboardStore`] publishes top links, recent
//!   links and chart points as one atomic snapshot over a watch channel
//! - **Fail-silent refresh**: failures go to the diagnostic logger and
//!   never clear what is already on screen
//! - **Injected configuration**: endpoint and bearer token come from a
//!   builder or the environment, never from source
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use inopen_dashboard::{DashboardClient, DashboardStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DashboardClient::builder()
//!         .api_token("your.jwt.token")
//!         .build()?;
//!
//!     let store = DashboardStore::start(Arc::new(client))?;
//!     store.wait_idle().await;
//!
//!     for link in store.top_links() {
//!         println!("{} -> {}", link.title, link.web_link);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod store;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{DashboardClient, DashboardClientBuilder};
pub use config::DashboardConfig;
pub use errors::{DashboardError, DashboardResult};
pub use store::{DashboardSnapshot, DashboardStore, FetchOutcome};

// Type re-exports
pub use types::{ChartPoint, DashboardData, DashboardResponse, Link, ListId};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
