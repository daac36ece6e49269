//! # LearnHub Client
//!
//! Client for the LearnHub e-learning backend: course authoring for
//! instructors, presigned video uploads, student invoices, and accounts.
//!
//! ## Features
//!
//! - **Session Recovery**: one single-flight refresh and one resend per request on 401
//! - **Error Taxonomy**: session expired/revoked (with login redirect), permission denied,
//!   server unavailable, and everything else returned unchanged
//! - **Typed Services**: instructor CRUD, uploads, payments, accounts
//! - **Rate Limiting**: optional per-scope token buckets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use learnhub_client::api::InstructorApi;
//! use learnhub_client::{ClientConfig, HttpClient, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .server("https://learn.example.com")
//!         .build();
//!     let client = Arc::new(HttpClient::new(config)?);
//!
//!     let courses = InstructorApi::new(client).list_courses().await?;
//!     for course in courses {
//!         println!("{}", course.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │        InstructorApi   Uploader   PaymentApi   AccountApi    │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ send(ApiRequest)
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │ HttpClient: classify → 401? → RefreshCoordinator → resend    │
//! │                     → 403 logout? → Navigator("/login")      │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//!                 Transport (reqwest + cookie store)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Refresh coordination and login redirects
pub mod auth;

/// Authenticated HTTP client
pub mod http;

/// Typed API services
pub mod api;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{ApiRequest, ApiResponse, HttpClient};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
