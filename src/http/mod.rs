//! HTTP client module
//!
//! Provides the authenticated HTTP client used by every API service.
//!
//! # Features
//!
//! - **Session Recovery**: one single-flight refresh and one resend per request on 401
//! - **Error Classification**: 403 logout, permission denied, server unavailable
//! - **Pluggable Transport**: reqwest with a cookie store by default
//! - **Rate Limiting**: optional token bucket per API scope using governor

mod client;
mod rate_limit;
mod request;
mod transport;

pub use client::HttpClient;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::{ApiRequest, ApiResponse};
pub use transport::{ReqwestTransport, Transport};
