//! Common types used throughout the LearnHub client
//!
//! This module contains shared type definitions, type aliases,
//! and small enums used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Duration of a media file in seconds
pub type Seconds = f64;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        };
        f.write_str(s)
    }
}

// ============================================================================
// API Scope
// ============================================================================

/// Which backend base URL a request is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiScope {
    /// General API (courses, uploads)
    #[default]
    General,
    /// User-scoped API (account, session refresh, payments)
    User,
    /// Admin-scoped API
    Admin,
}

impl std::str::FromStr for ApiScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" | "api" => Ok(ApiScope::General),
            "user" => Ok(ApiScope::User),
            "admin" => Ok(ApiScope::Admin),
            other => Err(format!("unknown API scope: {other}")),
        }
    }
}

// ============================================================================
// Refresh Policy
// ============================================================================

/// What a request does when it sees 401 while another request is refreshing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrentRefreshPolicy {
    /// Propagate the 401 without recovery
    #[default]
    FallThrough,
    /// Wait for the in-flight refresh and retry once if it succeeded
    AwaitInFlight,
}

// ============================================================================
// Upload Types
// ============================================================================

/// Kind of file requested for a presigned upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Thumbnail,
    Video,
}

impl std::str::FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "thumbnail" => Ok(FileKind::Thumbnail),
            "video" => Ok(FileKind::Video),
            other => Err(format!("unknown file kind: {other}")),
        }
    }
}
