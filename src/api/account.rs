//! Account signup, login and logout
//!
//! Login and signup establish the session cookie; after that the transport
//! carries it and this module never touches it.

use super::models::{AuthResponse, LoginRequest, SignupRequest, UserEnvelope, UserProfile};
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::ApiScope;
use std::sync::Arc;
use tracing::info;

/// Account endpoints on the user API
#[derive(Debug, Clone)]
pub struct AccountApi {
    client: Arc<HttpClient>,
}

impl AccountApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Register a new account
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .client
            .send_json(ApiRequest::post("/signup").scope(ApiScope::User).body(request)?)
            .await?;
        info!("Signed up {}", request.email);
        Ok(response)
    }

    /// Start a session
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.client
            .send_json(ApiRequest::post("/login").scope(ApiScope::User).body(request)?)
            .await
    }

    /// End the session
    pub async fn logout(&self) -> Result<AuthResponse> {
        self.client
            .send_json(ApiRequest::post("/logout").scope(ApiScope::User))
            .await
    }

    /// The signed-in user
    pub async fn me(&self) -> Result<UserProfile> {
        let envelope: UserEnvelope = self
            .client
            .send_json(ApiRequest::get("/me").scope(ApiScope::User))
            .await?;
        Ok(envelope.user)
    }
}
