//! Authenticated HTTP client
//!
//! Issues requests against the backend scopes and recovers from an expired
//! session exactly once per logical request:
//! - 401 triggers a single-flight refresh, then one resend
//! - 403 with a `logout` flag revokes the session, otherwise it is surfaced
//! - 5xx is surfaced as `ServerUnavailable` without retrying
//! - anything else is returned to the caller unchanged

use super::rate_limit::RateLimiter;
use super::request::{ApiRequest, ApiResponse};
use super::transport::{ReqwestTransport, Transport};
use crate::auth::{
    ForbiddenBody, Navigator, RefreshCoordinator, RefreshOutcome, RefreshResponse,
    TracingNavigator,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{ApiScope, ConcurrentRefreshPolicy};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// HTTP client with session refresh and retry
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    coordinator: Arc<RefreshCoordinator>,
    navigator: Arc<dyn Navigator>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client over reqwest with its own refresh coordinator
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_parts(
            config,
            Arc::new(transport),
            Arc::new(RefreshCoordinator::new()),
            Arc::new(TracingNavigator),
        ))
    }

    /// Create a client from explicit collaborators
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        coordinator: Arc<RefreshCoordinator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);
        Self {
            transport,
            config,
            coordinator,
            navigator,
            rate_limiter,
        }
    }

    /// Replace the redirect target handler
    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Share a refresh coordinator with other clients
    #[must_use]
    pub fn with_coordinator(mut self, coordinator: Arc<RefreshCoordinator>) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Refresh coordinator used by this client
    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Send a request, recovering once from an expired session
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.dispatch(&request).await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED && !request.retried {
            return self.recover_session(request, response).await;
        }

        self.classify(response)
    }

    /// Send a request and parse the JSON response
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        response.json()
    }

    /// GET on the general scope
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::get(path)).await
    }

    /// GET on the general scope and parse JSON
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(ApiRequest::get(path)).await
    }

    /// POST a JSON body on the general scope
    pub async fn post(&self, path: &str, body: serde_json::Value) -> Result<ApiResponse> {
        self.send(ApiRequest::post(path).json(body)).await
    }

    /// Ask the backend for a fresh session outside of any failed request
    ///
    /// Takes the same single-flight slot as automatic refreshes. Returns
    /// `Ok(false)` when another refresh was already in flight.
    pub async fn refresh(&self) -> Result<bool> {
        let Some(guard) = self.coordinator.begin() else {
            return Ok(false);
        };

        match self.refresh_session().await {
            Ok(()) => {
                guard.settle(RefreshOutcome::Succeeded);
                Ok(true)
            }
            Err(e) => {
                guard.settle(RefreshOutcome::Failed);
                self.redirect_to_login();
                Err(e)
            }
        }
    }

    /// 401 on a request that has not been retried yet
    async fn recover_session(
        &self,
        request: ApiRequest,
        response: ApiResponse,
    ) -> Result<ApiResponse> {
        let waiter = self.coordinator.subscribe();

        let Some(guard) = self.coordinator.begin() else {
            return match self.config.concurrent_refresh {
                ConcurrentRefreshPolicy::FallThrough => {
                    debug!(
                        "401 on {} {} while a refresh is in flight, not recovering",
                        request.method, request.path
                    );
                    Err(Error::Unhandled(response))
                }
                ConcurrentRefreshPolicy::AwaitInFlight => {
                    debug!(
                        "401 on {} {} while a refresh is in flight, waiting for it",
                        request.method, request.path
                    );
                    match waiter.settled().await {
                        RefreshOutcome::Succeeded => self.resend(request).await,
                        RefreshOutcome::Failed => Err(Error::Unhandled(response)),
                    }
                }
            };
        };

        info!(
            "401 on {} {}, refreshing session",
            request.method, request.path
        );

        match self.refresh_session().await {
            Ok(()) => {
                guard.settle(RefreshOutcome::Succeeded);
                self.resend(request).await
            }
            Err(e) => {
                guard.settle(RefreshOutcome::Failed);
                self.redirect_to_login();
                Err(e)
            }
        }
    }

    /// Resend once after a successful refresh; the outcome is final
    async fn resend(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        request.retried = true;
        debug!("Retrying {} {} after refresh", request.method, request.path);
        let response = self.dispatch(&request).await?;
        self.classify(response)
    }

    /// Call the refresh endpoint directly through the transport
    async fn refresh_session(&self) -> Result<()> {
        let request = ApiRequest::post(self.config.refresh_path.as_str()).scope(ApiScope::User);

        let response = self
            .dispatch(&request)
            .await
            .map_err(|e| Error::session_expired(format!("refresh request failed: {e}")))?;

        if !response.is_success() {
            return Err(Error::session_expired(format!(
                "refresh rejected with HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: RefreshResponse = response
            .json()
            .map_err(|e| Error::session_expired(format!("unreadable refresh response: {e}")))?;

        if body.success {
            debug!("Session refreshed");
            Ok(())
        } else {
            Err(Error::session_expired(
                body.message
                    .unwrap_or_else(|| "refresh token rejected".to_string()),
            ))
        }
    }

    /// Map a settled response onto the error taxonomy
    fn classify(&self, response: ApiResponse) -> Result<ApiResponse> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            let body: ForbiddenBody = response
                .json_value()
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default();

            if body.wants_logout() {
                warn!("Server revoked the session");
                self.redirect_to_login();
                return Err(Error::SessionRevoked);
            }

            return Err(Error::permission_denied(
                body.message.unwrap_or_else(|| response.text_lossy()),
            ));
        }

        if status.is_server_error() {
            warn!("Server error {}", status.as_u16());
            return Err(Error::ServerUnavailable {
                status: status.as_u16(),
                body: response.text_lossy(),
            });
        }

        Err(Error::Unhandled(response))
    }

    /// Rate limit, resolve and hand the request to the transport
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
        if let Some(ref limiter) = self.rate_limiter {
            if !limiter.try_acquire(request.scope) {
                debug!("Rate limited on {:?} scope, waiting", request.scope);
                limiter.wait(request.scope).await;
            }
        }

        let url = self.build_url(request.scope, &request.path);
        let response = self.transport.execute(&url, request).await?;
        debug!(
            "{} {} -> {}",
            request.method,
            url,
            response.status().as_u16()
        );
        Ok(response)
    }

    fn redirect_to_login(&self) {
        self.navigator.redirect(&self.config.login_path);
    }

    /// Build full URL from a scope and path
    pub fn build_url(&self, scope: ApiScope, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url(scope).trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("refreshing", &self.coordinator.is_refreshing())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
