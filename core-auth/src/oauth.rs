//! OAuth 2.0 refresh-token grant (RFC 6749 section 6)
//!
//! # Overview
//!
//! [`TokenRefresher`] exchanges a long-lived refresh token for a new access
//! token. It performs exactly one POST per call: callers decide whether a
//! failed refresh is worth repeating.
//!
//! # Security
//!
//! Never logs token values or the client secret.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::TokenRefresher;
//! use core_runtime::config::DriveConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let refresher = TokenRefresher::new(&DriveConfig::default(), http_client);
//! let token = refresher
//!     .refresh_access_token("1//0g-refresh", "client-id", "client-secret")
//!     .await?;
//! println!("expires in {:?}s", token.expires_in);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::RefreshedToken;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_runtime::config::DriveConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

/// Performs refresh-token grants against a token endpoint.
pub struct TokenRefresher {
    token_url: String,
    timeout: Duration,
    http_client: Arc<dyn HttpClient>,
}

impl TokenRefresher {
    /// Create a refresher posting to `config.token_url`.
    pub fn new(config: &DriveConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            token_url: config.token_url.clone(),
            timeout: config.request_timeout,
            http_client,
        }
    }

    /// The endpoint this refresher posts to.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Refresh an access token using a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The transport fails ([`AuthError::NetworkError`])
    /// - The token endpoint answers with a non-2xx status
    ///   ([`AuthError::TokenRefreshFailed`])
    /// - The body is not JSON or carries no `access_token`
    ///   ([`AuthError::InvalidTokenResponse`])
    #[instrument(skip_all, fields(token_url = %self.token_url))]
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<RefreshedToken> {
        let params = RefreshRequest {
            refresh_token,
            client_id,
            client_secret,
            grant_type: "refresh_token",
        };

        tracing::debug!("Refreshing access token");

        let request = HttpRequest::new(HttpMethod::Post, self.token_url.clone())
            .form(&params)
            .map_err(|e| AuthError::Other(format!("Failed to encode token request: {}", e)))?
            .timeout(self.timeout);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(status, error = %body, "Token endpoint rejected refresh");

            return Err(AuthError::TokenRefreshFailed { status, body });
        }

        let token_response: TokenResponse = response.json().map_err(|e| {
            AuthError::InvalidTokenResponse(format!("Failed to parse token response: {}", e))
        })?;

        let access_token = token_response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AuthError::InvalidTokenResponse("missing access_token in response".to_string())
            })?;

        tracing::info!(
            expires_in = ?token_response.expires_in,
            "Successfully refreshed access token"
        );

        Ok(RefreshedToken {
            access_token,
            expires_in: token_response.expires_in,
            token_type: token_response.token_type,
        })
    }
}

/// Form body of the refresh-token grant.
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'static str,
}

/// Token response from the OAuth provider.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
}
