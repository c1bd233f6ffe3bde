//! # Token Manager
//!
//! Owns the live credentials of one Drive client.
//!
//! ## Overview
//!
//! The access token is replaced in place by [`TokenManager::refresh`]; the
//! refresh token and client credentials never change. After every
//! successful refresh the optional [`RefreshCallback`] is invoked so the
//! host can persist the new token.
//!
//! The token sits behind a `std::sync::RwLock` that is only held for the
//! duration of a read or a write, never across an `.await`.

use crate::error::{AuthError, Result};
use crate::oauth::TokenRefresher;
use crate::types::{Credentials, RefreshCallback};
use core_runtime::logging::mask_token;
use std::fmt;
use std::sync::RwLock;
use tracing::{info, instrument};

pub struct TokenManager {
    access_token: RwLock<String>,
    refresh_token: String,
    client_id: String,
    client_secret: String,
    refresher: TokenRefresher,
    refresh_callback: Option<RefreshCallback>,
}

impl TokenManager {
    pub fn new(
        credentials: Credentials,
        refresher: TokenRefresher,
        refresh_callback: Option<RefreshCallback>,
    ) -> Self {
        Self {
            access_token: RwLock::new(credentials.access_token),
            refresh_token: credentials.refresh_token,
            client_id: credentials.client_id,
            client_secret: credentials.client_secret,
            refresher,
            refresh_callback,
        }
    }

    /// Current access token
    pub fn access_token(&self) -> Result<String> {
        self.access_token
            .read()
            .map(|token| token.clone())
            .map_err(|_| AuthError::Other("access token lock poisoned".to_string()))
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Snapshot of the current credentials
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        })
    }

    /// Run the refresh-token grant and adopt the new access token.
    ///
    /// On failure the stored token is left untouched and the callback is
    /// not invoked.
    #[instrument(skip(self), fields(token_url = %self.refresher.token_url()))]
    pub async fn refresh(&self) -> Result<String> {
        let refreshed = self
            .refresher
            .refresh_access_token(&self.refresh_token, &self.client_id, &self.client_secret)
            .await?;

        {
            let mut token = self
                .access_token
                .write()
                .map_err(|_| AuthError::Other("access token lock poisoned".to_string()))?;
            *token = refreshed.access_token.clone();
        }

        info!(
            token = %mask_token(&refreshed.access_token),
            "Adopted refreshed access token"
        );

        if let Some(callback) = &self.refresh_callback {
            callback(&refreshed.access_token, &self.refresh_token);
        }

        Ok(refreshed.access_token)
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("client_id", &self.client_id)
            .field("token_url", &self.refresher.token_url())
            .field("has_refresh_callback", &self.refresh_callback.is_some())
            .finish()
    }
}
