use core_runtime::logging::redact_if_sensitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// OAuth 2.0 credentials for one Drive account.
///
/// The access token is the only value that changes over the lifetime of a
/// client; the refresh token and the client id/secret stay fixed.
///
/// # Security
///
/// Tokens should be stored securely and never logged. The `Debug`
/// implementation redacts every secret.
///
/// # Examples
///
/// ```
/// use core_auth::Credentials;
///
/// let credentials = Credentials::new("ya29.a0...", "1//0g...", "client-id", "client-secret");
/// assert_eq!(credentials.client_id, "client-id");
/// assert!(!format!("{:?}", credentials).contains("ya29"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// The access token used for API requests
    pub access_token: String,
    /// The refresh token used to obtain new access tokens
    pub refresh_token: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
}

impl Credentials {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("access_token", &self.access_token),
            ("refresh_token", &self.refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];

        let mut debug = f.debug_struct("Credentials");
        for (name, value) in fields {
            debug.field(name, &redact_if_sensitive(name, value));
        }
        debug.finish()
    }
}

/// Result of a successful refresh-token grant.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    /// Lifetime in seconds, when the provider reports one
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
}

impl fmt::Debug for RefreshedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshedToken")
            .field(
                "access_token",
                &redact_if_sensitive("access_token", &self.access_token),
            )
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Callback invoked with `(new_access_token, refresh_token)` after every
/// successful refresh, typically to persist the updated credentials.
pub type RefreshCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;
