//! Error types for the Google Drive client

use thiserror::Error;

/// Google Drive client errors
///
/// HTTP status codes are not errors: every operation hands the raw response
/// back to the caller. These variants cover what happens around the call.
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// Refreshing the access token failed
    #[error("Authentication failed: {0}")]
    Auth(#[from] core_auth::AuthError),

    /// A listing page came back with a non-success status
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Transport failure
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;
