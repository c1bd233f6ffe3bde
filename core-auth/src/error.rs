use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token refresh failed (status {status}): {body}")]
    TokenRefreshFailed { status: u16, body: String },

    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Auth error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
