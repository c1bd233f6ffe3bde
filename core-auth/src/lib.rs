//! # Authentication Module
//!
//! OAuth 2.0 credentials and the refresh-token grant for Google Drive.
//!
//! ## Overview
//!
//! The Drive client never runs an interactive sign-in. It is handed an
//! access token plus the refresh token and client credentials needed to
//! mint a new one, and refreshes lazily when the API answers 401.
//!
//! ## Features
//!
//! - [`Credentials`] with redacted `Debug` output
//! - [`TokenRefresher`] performing a single refresh-token grant
//! - [`TokenManager`] owning the live access token and notifying a
//!   [`RefreshCallback`] after every successful refresh

pub mod error;
pub mod manager;
pub mod oauth;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::TokenManager;
pub use oauth::TokenRefresher;
pub use types::{Credentials, RefreshCallback, RefreshedToken};
