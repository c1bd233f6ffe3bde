//! # Desktop Bridge Implementations
//!
//! Default implementation of the `HttpClient` bridge for desktop platforms
//! (macOS, Windows, Linux), built on `reqwest` with rustls.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let http_client = Arc::new(ReqwestHttpClient::new()?);
//!     // Hand it to GoogleDriveClient::new(...)
//!     Ok(())
//! }
//! ```

mod http;

pub use http::ReqwestHttpClient;
