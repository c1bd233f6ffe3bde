//! # Host Bridge Traits
//!
//! Transport abstraction shared by the auth and provider crates.
//!
//! ## Overview
//!
//! Every network round-trip made by the Drive client crosses the
//! [`HttpClient`](http::HttpClient) trait. The desktop implementation lives
//! in `bridge-desktop` (backed by `reqwest`); tests substitute a `mockall`
//! mock so that the number and order of calls can be asserted exactly.
//!
//! ## Error Handling
//!
//! Transport failures (connection refused, timeouts, TLS) are reported as
//! [`BridgeError`](error::BridgeError). HTTP status codes are *not* errors at
//! this layer: a 401 or 404 is a perfectly valid [`HttpResponse`].
//!
//! ## Thread Safety
//!
//! `HttpClient` requires `Send + Sync` so one transport can be shared behind
//! an `Arc` by the token refresher and the API client.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, StreamingResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//!
//!     async fn execute_stream(&self, request: HttpRequest) -> Result<StreamingResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, StreamingResponse};
