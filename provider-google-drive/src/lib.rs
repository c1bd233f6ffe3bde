//! # Google Drive Provider
//!
//! Minimal client for the Google Drive v2 REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - File descriptions and paged listings of files and comments
//! - Lazy streams over every page of a listing
//! - Streaming downloads with recovery from expired download links
//! - Transparent OAuth 2.0 access token refresh on 401
//!
//! Responses are returned as-is. Callers inspect the status and parse the
//! body themselves; only transport and token refresh failures are errors.

pub mod client;
pub mod error;
mod pagination;
pub mod types;

pub use client::{GoogleDriveClient, GoogleDriveClientBuilder, QueryParams};
pub use core_auth::{Credentials, RefreshCallback};
pub use error::{GoogleDriveError, Result};
pub use types::ItemsPage;
