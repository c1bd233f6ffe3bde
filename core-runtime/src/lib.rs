//! # Core Runtime Module
//!
//! Provides the ambient runtime infrastructure for the Drive client:
//! - Logging and tracing infrastructure
//! - Client configuration with fail-fast validation
//!
//! ## Overview
//!
//! Nothing in here talks to the network. The auth and provider crates read
//! their endpoints and timeouts from [`config::DriveConfig`] and emit
//! `tracing` events that [`logging::init_logging`] routes to stdout.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
