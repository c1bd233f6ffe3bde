//! Workspace facade crate.
//!
//! Re-exports the pieces a host application needs to talk to Google Drive:
//! the API client, the desktop `reqwest` transport and the runtime helpers
//! (configuration and logging). Enable `desktop-shims` (default) to pull
//! them in without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::ReqwestHttpClient;

#[cfg(feature = "desktop-shims")]
pub use core_runtime::{
    config::DriveConfig,
    logging::{init_logging, LogFormat, LoggingConfig},
};

#[cfg(feature = "desktop-shims")]
pub use provider_google_drive::{
    Credentials, GoogleDriveClient, GoogleDriveError, RefreshCallback, Result,
};
