//! Google Drive API response envelopes
//!
//! The client does not model Drive resources. Files and comments stay
//! `serde_json::Value`s; only the pieces the client itself reads are typed.

use serde::Deserialize;
use serde_json::Value;

/// One page of a v2 listing (`files.list`, `comments.list`)
///
/// See: https://developers.google.com/drive/api/v2/reference/files/list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage {
    /// Resources on this page, in server order
    #[serde(default)]
    pub items: Vec<Value>,

    /// Cursor for the next page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ItemsPage {
    /// The cursor to follow, if pagination should continue.
    ///
    /// An empty token ends pagination just like a missing one.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// The fields of a file resource needed to recover an expired download link
///
/// See: https://developers.google.com/drive/api/v2/reference/files#resource
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileDownloadInfo {
    #[serde(default)]
    pub download_url: Option<String>,
}
