//! Lazy pagination over v2 listing endpoints
//!
//! A page is fetched only when the consumer polls past the last buffered
//! item, so dropping the stream early never costs an extra request.

use std::collections::VecDeque;
use std::future::Future;

use bridge_traits::http::HttpResponse;
use futures::stream::{self, Stream};
use serde_json::Value;
use tracing::debug;

use crate::error::{GoogleDriveError, Result};
use crate::types::ItemsPage;

enum Cursor {
    First,
    Next(String),
    Exhausted,
}

struct PageState<F> {
    fetch: F,
    buffer: VecDeque<Value>,
    cursor: Cursor,
}

/// Turn a page fetcher into a stream of items.
///
/// `fetch` receives the page token to request (`None` for the first page).
/// The stream ends after the first page without a continuation token, or
/// right after yielding an error.
pub(crate) fn paginate<'a, F, Fut>(fetch: F) -> impl Stream<Item = Result<Value>> + 'a
where
    F: FnMut(Option<String>) -> Fut + 'a,
    Fut: Future<Output = Result<HttpResponse>> + 'a,
{
    let initial = PageState {
        fetch,
        buffer: VecDeque::new(),
        cursor: Cursor::First,
    };

    stream::try_unfold(initial, advance::<F, Fut>)
}

async fn advance<F, Fut>(mut state: PageState<F>) -> Result<Option<(Value, PageState<F>)>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<HttpResponse>>,
{
    loop {
        if let Some(item) = state.buffer.pop_front() {
            return Ok(Some((item, state)));
        }

        let page_token = match std::mem::replace(&mut state.cursor, Cursor::Exhausted) {
            Cursor::Exhausted => return Ok(None),
            Cursor::First => None,
            Cursor::Next(token) => Some(token),
        };

        let response = (state.fetch)(page_token).await?;
        let page = parse_page(&response)?;

        debug!(
            items = page.items.len(),
            has_next = page.continuation().is_some(),
            "Fetched listing page"
        );

        if let Some(token) = page.continuation() {
            state.cursor = Cursor::Next(token.to_string());
        }
        state.buffer.extend(page.items);
    }
}

fn parse_page(response: &HttpResponse) -> Result<ItemsPage> {
    if !response.is_success() {
        return Err(GoogleDriveError::ApiError {
            status_code: response.status,
            message: String::from_utf8_lossy(&response.body).to_string(),
        });
    }

    serde_json::from_slice(&response.body).map_err(|e| {
        GoogleDriveError::ParseError(format!("Failed to parse listing page: {}", e))
    })
}
