//! Home feed pagination
//!
//! A [`FeedState`] holds the summaries shown so far and the cursor to the next
//! page. Loading more is a pure transition: [`FeedState::fetch_next`] issues one
//! request through a [`PageFetcher`] and returns a new state with the page
//! appended.
//!
//! Calls must not overlap for the same state. Two in-flight `fetch_next` calls
//! would both start from the same items and cursor, and whichever finishes last
//! would replace the other's result. Callers disable their "load more" trigger
//! until the pending call resolves.

use std::future::Future;

use serde::Serialize;

use super::{FeedPage, PostSummary};
use crate::error::{BlogError, Result};

/// Retrieves a feed page from an opaque cursor
pub trait PageFetcher {
    fn fetch_page(&self, cursor: &str) -> impl Future<Output = Result<FeedPage>> + Send;
}

/// Client-held feed: items in first-seen order plus the next-page cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedState {
    items: Vec<PostSummary>,
    cursor: Option<String>,
}

impl FeedState {
    /// Seed the feed from the first page
    pub fn initialize(page: FeedPage) -> Self {
        Self {
            items: page.results,
            cursor: page.next_page,
        }
    }

    pub fn items(&self) -> &[PostSummary] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    /// Fetch the page behind the cursor and append it.
    ///
    /// Exactly one request is made; failures are returned as-is with no retry.
    /// Calling this on an exhausted feed is an [`BlogError::InvalidCursor`].
    /// Items are not de-duplicated.
    pub async fn fetch_next<F: PageFetcher>(&self, fetcher: &F) -> Result<FeedState> {
        let cursor = self
            .cursor
            .as_deref()
            .ok_or_else(|| BlogError::InvalidCursor("feed has no further pages".to_string()))?;

        tracing::debug!("Fetching next feed page: {}", cursor);
        let page = fetcher.fetch_page(cursor).await?;

        let mut items = Vec::with_capacity(self.items.len() + page.results.len());
        items.extend_from_slice(&self.items);
        items.extend(page.results);

        Ok(FeedState {
            items,
            cursor: page.next_page,
        })
    }
}
