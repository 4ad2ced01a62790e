//! Feed session: the loaded list, pagination cursor, and displayed index.
//!
//! A session lives from mount to teardown. Fetching is split in two halves so
//! the network call can run on another task: [`FeedSession::begin_fetch`]
//! applies the guards and hands out the request, [`FeedSession::finish_fetch`]
//! folds the result back in.

use crate::api::{ApiError, FeedItem, PageRequest};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Next page to request and the fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    size: usize,
}

impl PageCursor {
    pub fn new(size: usize) -> Self {
        Self {
            page: 0,
            size: size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
        }
    }

    fn advance(&mut self) {
        self.page += 1;
    }
}

/// What a completed fetch did to the session.
#[derive(Debug)]
pub enum FetchOutcome {
    /// This many items were appended.
    Appended(usize),
    /// The page was empty; no further fetches will be issued.
    Exhausted,
    /// The fetch failed; state is unchanged apart from the in-flight flag.
    Failed(ApiError),
    /// The result did not belong to the outstanding request and was dropped.
    Stale,
}

#[derive(Debug)]
pub struct FeedSession {
    items: Vec<FeedItem>,
    cursor: PageCursor,
    exhausted: bool,
    in_flight: Option<PageRequest>,
    index: usize,
}

impl FeedSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            cursor: PageCursor::new(page_size),
            exhausted: false,
            in_flight: None,
            index: 0,
        }
    }

    #[cfg(test)]
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The outstanding request, if any.
    pub fn pending(&self) -> Option<PageRequest> {
        self.in_flight
    }

    /// Index of the displayed item. Meaningless while the list is empty.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&FeedItem> {
        self.items.get(self.index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    /// Start loading the next page. Returns `None` without side effects while a
    /// fetch is outstanding or once the feed is exhausted.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || self.exhausted {
            tracing::trace!(
                in_flight = self.in_flight.is_some(),
                exhausted = self.exhausted,
                "fetch suppressed"
            );
            return None;
        }
        let request = self.cursor.request();
        self.in_flight = Some(request);
        tracing::debug!(page = request.page, size = request.size, "fetch issued");
        Some(request)
    }

    /// Complete the outstanding fetch for `request`.
    pub fn finish_fetch(
        &mut self,
        request: PageRequest,
        result: Result<Vec<FeedItem>, ApiError>,
    ) -> FetchOutcome {
        if self.in_flight != Some(request) {
            tracing::warn!(page = request.page, "dropping result for a request not in flight");
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(items) if items.is_empty() => {
                self.exhausted = true;
                tracing::info!(page = request.page, total = self.items.len(), "feed exhausted");
                FetchOutcome::Exhausted
            }
            Ok(items) => {
                let count = items.len();
                self.items.extend(items);
                self.cursor.advance();
                tracing::debug!(page = request.page, count, total = self.items.len(), "page appended");
                FetchOutcome::Appended(count)
            }
            Err(e) => {
                tracing::error!(page = request.page, error = %e, "feed fetch failed");
                FetchOutcome::Failed(e)
            }
        }
    }

    pub fn can_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index + 1 < self.items.len()
    }

    pub fn is_viewing_last(&self) -> bool {
        self.last_index() == Some(self.index)
    }

    /// Step back one item. Returns whether the displayed item changed.
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one item. Returns whether the displayed item changed.
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.index += 1;
        true
    }
}
