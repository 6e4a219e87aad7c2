//! Incremental offset/limit fetching for one screen's collection.
//!
//! The controller does no I/O. [`ListController::load_page`] hands out a
//! [`PageRequest`] describing what to fetch; the caller performs the request
//! and passes the outcome to [`ListController::complete`]. Every request
//! carries the generation it was issued under, and completions from an older
//! generation are dropped, so a slow reset response can never be merged on
//! top of a newer one.

use crate::error::OpsError;

/// How the backing endpoint paginates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// `offset`/`limit` query parameters with a fixed page size
    Offset { limit: usize },
    /// The endpoint returns the whole collection in one response
    Unpaged,
}

/// A fetch the caller should perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub offset: usize,
    /// `None` for unpaged collections
    pub limit: Option<usize>,
}

/// What [`ListController::complete`] did with a response
#[derive(Debug)]
pub enum PageOutcome {
    /// Records were merged; `received` is the count in this response
    Applied { received: usize },
    /// Response belonged to a superseded request and was dropped
    Stale,
    /// The request failed; accumulated records are untouched
    Failed(OpsError),
}

#[derive(Debug, Clone)]
pub struct ListController<T> {
    items: Vec<T>,
    cursor: usize,
    paging: Paging,
    generation: u64,
    in_flight: bool,
    has_more: bool,
    detached: bool,
}

impl<T> ListController<T> {
    pub fn new(paging: Paging) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            paging,
            generation: 0,
            in_flight: false,
            has_more: true,
            detached: false,
        }
    }

    pub fn paged(limit: usize) -> Self {
        Self::new(Paging::Offset {
            limit: limit.max(1),
        })
    }

    pub fn unpaged() -> Self {
        Self::new(Paging::Unpaged)
    }

    /// Start a fetch.
    ///
    /// A reset discards accumulated records and the cursor immediately, and
    /// supersedes any fetch already in flight. A non-reset fetch is refused
    /// while another fetch is in flight.
    pub fn load_page(&mut self, reset: bool) -> Option<PageRequest> {
        if self.detached {
            return None;
        }

        if reset {
            self.generation += 1;
            self.items.clear();
            self.cursor = 0;
            self.has_more = true;
        } else if self.in_flight {
            tracing::debug!(cursor = self.cursor, "page fetch already in flight");
            return None;
        }

        self.in_flight = true;
        let (offset, limit) = match self.paging {
            Paging::Offset { limit } => (self.cursor, Some(limit)),
            Paging::Unpaged => (0, None),
        };

        Some(PageRequest {
            generation: self.generation,
            offset,
            limit,
        })
    }

    /// Scroll reached the end of the list: fetch the next page unless one is
    /// already loading or the last page came back short.
    pub fn on_scroll_end(&mut self) -> Option<PageRequest> {
        if !self.has_more {
            return None;
        }
        self.load_page(false)
    }

    /// Apply the outcome of a request issued by [`load_page`](Self::load_page).
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: crate::error::Result<Vec<T>>,
    ) -> PageOutcome {
        if self.detached || request.generation != self.generation {
            tracing::debug!(
                request = request.generation,
                current = self.generation,
                "dropping stale page response"
            );
            return PageOutcome::Stale;
        }

        self.in_flight = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => return PageOutcome::Failed(e),
        };

        let received = page.len();
        match self.paging {
            Paging::Offset { limit } => {
                self.items.extend(page);
                self.cursor += limit;
                self.has_more = received >= limit;
            }
            Paging::Unpaged => {
                self.items = page;
                self.has_more = false;
            }
        }

        PageOutcome::Applied { received }
    }

    /// The owning screen went away: ignore every outstanding response and
    /// refuse new fetches.
    pub fn detach(&mut self) {
        self.detached = true;
        self.generation += 1;
        self.in_flight = false;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}
