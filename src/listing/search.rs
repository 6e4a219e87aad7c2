//! Server-side search that temporarily replaces a screen's collection.

use crate::api::SearchFilter;
use crate::error::{OpsError, Result};

/// A search the caller should send to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub filter: SearchFilter,
}

#[derive(Debug)]
pub enum SearchOutcome {
    Applied { found: usize },
    Stale,
    Failed(OpsError),
}

#[derive(Debug, Clone)]
pub struct SearchOverlay<T> {
    query: String,
    results: Vec<T>,
    searching: bool,
    generation: u64,
}

impl<T> Default for SearchOverlay<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            searching: false,
            generation: 0,
        }
    }
}

impl<T> SearchOverlay<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit `query`. Blank input clears the search and returns `None`;
    /// otherwise returns the request to send. Any earlier request is
    /// superseded either way.
    pub fn search(&mut self, query: &str) -> Option<SearchRequest> {
        self.generation += 1;

        let Some(filter) = SearchFilter::classify(query) else {
            self.clear();
            return None;
        };

        self.query = query.trim().to_string();
        self.searching = true;
        Some(SearchRequest {
            generation: self.generation,
            filter,
        })
    }

    pub fn complete(&mut self, request: SearchRequest, result: Result<Vec<T>>) -> SearchOutcome {
        if request.generation != self.generation {
            tracing::debug!(
                request = request.generation,
                current = self.generation,
                "dropping stale search response"
            );
            return SearchOutcome::Stale;
        }

        self.searching = false;
        match result {
            Ok(results) => {
                let found = results.len();
                self.results = results;
                SearchOutcome::Applied { found }
            }
            Err(e) => SearchOutcome::Failed(e),
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.searching = false;
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The collection to show: search results while a query is active,
    /// otherwise `base` untouched.
    pub fn display<'a>(&'a self, base: &'a [T]) -> &'a [T] {
        if self.is_active() {
            &self.results
        } else {
            base
        }
    }

    /// Placeholder text for an active search with nothing to show
    pub fn empty_message(&self) -> Option<String> {
        if self.is_active() && !self.searching && self.results.is_empty() {
            Some(format!("{} not found.", self.query))
        } else {
            None
        }
    }
}
