//! Shared types for the Model
//!
//! These types are used across the controller, the catalog client and the
//! driver, and represent the fundamental paging concepts.

use thiserror::Error;

use crate::api::Book;

/// Alternate download locations for a single book
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mirrors(pub Vec<String>);

impl Mirrors {
    pub fn urls(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One page of catalog results
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Book>,
    pub has_more: bool,
}

impl Page {
    pub fn new(items: Vec<Book>, has_more: bool) -> Self {
        Self { items, has_more }
    }

    /// Terminal empty page
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Why a page fetch failed. A fetch either fully succeeds or fails with one of these.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// No network path to the catalog service
    #[error("connection unavailable: {0}")]
    ConnectionUnavailable(String),

    /// The service answered but rejected the request
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },
}

impl FetchFailure {
    pub fn api(code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable(_))
    }
}
