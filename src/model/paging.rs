//! Paging Model
//!
//! State owned exclusively by one `PagingController`. It is created with the
//! default (or persisted) sort and no items, reset on every refresh or sort
//! change, and dropped with the controller.

use crate::api::Book;
use crate::model::sort::SortSpec;

#[derive(Clone, Debug)]
pub struct ControllerState {
    /// Sort used by the current session
    pub current_sort: SortSpec,

    /// Items of the current session, append-only until the next reset
    pub loaded_items: Vec<Book>,

    /// False once the service reported the end of the listing
    pub can_load_more: bool,

    /// A fetch is in flight
    pub is_loading: bool,

    /// Bumped on every issued fetch; outcomes carrying an older value are stale
    pub generation: u64,
}

impl ControllerState {
    pub fn new(current_sort: SortSpec) -> Self {
        Self {
            current_sort,
            loaded_items: Vec::new(),
            can_load_more: true,
            is_loading: false,
            generation: 0,
        }
    }
}

/// Parameters of a single page fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub offset: usize,
    pub sort: SortSpec,
}
