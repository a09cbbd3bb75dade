//! Navigation capability
//!
//! The listing doesn't know how a book detail screen is shown; it only
//! forwards the book id and its mirrors to whoever implements this.

use crate::model::Mirrors;

pub trait Navigator: Send + Sync {
    /// Open the detail view of a book with its download mirrors
    fn open_book(&self, id: u64, mirrors: Mirrors);
}

/// Navigator that ignores every request
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn open_book(&self, _id: u64, _mirrors: Mirrors) {}
}
