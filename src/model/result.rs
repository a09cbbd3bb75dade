//! Result states published to observers of the paging controller.

use crate::api::Book;

/// What the listing screen should currently show
#[derive(Clone, Debug, PartialEq)]
pub enum ResultState {
    /// A fresh session is being fetched; show a placeholder
    Loading,
    /// The service returned a valid response with no books at all
    EmptyData,
    /// Every book loaded so far in this sort session
    Success(Vec<Book>),
    /// No network path; retry happens when connectivity comes back
    ConnectionError,
    /// The service rejected the request
    ApiError { code: u16, message: String },
}

impl ResultState {
    /// Books to show; empty for every non-success state
    pub fn items(&self) -> &[Book] {
        match self {
            ResultState::Success(items) => items.as_slice(),
            _ => &[],
        }
    }
}
