//! Formatting and display logic
//!
//! Pure functions for formatting books and result states as plain text lines.

use crate::api::Book;
use crate::model::ResultState;
use crate::utils::format_bytes;

/// Format a single book as one listing line
///
/// # Examples
/// ```
/// use libris::api::Book;
/// use libris::logic::formatting::format_book_line;
///
/// let mut book = Book::new(7, "Dune");
/// book.author = Some("Frank Herbert".to_string());
/// book.year = Some("1965".to_string());
/// book.size = Some(2048);
/// assert_eq!(format_book_line(&book), "Dune - Frank Herbert (1965, 2.00 KB)");
/// ```
pub fn format_book_line(book: &Book) -> String {
    let title = if book.title.trim().is_empty() {
        "(untitled)"
    } else {
        book.title.trim()
    };

    let mut line = title.to_string();
    if let Some(author) = book.author.as_deref().filter(|a| !a.trim().is_empty()) {
        line.push_str(" - ");
        line.push_str(author.trim());
    }

    let details: Vec<String> = [
        book.year
            .as_deref()
            .filter(|y| !y.trim().is_empty())
            .map(|y| y.trim().to_string()),
        book.size.map(format_bytes),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }

    line
}

/// Lines describing a result state
pub fn format_result_state(state: &ResultState) -> Vec<String> {
    match state {
        ResultState::Loading => vec!["Loading books...".to_string()],
        ResultState::EmptyData => {
            vec!["No books loaded. Type 'refresh' to retry.".to_string()]
        }
        ResultState::ConnectionError => vec![
            "No books loaded, no connection. Waiting for the network to come back...".to_string(),
        ],
        ResultState::ApiError { code, message } => vec![format!(
            "No latest books (error {}: {}). Type 'refresh' to retry.",
            code, message
        )],
        ResultState::Success(books) => books
            .iter()
            .enumerate()
            .map(|(idx, book)| format!("{:>4}. [{}] {}", idx + 1, book.id, format_book_line(book)))
            .collect(),
    }
}
