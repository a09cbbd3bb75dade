//! Test doubles for the paging controller

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

use libris::api::Book;
use libris::model::{FetchFailure, Mirrors, Page, SortSpec};
use libris::services::{Navigator, PageSource};

/// A fetch the test has to answer
pub struct PendingFetch {
    pub offset: usize,
    pub sort: SortSpec,
    respond: oneshot::Sender<Result<Page, FetchFailure>>,
}

impl PendingFetch {
    /// Answer the fetch. Returns false if the fetching task is already gone.
    pub fn resolve(self, result: Result<Page, FetchFailure>) -> bool {
        self.respond.send(result).is_ok()
    }
}

/// PageSource whose calls are handed to the test to resolve in any order
pub struct ScriptedSource {
    calls_tx: mpsc::UnboundedSender<PendingFetch>,
}

impl ScriptedSource {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingFetch>) {
        let (calls_tx, calls_rx) = mpsc::unbounded_channel();
        (Arc::new(Self { calls_tx }), calls_rx)
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, offset: usize, sort: SortSpec) -> Result<Page, FetchFailure> {
        let (respond, response) = oneshot::channel();
        let _ = self.calls_tx.send(PendingFetch {
            offset,
            sort,
            respond,
        });
        response
            .await
            .unwrap_or_else(|_| Err(FetchFailure::ConnectionUnavailable("test dropped fetch".into())))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub opened: Mutex<Vec<(u64, Mirrors)>>,
}

impl Navigator for RecordingNavigator {
    fn open_book(&self, id: u64, mirrors: Mirrors) {
        self.opened.lock().unwrap().push((id, mirrors));
    }
}

/// `count` books with ids starting at `first_id`, each with two mirrors
pub fn books(first_id: u64, count: u64) -> Vec<Book> {
    (first_id..first_id + count)
        .map(|id| {
            let mut book = Book::new(id, format!("Book {}", id));
            book.mirrors = vec![
                format!("http://mirror-a/{}", id),
                format!("http://mirror-b/{}", id),
            ];
            book
        })
        .collect()
}

pub fn page(first_id: u64, count: u64, has_more: bool) -> Page {
    Page::new(books(first_id, count), has_more)
}
