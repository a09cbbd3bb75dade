//! Paging controller
//!
//! Owns the latest-books session: current sort, loaded items and whether more
//! pages exist. Public operations are called from one owner task; each fetch
//! runs in its own spawned task and reports back through a channel that the
//! owner drains with `next_outcome` / `apply_outcome`.
//!
//! At most one fetch is in flight. `refresh` and `set_sort` supersede it: the
//! old task is aborted and, should its outcome already be queued, the
//! generation check drops it. `load_next_page` never supersedes.
//!
//! Observers get `ResultState`s through a `watch` channel, so a late
//! subscriber immediately sees the most recent state.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::Book;
use crate::cache::StateStore;
use crate::logic;
use crate::model::{ControllerState, FetchFailure, FetchRequest, Page, ResultState, SortSpec};
use crate::services::navigator::Navigator;

/// Remote collaborator that serves one page at a time
///
/// `offset` is the number of items already loaded in the session, not a page
/// number. Same `(offset, sort)` should give the same page absent data changes.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, offset: usize, sort: SortSpec) -> Result<Page, FetchFailure>;
}

/// A finished fetch, tagged with the generation that issued it
#[derive(Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: Result<Page, FetchFailure>,
}

pub struct PagingController {
    source: Arc<dyn PageSource>,
    store: Box<dyn StateStore>,
    navigator: Arc<dyn Navigator>,
    state: ControllerState,
    state_tx: watch::Sender<ResultState>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    in_flight: Option<JoinHandle<()>>,
}

impl PagingController {
    /// Create the controller and start loading the first page
    ///
    /// The initial sort comes from `store`. Must be called inside a tokio runtime.
    pub fn new(
        source: Arc<dyn PageSource>,
        store: Box<dyn StateStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let initial_sort = logic::sorting::load_sort(store.as_ref()).unwrap_or_else(|e| {
            warn!(error = %e, "could not read persisted sort, using default");
            SortSpec::default_order()
        });

        let (state_tx, _) = watch::channel(ResultState::Loading);
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let mut controller = Self {
            source,
            store,
            navigator,
            state: ControllerState::new(initial_sort),
            state_tx,
            outcome_tx,
            outcome_rx,
            in_flight: None,
        };

        info!(sort = %initial_sort, "paging controller started");
        controller.refresh();
        controller
    }

    /// Subscribe to result states; the current one is available right away
    pub fn subscribe(&self) -> watch::Receiver<ResultState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> ResultState {
        self.state_tx.borrow().clone()
    }

    pub fn current_sort(&self) -> SortSpec {
        self.state.current_sort
    }

    pub fn loaded_items(&self) -> &[Book] {
        &self.state.loaded_items
    }

    pub fn can_load_more(&self) -> bool {
        self.state.can_load_more
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    /// Drop everything and reload from offset 0 with the current sort
    pub fn refresh(&mut self) {
        let request = logic::paging::reset_session(&mut self.state);
        debug!(
            generation = request.generation,
            sort = %request.sort,
            "refresh"
        );
        self.publish(ResultState::Loading);
        self.spawn_fetch(request);
    }

    /// Switch sort; equal specs are a no-op
    pub fn set_sort(&mut self, spec: SortSpec) {
        if spec == self.state.current_sort {
            debug!(sort = %spec, "sort unchanged, ignoring");
            return;
        }

        info!(from = %self.state.current_sort, to = %spec, "sort changed");
        self.state.current_sort = spec;
        if let Err(e) = logic::sorting::save_sort(self.store.as_ref(), &spec) {
            warn!(error = %e, "could not persist sort");
        }
        self.refresh();
    }

    /// Fetch the page after the loaded items
    ///
    /// No-op while a fetch is running or after the listing is exhausted.
    /// With items on screen the current Success stays visible meanwhile.
    pub fn load_next_page(&mut self) {
        let Some(request) = logic::paging::begin_next_page(&mut self.state) else {
            debug!(
                is_loading = self.state.is_loading,
                can_load_more = self.state.can_load_more,
                "load_next_page ignored"
            );
            return;
        };

        debug!(
            generation = request.generation,
            offset = request.offset,
            "loading next page"
        );
        if self.state.loaded_items.is_empty() {
            self.publish(ResultState::Loading);
        }
        self.spawn_fetch(request);
    }

    /// Connectivity came back; retry if the last fetch failed for lack of it
    pub fn on_connectivity_restored(&mut self) {
        if matches!(*self.state_tx.borrow(), ResultState::ConnectionError) {
            info!("connectivity restored, refreshing");
            self.refresh();
        }
    }

    /// Forward a loaded book to the navigator. Returns false for unknown ids.
    pub fn open_book(&self, id: u64) -> bool {
        match self.state.loaded_items.iter().find(|book| book.id == id) {
            Some(book) => {
                self.navigator.open_book(book.id, book.mirrors());
                true
            }
            None => {
                warn!(id, "open_book for a book that isn't loaded");
                false
            }
        }
    }

    /// Wait for the next finished fetch
    pub async fn next_outcome(&mut self) -> Option<FetchOutcome> {
        self.outcome_rx.recv().await
    }

    /// Fold a finished fetch into the state. Returns false if it was stale.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) -> bool {
        let generation = outcome.request.generation;
        match logic::paging::apply_result(&mut self.state, generation, outcome.result) {
            Some(next) => {
                self.in_flight = None;
                debug!(
                    generation,
                    loaded = self.state.loaded_items.len(),
                    can_load_more = self.state.can_load_more,
                    "fetch applied"
                );
                self.publish(next);
                true
            }
            None => {
                debug!(
                    generation,
                    current = self.state.generation,
                    "discarding stale fetch result"
                );
                false
            }
        }
    }

    /// Wait for and apply the next outcome
    pub async fn process_next(&mut self) -> bool {
        match self.next_outcome().await {
            Some(outcome) => self.apply_outcome(outcome),
            None => false,
        }
    }

    fn publish(&self, next: ResultState) {
        self.state_tx.send_replace(next);
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let source = Arc::clone(&self.source);
        let outcome_tx = self.outcome_tx.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let result = source.fetch_page(request.offset, request.sort).await;
            if let Err(failure) = &result {
                debug!(generation = request.generation, %failure, "fetch failed");
            }
            let _ = outcome_tx.send(FetchOutcome { request, result });
        }));
    }
}

impl Drop for PagingController {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
