//! Paging state transitions
//!
//! Pure functions over `ControllerState`. The controller performs the I/O
//! (spawning fetches, publishing states); everything that decides *what*
//! happens lives here so it can be tested without a runtime.
//!
//! Session lifecycle:
//! - `reset_session`: refresh / sort change, always issues a fetch at offset 0
//! - `begin_next_page`: issues a fetch at `loaded_items.len()` unless busy or exhausted
//! - `apply_result`: folds a finished fetch into the state, or rejects it as stale

use crate::model::{ControllerState, FetchFailure, FetchRequest, Page, ResultState};

/// Start a new session with the current sort
///
/// Any in-flight fetch is superseded because the generation moves on.
pub fn reset_session(state: &mut ControllerState) -> FetchRequest {
    state.loaded_items.clear();
    state.can_load_more = true;
    state.is_loading = true;
    state.generation += 1;

    FetchRequest {
        generation: state.generation,
        offset: 0,
        sort: state.current_sort,
    }
}

/// Request the next page, or `None` if a fetch is running or the listing is exhausted
pub fn begin_next_page(state: &mut ControllerState) -> Option<FetchRequest> {
    if state.is_loading || !state.can_load_more {
        return None;
    }

    state.is_loading = true;
    state.generation += 1;

    Some(FetchRequest {
        generation: state.generation,
        offset: state.loaded_items.len(),
        sort: state.current_sort,
    })
}

/// Whether an outcome for `generation` may still touch the state
pub fn is_current(state: &ControllerState, generation: u64) -> bool {
    generation == state.generation
}

/// Fold a finished fetch into the state
///
/// Returns `None` for stale outcomes, which leave the state untouched.
/// A failure only clears `is_loading`; loaded items and sort are kept so a
/// retry continues where the session left off.
pub fn apply_result(
    state: &mut ControllerState,
    generation: u64,
    result: Result<Page, FetchFailure>,
) -> Option<ResultState> {
    if !is_current(state, generation) {
        return None;
    }

    state.is_loading = false;

    let next = match result {
        Ok(page) if page.items.is_empty() => {
            state.can_load_more = false;
            if state.loaded_items.is_empty() {
                ResultState::EmptyData
            } else {
                ResultState::Success(state.loaded_items.clone())
            }
        }
        Ok(page) => {
            state.loaded_items.extend(page.items);
            state.can_load_more = page.has_more;
            ResultState::Success(state.loaded_items.clone())
        }
        Err(FetchFailure::ConnectionUnavailable(_)) => ResultState::ConnectionError,
        Err(FetchFailure::Api { code, message }) => ResultState::ApiError { code, message },
    };

    Some(next)
}
