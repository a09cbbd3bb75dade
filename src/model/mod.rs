//! Pure Application Model
//!
//! This module defines the plain, cloneable data of the latest-books screen:
//!
//! - **sort**: `SortSpec`, the server-side ordering of the listing
//! - **types**: `Page`, `Mirrors` and the `FetchFailure` taxonomy
//! - **result**: `ResultState`, what observers are told to show
//! - **paging**: `ControllerState`, owned by the paging controller
//!
//! No services live here; all I/O is in `services` and `api`.

pub mod paging;
pub mod result;
pub mod sort;
pub mod types;

pub use paging::{ControllerState, FetchRequest};
pub use result::ResultState;
pub use sort::{SortDirection, SortField, SortSpec};
pub use types::*;
