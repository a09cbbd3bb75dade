//! Pure business logic
//!
//! Side-effect free functions used by the services and the driver:
//! - errors: transport error classification
//! - formatting: plain-text rendering of books and states
//! - paging: controller state transitions
//! - sorting: sort query / persistence / parsing

pub mod errors;
pub mod formatting;
pub mod paging;
pub mod sorting;
