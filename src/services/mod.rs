//! Services
//!
//! This module contains the stateful parts that do I/O:
//! - paging: the latest-books paging controller
//! - connectivity: catalog reachability monitor
//! - navigator: navigation capability the controller forwards to

pub mod connectivity;
pub mod navigator;
pub mod paging;

// Re-export commonly used types for convenience
pub use connectivity::{ConnectivityMonitor, ReachabilityProbe};
pub use navigator::Navigator;
pub use paging::{FetchOutcome, PageSource, PagingController};
