//! Latest-books catalog client
//!
//! Paginated, sortable listing of a remote book catalog. The binary is a thin
//! line-oriented driver; everything it uses is exposed here for testing.

pub mod api;
pub mod cache;
pub mod config;
pub mod logging;
pub mod logic;
pub mod model;
pub mod services;
pub mod utils;
