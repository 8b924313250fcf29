//! Library half of the `concierge` binary
//!
//! Configuration and the file-backed backend live here so integration tests
//! can use them directly.

pub mod config;
pub mod diff_utils;
pub mod fixtures;
pub mod util;
