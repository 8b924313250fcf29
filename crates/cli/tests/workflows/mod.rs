//! Workflow integration tests
//!
//! Each module drives one command family through the built binary.

pub mod config_pages;
pub mod diff_clean;
pub mod hydrate_screen;
