//! CLI command implementations

pub mod clean;
pub mod config;
pub mod diff;
pub mod hydrate;
pub mod pages;
