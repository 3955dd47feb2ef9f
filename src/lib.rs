//! oddsboard: cross-source wager odds comparison.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod odds;
pub mod names;
pub mod drift;
pub mod sources;
pub mod board;
pub mod api;
