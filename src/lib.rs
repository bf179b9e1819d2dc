//! Kiln - Android SDK test-harness helper
//!
//! Drives the dexer and device bridge for test runs, with a
//! content-addressed cache that skips dexing and pushing inputs whose
//! contents have not changed.

pub mod cache;
pub mod cli;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod sdk;

pub use error::{KilnError, KilnResult};
