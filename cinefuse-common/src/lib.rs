//! # cinefuse Common Library
//!
//! Shared code for the cinefuse crates:
//! - Error type and `Result` alias
//! - Configuration file discovery, data directory resolution, atomic writes
//! - Logging initialization
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
