//! # TubePulse Common Library
//!
//! Shared code for the TubePulse crates:
//! - Error and result types
//! - Bootstrap configuration loading (CLI → ENV → TOML → defaults)
//! - Date and user-agent helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
