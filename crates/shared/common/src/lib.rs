//! Common utilities shared by the customer crates.
//!
//! This crate provides:
//! - Unified error handling for repositories and services
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
