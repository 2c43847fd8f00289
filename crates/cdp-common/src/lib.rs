//! CDP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the CDP project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all CDP workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized tracing setup for binaries
//! - **Types**: The canonical product record all sources normalize into
//!
//! # Example
//!
//! ```no_run
//! use cdp_common::types::{CanonicalProduct, CANONICAL_COLUMNS};
//!
//! fn header_width(record: &CanonicalProduct) -> bool {
//!     record.to_row().len() == CANONICAL_COLUMNS.len()
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CdpError, Result};
