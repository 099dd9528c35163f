//! solvedex Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the solvedex workspace.
//!
//! # Example
//!
//! ```no_run
//! use solvedex_common::logging::{init_logging, LogConfig};
//! use solvedex_common::{Result, SolvedexError};
//!
//! fn start() -> Result<()> {
//!     let config = LogConfig::from_env()
//!         .map_err(|e| SolvedexError::config(e.to_string()))?;
//!     let _guard = init_logging(&config).map_err(|e| SolvedexError::config(e.to_string()))?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{Result, SolvedexError};
