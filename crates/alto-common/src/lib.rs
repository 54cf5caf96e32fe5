//! ALTO Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared plumbing for the ALTO ingest workspace.
//!
//! Currently this is the logging setup used by every binary, so that console
//! and file output look the same no matter which tool produced them.
//!
//! # Example
//!
//! ```no_run
//! use alto_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};
