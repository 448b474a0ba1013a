//! Error Types
//!
//! This module defines the error types used throughout the probe.
//!
//! # Overview
//!
//! Only setup problems surface as errors. Shape variance in host nodes
//! (missing properties, unexpected value kinds) and serialization hazards
//! (cycles, functions) are recovered locally and never reach the caller.
//!
//! The main error type [`ProbeError`] covers:
//! - Host library / render entry point lookup failures
//! - Settings loading and parsing errors
//! - Property path parsing errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use stagehand::errors::{ProbeError, Result};
//!
//! fn attach(probe: &Probe, host: &dyn HostAdapter) -> Result<()> {
//!     probe.install(host)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the probe.
#[derive(Error, Debug)]
pub enum ProbeError {
    // ========================================================================
    // Setup Errors
    // ========================================================================
    /// The host library namespace is not reachable from the adapter.
    ///
    /// Non-fatal: the caller may retry installation once the library loads.
    #[error("Host library not found: {root}")]
    HostLibraryNotFound {
        /// Dotted name of the namespace that was looked up
        root: String,
    },

    /// The host library is present but exposes no render entry point.
    #[error("Render entry point not found on host library {root}")]
    RenderEntryPointNotFound {
        /// Dotted name of the namespace that was inspected
        root: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configured property path is empty or contains an empty segment.
    #[error("Invalid property path: {0:?}")]
    InvalidPropertyPath(String),

    /// Settings file I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or encoding error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, ProbeError>`.
pub type Result<T> = std::result::Result<T, ProbeError>;
