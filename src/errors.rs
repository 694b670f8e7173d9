//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`Error`] covers the failure modes of the outer asset
//! loop: asset lookup, prefab validation, loading and configuration.
//! Tracking and disposal themselves never fail; absent or already-released
//! resources are no-ops.
//!
//! # Usage
//!
//! Fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use myth_tracker::errors::Result;
//!
//! fn load_settings(path: &str) -> Result<CycleSettings> {
//!     CycleSettings::from_file(path)
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

/// The main error type for the tracker crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Lookup Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Asset index out of bounds.
    #[error("Asset index out of bounds: {context} (index: {index})")]
    AssetIndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    /// A prefab describes a hierarchy that cannot be built.
    #[error("Invalid prefab '{name}': {reason}")]
    InvalidPrefab {
        /// Prefab name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    // ========================================================================
    // Loading Errors
    // ========================================================================
    /// A loader rejected the request.
    #[error("Failed to load '{url}': {reason}")]
    LoadFailed {
        /// Requested asset url
        url: String,
        /// Loader-provided reason
        reason: String,
    },

    /// A load did not finish within the configured timeout.
    #[error("Loading '{url}' timed out after {after:?}")]
    LoadTimeout {
        /// Requested asset url
        url: String,
        /// Configured timeout
        after: Duration,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
