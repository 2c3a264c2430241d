//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`SkyscrollError`] covers:
//! - Invalid startup configuration (too few keyframes, missing container)
//! - Asset loading and decoding errors
//! - Surface / window system errors
//!
//! Only startup errors are meant to reach the entry point. Asset failures are
//! logged by the load coordinator and never propagate into the render loop.
//!
//! ```rust,ignore
//! use skyscroll::errors::{Result, SkyscrollError};
//!
//! fn check(count: usize) -> Result<()> {
//!     if count < 2 {
//!         return Err(SkyscrollError::TooFewKeyframes { count });
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum SkyscrollError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The camera path needs at least two keyframes to form a segment.
    #[error("Camera path needs at least 2 keyframes, got {count}")]
    TooFewKeyframes {
        /// Number of keyframes supplied
        count: usize,
    },

    /// The render target container is missing or has no area.
    #[error("Render container unavailable: {0}")]
    MissingContainer(String),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// An asset could not be fetched or decoded.
    #[error("Failed to load asset '{locator}': {reason}")]
    AssetLoad {
        /// Locator of the asset that failed
        locator: String,
        /// Human readable cause
        reason: String,
    },

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    Gltf(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error (data URIs).
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status}")]
    Http {
        /// HTTP status code
        status: u16,
    },

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// Surface or GPU setup error.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// WASM-specific error.
    #[cfg(target_arch = "wasm32")]
    #[error("WASM error: {0}")]
    Wasm(String),
}

impl SkyscrollError {
    /// Wraps any displayable cause as an [`SkyscrollError::AssetLoad`].
    pub fn asset_load(locator: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::AssetLoad {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for SkyscrollError {
    fn from(err: gltf::Error) -> Self {
        SkyscrollError::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, SkyscrollError>`.
pub type Result<T> = std::result::Result<T, SkyscrollError>;
