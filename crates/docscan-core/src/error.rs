// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the Document Scanner.

use thiserror::Error;

use crate::types::DataGroup;

/// Top-level error type for all scan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Session preconditions --
    #[error("SDK not initialized")]
    NotInitialized,

    #[error("SDK already initialized")]
    AlreadyInitialized,

    #[error("no MRZ credentials in the current session")]
    MrzRequired,

    #[error("an NFC read is already in progress")]
    ReadInProgress,

    // -- SDK activation --
    #[error("SDK activation failed: {0}")]
    Initialization(String),

    // -- Camera flows --
    #[error("camera permission denied")]
    CameraPermissionDenied,

    #[error("MRZ scan failed: {0}")]
    MrzScan(String),

    // -- NFC flows --
    #[error("user canceled")]
    UserCanceled,

    #[error("system resource unavailable")]
    ResourceUnavailable,

    #[error("chip read failed (sw: {sw:?}): {}", message.as_deref().unwrap_or("no detail"))]
    ChipRead {
        /// Decimal status word as reported by the SDK, if any.
        sw: Option<String>,
        message: Option<String>,
    },

    // -- Data groups --
    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    #[error("malformed {group}: {detail}")]
    DataGroup { group: DataGroup, detail: String },

    // -- Generic SDK failure --
    #[error("{0}")]
    Sdk(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Error codes the reader SDK embeds in its failure messages.
pub mod sdk_codes {
    pub const CAMERA_PERMISSION_DENIED: &str = "CAMERA_PERMISSION_DENIED";
    pub const USER_CANCELED: &str = "USER_CANCELED";
    pub const SYSTEM_RESOURCE_UNAVAILABLE: &str = "SYSTEM_RESOURCE_UNAVAILABLE";
}

impl ScanError {
    /// Map a raw SDK failure message onto a typed variant.
    ///
    /// Messages carrying none of the known codes stay [`ScanError::Sdk`].
    pub fn from_sdk_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(sdk_codes::CAMERA_PERMISSION_DENIED) {
            Self::CameraPermissionDenied
        } else if message.contains(sdk_codes::USER_CANCELED) {
            Self::UserCanceled
        } else if message.contains(sdk_codes::SYSTEM_RESOURCE_UNAVAILABLE) {
            Self::ResourceUnavailable
        } else {
            Self::Sdk(message)
        }
    }

    /// Re-classify a generic [`ScanError::Sdk`] by its embedded code.
    pub fn refine(self) -> Self {
        match self {
            Self::Sdk(message) => Self::from_sdk_message(message),
            other => other,
        }
    }

    /// Shorthand for a malformed data group.
    pub fn data_group(group: DataGroup, detail: impl Into<String>) -> Self {
        Self::DataGroup {
            group,
            detail: detail.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
