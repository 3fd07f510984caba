// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for every scan failure.
//
// The `message` of each `HumanError` is what the notification sink shows. The
// strings are stable: UI tests and translations key on them.

use crate::error::ScanError;
use crate::status_word::{ChipFailure, classify_status_word};

/// Stable message strings shown to the user.
pub mod messages {
    pub const SDK_ALREADY_INITIALIZED: &str = "SDK already initialized";
    pub const SDK_INIT_FAILED: &str = "Failed to initialize SDK";
    pub const SDK_NOT_INITIALIZED: &str = "SDK not initialized";
    pub const SCAN_MRZ_FIRST: &str = "Scan MRZ first";
    pub const READ_IN_PROGRESS: &str = "NFC read already in progress";
    pub const CAMERA_PERMISSION_DENIED: &str = "Camera permission denied";
    pub const MRZ_SCAN_FAILED: &str = "Failed to scan MRZ";
    pub const INCORRECT_MRZ_CREDENTIALS: &str = "Incorrect MRZ credentials for NFC chip";
    pub const CONNECTION_LOST: &str = "Connection lost";
    pub const USER_CANCELED: &str = "User canceled";
    pub const RESOURCE_UNAVAILABLE: &str = "System resource unavailable";
    pub const JP2_PARSE_FAILED: &str = "Could not parse jp2 image";
    pub const PLATFORM_UNAVAILABLE: &str = "This feature isn't available on your device";
}

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational: the user chose this outcome (cancelled a read).
    Notice,
    /// Link dropped or hardware busy; trying again is safe.
    Transient,
    /// User must do something first (grant permission, re-scan the MRZ).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Stable message (shown in the notification).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether repeating the same operation can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

impl HumanError {
    fn new(message: &str, suggestion: &str, retriable: bool, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable,
            severity,
        }
    }
}

/// Convert a `ScanError` into a `HumanError`.
pub fn humanize_error(err: &ScanError) -> HumanError {
    use messages::*;

    match err {
        // -- Preconditions --
        ScanError::NotInitialized => HumanError::new(
            SDK_NOT_INITIALIZED,
            "Restart the app so the scanner can be activated.",
            false,
            Severity::Permanent,
        ),

        ScanError::AlreadyInitialized => HumanError::new(
            SDK_ALREADY_INITIALIZED,
            "The scanner is ready to use.",
            false,
            Severity::Notice,
        ),

        ScanError::MrzRequired => HumanError::new(
            SCAN_MRZ_FIRST,
            "Scan the machine-readable zone of the document before reading the chip.",
            false,
            Severity::ActionRequired,
        ),

        ScanError::ReadInProgress => HumanError::new(
            READ_IN_PROGRESS,
            "Wait for the current read to finish, or stop it first.",
            false,
            Severity::Notice,
        ),

        ScanError::Initialization(_) => HumanError::new(
            SDK_INIT_FAILED,
            "Check the licence and your connection, then restart the app.",
            false,
            Severity::Permanent,
        ),

        // -- Camera --
        ScanError::CameraPermissionDenied => HumanError::new(
            CAMERA_PERMISSION_DENIED,
            "Allow camera access for this app in the system settings.",
            false,
            Severity::ActionRequired,
        ),

        ScanError::MrzScan(_) => HumanError::new(
            MRZ_SCAN_FAILED,
            "Hold the document flat, in good light, with the whole MRZ in view.",
            true,
            Severity::Transient,
        ),

        // -- NFC --
        ScanError::UserCanceled => HumanError::new(
            USER_CANCELED,
            "Start the chip read again whenever you are ready.",
            true,
            Severity::Notice,
        ),

        ScanError::ResourceUnavailable => HumanError::new(
            RESOURCE_UNAVAILABLE,
            "Another app may be using NFC. Wait a moment and try again.",
            true,
            Severity::Transient,
        ),

        ScanError::ChipRead { sw, .. } => humanize_chip_failure(classify_status_word(sw.as_deref())),

        // -- Data groups --
        ScanError::ImageDecode(_) => HumanError::new(
            JP2_PARSE_FAILED,
            "The photo on the chip could not be shown. The other data was still read.",
            false,
            Severity::Permanent,
        ),

        ScanError::DataGroup { group, .. } => HumanError {
            message: format!("Could not read {group}"),
            suggestion: "This part of the chip data is damaged or unsupported. The other data was still read.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Generic SDK failure: the SDK's own text is the best we have --
        ScanError::Sdk(detail) => HumanError {
            message: detail.clone(),
            suggestion: "Try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage --
        ScanError::Io(_) | ScanError::Serialization(_) => HumanError::new(
            "The app's settings could not be read or saved",
            "Default settings are used for now.",
            true,
            Severity::Transient,
        ),

        ScanError::PlatformUnavailable => HumanError::new(
            PLATFORM_UNAVAILABLE,
            "Document scanning needs a phone or tablet with a camera and NFC.",
            false,
            Severity::Permanent,
        ),
    }
}

/// Human-readable form of a classified chip read failure.
pub fn humanize_chip_failure(failure: ChipFailure) -> HumanError {
    match failure {
        ChipFailure::CredentialMismatch => HumanError::new(
            messages::INCORRECT_MRZ_CREDENTIALS,
            "Scan the MRZ again; the chip did not accept the scanned details.",
            false,
            Severity::ActionRequired,
        ),
        ChipFailure::ConnectionLost => HumanError::new(
            messages::CONNECTION_LOST,
            "Hold the document still against the back of the phone and try again.",
            true,
            Severity::Transient,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataGroup;

    #[test]
    fn credential_mismatch_requires_rescan() {
        let err = ScanError::ChipRead {
            sw: Some("27270".into()),
            message: None,
        };
        let human = humanize_error(&err);
        assert_eq!(human.message, "Incorrect MRZ credentials for NFC chip");
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn other_status_words_are_connection_lost() {
        let err = ScanError::ChipRead {
            sw: Some("26368".into()),
            message: Some("wrong length".into()),
        };
        let human = humanize_error(&err);
        assert_eq!(human.message, "Connection lost");
        assert!(human.retriable);

        let no_sw = ScanError::ChipRead {
            sw: None,
            message: None,
        };
        assert_eq!(humanize_error(&no_sw).message, "Connection lost");
    }

    #[test]
    fn cancellation_is_a_notice() {
        let human = humanize_error(&ScanError::UserCanceled);
        assert_eq!(human.message, "User canceled");
        assert_eq!(human.severity, Severity::Notice);
    }

    #[test]
    fn camera_permission_differs_from_scan_failure() {
        let denied = humanize_error(&ScanError::CameraPermissionDenied);
        let failed = humanize_error(&ScanError::MrzScan("timeout".into()));
        assert_eq!(denied.message, "Camera permission denied");
        assert_eq!(failed.message, "Failed to scan MRZ");
        assert_eq!(denied.severity, Severity::ActionRequired);
    }

    #[test]
    fn data_group_message_names_the_group() {
        let err = ScanError::data_group(DataGroup::Dg11, "truncated");
        assert_eq!(humanize_error(&err).message, "Could not read DG11");
    }

    #[test]
    fn sdk_text_is_passed_through() {
        let err = ScanError::Sdk("DOCUMENT_NOT_FOUND".into());
        assert_eq!(humanize_error(&err).message, "DOCUMENT_NOT_FOUND");
    }
}
