// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic contracts of the document reader SDK.
//
// Optical MRZ recognition, the chip's secure channel and JPEG2000 decoding
// all live behind these traits. Implementations translate SDK failures into
// `ScanError` values: codes they cannot type go out as `ScanError::Sdk`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docscan_core::config::{DetectDocumentConfig, ScanTranslations};
use docscan_core::error::Result;
use docscan_core::types::{DataGroup, MrzCredentials, RetrievedDataGroups};
use serde::{Deserialize, Serialize};

use crate::events::NfcEventSender;

/// Every capability the scan session needs from the reader SDK.
pub trait ReaderBridge:
    SdkActivation + MrzScanner + NfcReader + DocumentDetector + FaceCamera + Jp2Decoder + Send + Sync
{
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;
}

/// Result of a licence activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub success: bool,
    /// Licence expiry, when the SDK reports one.
    pub expires_at: Option<DateTime<Utc>>,
}

/// One-time SDK activation.
#[async_trait]
pub trait SdkActivation {
    async fn initialize(&self, license: &str) -> Result<Activation>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MrzScanOptions {
    pub driver_license: bool,
}

/// Camera-based MRZ recognition.
#[async_trait]
pub trait MrzScanner {
    /// Open the MRZ camera and return the parsed zone.
    async fn scan_mrz(&self, options: MrzScanOptions) -> Result<MrzCredentials>;
}

/// Access parameters and data group selection for one chip read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcScanRequest {
    pub document_number: String,
    /// `YYMMDD`.
    pub birth_date: String,
    /// `YYMMDD`.
    pub expiry_date: String,
    pub document_type: String,
    pub driver_mrz_key: Option<String>,
    pub data_groups: Vec<DataGroup>,
}

impl NfcScanRequest {
    pub fn for_credentials(credentials: &MrzCredentials, data_groups: Vec<DataGroup>) -> Self {
        Self {
            document_number: credentials.document_number.clone(),
            birth_date: credentials.birth_date_digits.clone(),
            expiry_date: credentials.expiry_date_digits.clone(),
            document_type: credentials.document_type.clone(),
            driver_mrz_key: credentials.driver_mrz_key.clone(),
            data_groups,
        }
    }
}

/// NFC chip access.
#[async_trait]
pub trait NfcReader {
    /// Read the requested data groups.
    ///
    /// Start, progress and error notifications go to `events` while the read
    /// is in flight; the sender must not be retained past the return.
    async fn scan_nfc(
        &self,
        request: NfcScanRequest,
        events: NfcEventSender,
    ) -> Result<RetrievedDataGroups>;

    /// Abort an in-flight read. Safe to call when nothing is reading.
    async fn stop_nfc(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentScanRequest {
    pub translations: ScanTranslations,
    pub config: DetectDocumentConfig,
}

/// Output of automatic document detection. Images are base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentScan {
    pub mrz: MrzCredentials,
    pub face: Option<String>,
    pub front_photo: Option<String>,
    pub back_photo: Option<String>,
}

/// Single-call automatic document detection.
#[async_trait]
pub trait DocumentDetector {
    async fn scan_document(&self, request: DocumentScanRequest) -> Result<DocumentScan>;
}

/// Face photo capture.
#[async_trait]
pub trait FaceCamera {
    /// Capture a face photo, base64. `None` when no face was found.
    async fn scan_face(&self) -> Result<Option<String>>;
}

/// JPEG2000 conversion.
#[async_trait]
pub trait Jp2Decoder {
    /// Convert a JPEG2000 face image to a displayable JPEG, base64.
    async fn decode_face_image(&self, jp2: &[u8]) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_the_digit_dates() {
        let credentials = MrzCredentials {
            document_type: "P".into(),
            document_number: "NXC8RPRB6".into(),
            birth_date_digits: "850101".into(),
            expiry_date_digits: "310412".into(),
            ..Default::default()
        };
        let request = NfcScanRequest::for_credentials(
            &credentials,
            vec![DataGroup::Dg1, DataGroup::Dg2],
        );
        assert_eq!(request.document_number, "NXC8RPRB6");
        assert_eq!(request.birth_date, "850101");
        assert_eq!(request.expiry_date, "310412");
        assert_eq!(request.driver_mrz_key, None);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["dataGroups"], serde_json::json!(["DG1", "DG2"]));
    }
}
