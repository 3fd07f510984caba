// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where the native reader SDK is absent.
//
// Every capability returns `PlatformUnavailable`, except `stop_nfc`, which
// has nothing to stop.

use async_trait::async_trait;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{MrzCredentials, RetrievedDataGroups};

use crate::events::NfcEventSender;
use crate::traits::*;

/// No-op bridge returned on platforms without the reader SDK.
pub struct StubBridge;

impl ReaderBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

#[async_trait]
impl SdkActivation for StubBridge {
    async fn initialize(&self, _license: &str) -> Result<Activation> {
        tracing::warn!("SdkActivation::initialize called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}

#[async_trait]
impl MrzScanner for StubBridge {
    async fn scan_mrz(&self, _options: MrzScanOptions) -> Result<MrzCredentials> {
        tracing::warn!("MrzScanner::scan_mrz called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}

#[async_trait]
impl NfcReader for StubBridge {
    async fn scan_nfc(
        &self,
        _request: NfcScanRequest,
        _events: NfcEventSender,
    ) -> Result<RetrievedDataGroups> {
        tracing::warn!("NfcReader::scan_nfc called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }

    async fn stop_nfc(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl DocumentDetector for StubBridge {
    async fn scan_document(&self, _request: DocumentScanRequest) -> Result<DocumentScan> {
        tracing::warn!("DocumentDetector::scan_document called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}

#[async_trait]
impl FaceCamera for StubBridge {
    async fn scan_face(&self) -> Result<Option<String>> {
        tracing::warn!("FaceCamera::scan_face called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}

#[async_trait]
impl Jp2Decoder for StubBridge {
    async fn decode_face_image(&self, _jp2: &[u8]) -> Result<String> {
        Err(ScanError::PlatformUnavailable)
    }
}
