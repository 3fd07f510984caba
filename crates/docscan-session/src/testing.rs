// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted reader and chip fixtures for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use docscan_bridge::{
    Activation, DocumentDetector, DocumentScan, DocumentScanRequest, FaceCamera, Jp2Decoder,
    MrzScanOptions, MrzScanner, NfcEvent, NfcEventSender, NfcReader, NfcScanRequest, ReaderBridge,
    SdkActivation,
};
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{MrzCredentials, RetrievedDataGroups};
use tokio::sync::Notify;

#[derive(Default)]
struct Script {
    activation: Option<Activation>,
    activation_error: Option<ScanError>,
    mrz: Option<MrzCredentials>,
    mrz_error: Option<ScanError>,
    nfc_groups: RetrievedDataGroups,
    nfc_error: Option<ScanError>,
    nfc_events: Vec<NfcEvent>,
    /// Sent after the gate opens.
    late_events: Vec<NfcEvent>,
    gate: Option<Arc<Notify>>,
    face: Option<String>,
    face_error: Option<ScanError>,
    document: Option<DocumentScan>,
    document_error: Option<ScanError>,
    decode_fails: bool,

    init_calls: usize,
    mrz_requests: Vec<MrzScanOptions>,
    nfc_requests: Vec<NfcScanRequest>,
    document_requests: Vec<DocumentScanRequest>,
    stop_calls: usize,
    decode_calls: usize,
}

/// Reader that replays scripted results and records every call.
///
/// Clones share the script, so a test keeps a handle after giving one to the
/// orchestrator.
#[derive(Clone, Default)]
pub struct FakeReader {
    script: Arc<Mutex<Script>>,
}

impl FakeReader {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    pub fn reject_activation(&self, expires_at: Option<chrono::DateTime<chrono::Utc>>) {
        self.script().activation = Some(Activation {
            success: false,
            expires_at,
        });
    }

    pub fn fail_activation(&self, err: ScanError) {
        self.script().activation_error = Some(err);
    }

    pub fn set_mrz(&self, credentials: MrzCredentials) {
        self.script().mrz = Some(credentials);
    }

    pub fn fail_mrz(&self, err: ScanError) {
        self.script().mrz_error = Some(err);
    }

    pub fn set_nfc_groups(&self, groups: RetrievedDataGroups) {
        self.script().nfc_groups = groups;
    }

    pub fn fail_nfc(&self, err: ScanError) {
        self.script().nfc_error = Some(err);
    }

    pub fn push_event(&self, event: NfcEvent) {
        self.script().nfc_events.push(event);
    }

    pub fn push_late_event(&self, event: NfcEvent) {
        self.script().late_events.push(event);
    }

    /// Hold `scan_nfc` until [`FakeReader::release`].
    pub fn hold_nfc(&self) {
        self.script().gate = Some(Arc::new(Notify::new()));
    }

    pub fn release(&self) {
        if let Some(gate) = self.script().gate.as_ref() {
            gate.notify_one();
        }
    }

    pub fn set_face(&self, face: Option<&str>) {
        self.script().face = face.map(str::to_owned);
    }

    pub fn fail_face(&self, err: ScanError) {
        self.script().face_error = Some(err);
    }

    pub fn set_document(&self, document: DocumentScan) {
        self.script().document = Some(document);
    }

    pub fn fail_document(&self, err: ScanError) {
        self.script().document_error = Some(err);
    }

    pub fn fail_decode(&self) {
        self.script().decode_fails = true;
    }

    pub fn init_calls(&self) -> usize {
        self.script().init_calls
    }

    pub fn mrz_requests(&self) -> Vec<MrzScanOptions> {
        self.script().mrz_requests.clone()
    }

    pub fn nfc_requests(&self) -> Vec<NfcScanRequest> {
        self.script().nfc_requests.clone()
    }

    pub fn document_requests(&self) -> Vec<DocumentScanRequest> {
        self.script().document_requests.clone()
    }

    pub fn stop_calls(&self) -> usize {
        self.script().stop_calls
    }

    pub fn decode_calls(&self) -> usize {
        self.script().decode_calls
    }
}

impl ReaderBridge for FakeReader {
    fn platform_name(&self) -> &str {
        "fake"
    }
}

#[async_trait]
impl SdkActivation for FakeReader {
    async fn initialize(&self, _license: &str) -> Result<Activation> {
        let mut script = self.script();
        script.init_calls += 1;
        if let Some(err) = script.activation_error.take() {
            return Err(err);
        }
        Ok(script.activation.clone().unwrap_or(Activation {
            success: true,
            expires_at: None,
        }))
    }
}

#[async_trait]
impl MrzScanner for FakeReader {
    async fn scan_mrz(&self, options: MrzScanOptions) -> Result<MrzCredentials> {
        let mut script = self.script();
        script.mrz_requests.push(options);
        if let Some(err) = script.mrz_error.take() {
            return Err(err);
        }
        script
            .mrz
            .clone()
            .ok_or_else(|| ScanError::Sdk("no MRZ scripted".into()))
    }
}

#[async_trait]
impl NfcReader for FakeReader {
    async fn scan_nfc(
        &self,
        request: NfcScanRequest,
        events: NfcEventSender,
    ) -> Result<RetrievedDataGroups> {
        let (early, late, gate, outcome) = {
            let mut script = self.script();
            script.nfc_requests.push(request);
            let outcome = match script.nfc_error.take() {
                Some(err) => Err(err),
                None => Ok(script.nfc_groups.clone()),
            };
            (
                script.nfc_events.clone(),
                script.late_events.clone(),
                script.gate.clone(),
                outcome,
            )
        };

        for event in early {
            events.emit(event);
        }
        if let Some(gate) = gate {
            gate.notified().await;
        }
        for event in late {
            events.emit(event);
        }
        outcome
    }

    async fn stop_nfc(&self) -> Result<()> {
        self.script().stop_calls += 1;
        Ok(())
    }
}

#[async_trait]
impl DocumentDetector for FakeReader {
    async fn scan_document(&self, request: DocumentScanRequest) -> Result<DocumentScan> {
        let mut script = self.script();
        script.document_requests.push(request);
        if let Some(err) = script.document_error.take() {
            return Err(err);
        }
        script
            .document
            .clone()
            .ok_or_else(|| ScanError::Sdk("no document scripted".into()))
    }
}

#[async_trait]
impl FaceCamera for FakeReader {
    async fn scan_face(&self) -> Result<Option<String>> {
        let mut script = self.script();
        if let Some(err) = script.face_error.take() {
            return Err(err);
        }
        Ok(script.face.clone())
    }
}

#[async_trait]
impl Jp2Decoder for FakeReader {
    async fn decode_face_image(&self, _jp2: &[u8]) -> Result<String> {
        let mut script = self.script();
        script.decode_calls += 1;
        if script.decode_fails {
            return Err(ScanError::Sdk("JP2 decoder error".into()));
        }
        Ok(fixtures::DECODED_JPEG.to_owned())
    }
}

/// Chip data groups built with the public TLV encoder.
pub mod fixtures {
    use docscan_core::types::MrzCredentials;
    use docscan_lds::tlv::encode_tlv;

    pub const DECODED_JPEG: &str = "/9j/4AAQSkZJRgABAQ==";
    pub const DL_MRZ: &str = "D1NLD15264832113<<<<<<<<<<<<<<";

    pub const JP2: &[u8] = &[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20, 0x0D, 0x0A];
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

    /// MRZ credentials as the camera would return them for the passport below.
    pub fn passport_mrz() -> MrzCredentials {
        MrzCredentials {
            document_type: "P".into(),
            document_number: "NXC8RPRB6".into(),
            birth_date_digits: "650310".into(),
            expiry_date_digits: "310412".into(),
            first_names: "WILLEKE LISELOTTE".into(),
            last_name: "DE BRUIJN".into(),
            gender: Some("F".into()),
            nationality: "NLD".into(),
            issuer: "NLD".into(),
            ..Default::default()
        }
    }

    pub fn driver_mrz() -> MrzCredentials {
        MrzCredentials {
            document_type: "D".into(),
            document_number: "5264832113".into(),
            driver_mrz_key: Some("D1NLD15264832113".into()),
            ..Default::default()
        }
    }

    pub fn passport_dg1_with_sex(sex: char) -> Vec<u8> {
        let line1 = format!("{:<<44}", "P<NLDDE<BRUIJN<<WILLEKE<LISELOTTE");
        let line2 = format!("NXC8RPRB60NLD6503101{sex}3104125{}", "<".repeat(16));
        let mrz = format!("{line1}{line2}");
        encode_tlv(0x61, &encode_tlv(0x5F1F, mrz.as_bytes()))
    }

    pub fn passport_dg1() -> Vec<u8> {
        passport_dg1_with_sex('F')
    }

    /// Face data group with a bare JPEG2000 payload.
    pub fn face_dg(tag: u32) -> Vec<u8> {
        let bdb = encode_tlv(0x5F2E, JP2);
        encode_tlv(tag, &encode_tlv(0x7F61, &encode_tlv(0x7F60, &bdb)))
    }

    pub fn driver_dg1() -> Vec<u8> {
        let demographics = [
            encode_tlv(0x5F03, b"NLD"),
            encode_tlv(0x5F04, b"DE BRUIJN"),
            encode_tlv(0x5F05, b"WILLEKE LISELOTTE"),
            encode_tlv(0x5F06, &[0x10, 0x03, 0x19, 0x65]),
            encode_tlv(0x5F07, b"Amsterdam"),
            encode_tlv(0x5F0A, &[0x01, 0x02, 0x20, 0x18]),
            encode_tlv(0x5F0B, &[0x01, 0x02, 0x20, 0x28]),
            encode_tlv(0x5F0C, b"Gemeente Amsterdam"),
            encode_tlv(0x5F0E, b"5264832113"),
        ]
        .concat();
        let categories = encode_tlv(0x87, b"B;14051985;01022028;;;");
        let body = [
            encode_tlv(0x5F02, &demographics),
            encode_tlv(0x7F63, &categories),
        ]
        .concat();
        encode_tlv(0x61, &body)
    }

    pub fn signature_dg5() -> Vec<u8> {
        encode_tlv(0x67, &encode_tlv(0x5F43, JPEG))
    }

    pub fn dg11() -> Vec<u8> {
        encode_tlv(0x6B, &encode_tlv(0x5F10, b"999999990"))
    }

    pub fn dg12() -> Vec<u8> {
        encode_tlv(0x6C, &encode_tlv(0x5F1F, DL_MRZ.as_bytes()))
    }
}
