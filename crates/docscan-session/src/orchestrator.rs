// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session orchestrator.
//
// Sequences SDK activation, MRZ scanning, the NFC chip read and document
// detection, and owns the session they produce. Every failure is reported
// through the notifier before the operation returns its error, and no exit
// path leaves the NFC state enabled.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use docscan_bridge::{
    DocumentScanRequest, MrzScanOptions, NfcEvent, NfcEventSender, NfcScanRequest, ReaderBridge,
    progress_percent,
};
use docscan_core::ScanConfig;
use docscan_core::config::{DetectFeature, DetectOption, DetectionOptions};
use docscan_core::error::{Result, ScanError};
use docscan_core::human_errors::humanize_chip_failure;
use docscan_core::status_word::{classify_status_word, status_word_hex};
use docscan_core::types::{
    DataGroup, DocumentKind, Image, ImageType, MrzCredentials, RetrievedDataGroups, ScanSession,
    SdkStatus, SessionId,
};
use docscan_lds::fingerprint;
use tracing::{debug, error, info, instrument, warn};

use crate::normalizer::DataGroupNormalizer;
use crate::notify::{MessageSink, Notifier};
use crate::state::SessionState;

/// Owns one scan session and drives the reader SDK for it.
///
/// Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct ScanOrchestrator {
    state: Arc<Mutex<SessionState>>,
    reader: Arc<dyn ReaderBridge>,
    notifier: Arc<Notifier>,
}

impl ScanOrchestrator {
    pub fn new(reader: Arc<dyn ReaderBridge>, sink: Arc<dyn MessageSink>, config: ScanConfig) -> Self {
        let window = Duration::from_millis(config.toast_window_ms);
        Self {
            state: Arc::new(Mutex::new(SessionState::new(config))),
            reader,
            notifier: Arc::new(Notifier::new(sink, window)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session lock poisoned")
    }

    /// Report `err` to the user, remember it on the session and hand it back.
    fn fail(&self, err: ScanError) -> ScanError {
        let human = self.notifier.report(&err);
        self.lock().session.last_error = Some(human.message);
        err
    }

    fn require_initialized(&self) -> Result<()> {
        if self.lock().is_initialized() {
            Ok(())
        } else {
            Err(self.fail(ScanError::NotInitialized))
        }
    }

    // -- Activation ----------------------------------------------------------

    /// Activate the reader SDK with the configured licence.
    ///
    /// Calling again once active reports "SDK already initialized" and does
    /// not re-activate.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<SdkStatus> {
        let license = {
            let state = self.lock();
            if state.is_initialized() {
                drop(state);
                return Err(self.fail(ScanError::AlreadyInitialized));
            }
            state.config.license.clone()
        };

        match self.reader.initialize(&license).await {
            Ok(activation) if activation.success => {
                info!(platform = self.reader.platform_name(), "reader SDK activated");
                self.lock().sdk_status = SdkStatus::Active;
                Ok(SdkStatus::Active)
            }
            Ok(activation) => {
                let expired = activation.expires_at.is_some_and(|exp| exp < Utc::now());
                if expired {
                    warn!(expires_at = ?activation.expires_at, "reader SDK licence revoked");
                    self.lock().sdk_status = SdkStatus::Revoked;
                }
                Err(self.fail(ScanError::Initialization("activation rejected".into())))
            }
            Err(e) => {
                error!(error = %e, "reader SDK activation failed");
                Err(self.fail(ScanError::Initialization(e.to_string())))
            }
        }
    }

    // -- Session -------------------------------------------------------------

    /// Drop credentials, images, chip data and the verified flag.
    pub fn reset_session(&self) {
        let mut state = self.lock();
        state.reset();
        info!(session = %state.id, "scan session reset");
    }

    // -- MRZ -----------------------------------------------------------------

    /// Start a new session from the document's MRZ.
    #[instrument(skip(self))]
    pub async fn begin_mrz_scan(&self, kind: DocumentKind) -> Result<MrzCredentials> {
        self.require_initialized()?;
        self.reset_session();

        let options = MrzScanOptions {
            driver_license: kind.is_driver_license(),
        };
        match self.reader.scan_mrz(options).await.map_err(ScanError::refine) {
            Ok(credentials) => {
                info!(document_type = %credentials.document_type, "MRZ scanned");
                self.lock().credentials = Some(credentials.clone());
                Ok(credentials)
            }
            Err(e) => {
                warn!(error = %e, "MRZ scan failed");
                let e = match e {
                    ScanError::CameraPermissionDenied => e,
                    other => ScanError::MrzScan(other.to_string()),
                };
                Err(self.fail(e))
            }
        }
    }

    // -- NFC -----------------------------------------------------------------

    /// Read the chip with the current MRZ credentials and apply its data.
    ///
    /// Returns the session snapshot after the read. Progress, start and
    /// error notifications from the reader are applied while the read is in
    /// flight and ignored once it was stopped or the session reset.
    #[instrument(skip(self))]
    pub async fn begin_nfc_read(&self) -> Result<ScanSession> {
        let prepared = {
            let mut state = self.lock();
            if !state.is_initialized() {
                Err(ScanError::NotInitialized)
            } else if state.read_in_flight {
                Err(ScanError::ReadInProgress)
            } else {
                match state.credentials.as_ref() {
                    None => Err(ScanError::MrzRequired),
                    Some(credentials) => {
                        let kind = credentials.kind();
                        let groups = state.config.data_groups.for_kind(kind).to_vec();
                        let request = NfcScanRequest::for_credentials(credentials, groups);

                        state.clear_retrieved();
                        state.session.progress = 0;
                        state.session.tag_detected = false;
                        state.session.enabled = true;
                        state.session.last_error = None;
                        state.read_in_flight = true;
                        state.read_error_reported = false;
                        state.read_token += 1;
                        Ok((request, kind, state.read_token, state.epoch))
                    }
                }
            }
        };
        let (request, kind, token, epoch) = prepared.map_err(|e| self.fail(e))?;
        info!(?kind, data_groups = ?request.data_groups, "NFC read started");

        let result = self.scan_with_events(request, token).await;

        let groups = {
            let mut state = self.lock();
            state.read_in_flight = false;
            state.session.enabled = false;
            match result {
                Ok(groups) if state.epoch == epoch => {
                    state.fingerprints = groups.iter().map(|(g, data)| (g, fingerprint(data))).collect();
                    state.retrieved = Some(groups.clone());
                    groups
                }
                Ok(_) => {
                    warn!("session was reset during the NFC read; discarding its data");
                    return Ok(state.session.clone());
                }
                Err(e) => {
                    state.session.tag_detected = false;
                    let stale = state.epoch != epoch;
                    let already_reported = state.read_error_reported;
                    drop(state);
                    let e = chip_error(e);
                    if stale {
                        warn!(error = %e, "NFC read of a reset session failed; not reported");
                        return Err(e);
                    }
                    // A typed read error event outranks the bridge's own rejection,
                    // unless the user canceled or the hardware was busy.
                    if already_reported
                        && !matches!(e, ScanError::UserCanceled | ScanError::ResourceUnavailable)
                    {
                        debug!(error = %e, "chip read error already reported");
                        return Err(e);
                    }
                    return Err(self.fail(e));
                }
            }
        };
        for (group, sha256) in self.fingerprints() {
            debug!(%group, %sha256, "data group retrieved");
        }

        let normalized = DataGroupNormalizer::new(self.reader.as_ref())
            .normalize(&groups, kind)
            .await;

        let snapshot = {
            let mut state = self.lock();
            if state.epoch != epoch {
                warn!("session was reset while normalizing; discarding chip data");
                return Ok(state.session.clone());
            }
            if let Some(credentials) = state.credentials.as_mut() {
                normalized.patch.clone().apply_to(credentials);
            }
            for face in normalized.faces.iter().cloned() {
                state.images.add(face);
            }
            state.session.verified = normalized.verified();
            state.session.clone()
        };
        for failure in &normalized.failures {
            self.fail_quietly(failure);
        }
        info!(verified = snapshot.verified, applied = ?normalized.applied, "NFC read finished");
        Ok(snapshot)
    }

    /// Report a per-data-group failure without aborting the read.
    fn fail_quietly(&self, err: &ScanError) {
        let human = self.notifier.report(err);
        self.lock().session.last_error = Some(human.message);
    }

    /// Run the reader's scan while applying its notifications. The event
    /// channel lives exactly as long as this call.
    async fn scan_with_events(&self, request: NfcScanRequest, token: u64) -> Result<RetrievedDataGroups> {
        let (events, mut rx) = NfcEventSender::channel();
        let scan = self.reader.scan_nfc(request, events);
        tokio::pin!(scan);

        let result = loop {
            tokio::select! {
                biased;
                result = &mut scan => break result,
                Some(event) = rx.recv() => self.apply_event(token, event),
            }
        };
        while let Ok(event) = rx.try_recv() {
            self.apply_event(token, event);
        }
        result
    }

    fn apply_event(&self, token: u64, event: NfcEvent) {
        let message = {
            let mut state = self.lock();
            if state.read_token != token {
                debug!(?event, "ignoring notification from a stale read");
                return;
            }
            match event {
                NfcEvent::ReadStart => {
                    state.session.enabled = true;
                    state.session.tag_detected = true;
                    None
                }
                NfcEvent::Progress {
                    current_step,
                    total_steps,
                } => {
                    if let Some(percent) = progress_percent(current_step, total_steps) {
                        state.session.progress = percent;
                    }
                    None
                }
                NfcEvent::ReadError(read_error) => {
                    let sw_hex = read_error.sw.as_deref().and_then(status_word_hex);
                    let failure = classify_status_word(read_error.sw.as_deref());
                    warn!(
                        sw = ?sw_hex,
                        exception = ?read_error.exception,
                        message = ?read_error.message,
                        ?failure,
                        "chip read error"
                    );
                    state.session.enabled = false;
                    state.session.tag_detected = false;
                    state.read_error_reported = true;
                    let human = humanize_chip_failure(failure);
                    state.session.last_error = Some(human.message.clone());
                    Some(human.message)
                }
            }
        };
        if let Some(message) = message {
            self.notifier.notify(&message);
        }
    }

    /// Abort the NFC read, if any. Always safe to call.
    #[instrument(skip(self))]
    pub async fn stop_nfc(&self) {
        {
            let mut state = self.lock();
            state.session.enabled = false;
            state.session.tag_detected = false;
            state.read_token += 1;
        }
        if let Err(e) = self.reader.stop_nfc().await {
            warn!(error = %e, "reader refused to stop NFC");
        }
    }

    // -- Camera flows ---------------------------------------------------------

    /// Capture an unverified face photo for the current credentials.
    #[instrument(skip(self))]
    pub async fn capture_face(&self) -> Result<Option<Image>> {
        self.require_initialized()?;
        if self.lock().credentials.is_none() {
            return Err(self.fail(ScanError::MrzRequired));
        }

        match self.reader.scan_face().await {
            Ok(Some(face)) => {
                let image = Image::new(ImageType::UnverifiedFace, face);
                self.lock().images.add(image.clone());
                Ok(Some(image))
            }
            Ok(None) => {
                debug!("face camera returned no face");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "face capture failed");
                Err(self.fail(e))
            }
        }
    }

    /// Start a new session from automatic document detection.
    #[instrument(skip(self))]
    pub async fn scan_document(&self) -> Result<MrzCredentials> {
        self.require_initialized()?;
        self.reset_session();

        let request = {
            let state = self.lock();
            DocumentScanRequest {
                translations: state.config.translations.clone(),
                config: state.config.detect_document.clone(),
            }
        };
        match self.reader.scan_document(request).await.map_err(ScanError::refine) {
            Ok(scan) => {
                let mut state = self.lock();
                state.credentials = Some(scan.mrz.clone());
                let images = [
                    (ImageType::UnverifiedFace, scan.face),
                    (ImageType::Front, scan.front_photo),
                    (ImageType::Back, scan.back_photo),
                ];
                for (image_type, source) in images {
                    if let Some(source) = source {
                        state.images.add(Image::new(image_type, source));
                    }
                }
                info!(images = state.images.len(), "document detected");
                Ok(scan.mrz)
            }
            Err(e) => {
                warn!(error = %e, "document detection failed");
                Err(self.fail(e))
            }
        }
    }

    // -- Settings ------------------------------------------------------------

    /// Add or remove a requested data group. Returns whether it is selected now.
    pub fn toggle_data_group(&self, kind: DocumentKind, group: DataGroup) -> bool {
        self.lock().config.data_groups.toggle(kind, group)
    }

    pub fn toggle_detection(&self, feature: DetectFeature, option: DetectOption) -> DetectionOptions {
        let mut state = self.lock();
        state.config.detect_document.toggle(feature, option);
        *state.config.detect_document.options(feature)
    }

    // -- Getters -------------------------------------------------------------

    pub fn config(&self) -> ScanConfig {
        self.lock().config.clone()
    }

    pub fn session_id(&self) -> SessionId {
        self.lock().id
    }

    pub fn sdk_status(&self) -> SdkStatus {
        self.lock().sdk_status
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().is_initialized()
    }

    pub fn credentials(&self) -> Option<MrzCredentials> {
        self.lock().credentials.clone()
    }

    pub fn session(&self) -> ScanSession {
        self.lock().session.clone()
    }

    pub fn images(&self) -> Vec<Image> {
        self.lock().images.as_slice().to_vec()
    }

    pub fn retrieved_data_groups(&self) -> Option<RetrievedDataGroups> {
        self.lock().retrieved.clone()
    }

    pub fn fingerprints(&self) -> BTreeMap<DataGroup, String> {
        self.lock().fingerprints.clone()
    }
}

/// Type a failed `scan_nfc` for reporting. Untyped failures count as a lost
/// connection.
fn chip_error(err: ScanError) -> ScanError {
    match err.refine() {
        e @ (ScanError::UserCanceled
        | ScanError::ResourceUnavailable
        | ScanError::ChipRead { .. }
        | ScanError::PlatformUnavailable) => e,
        other => ScanError::ChipRead {
            sw: None,
            message: Some(other.to_string()),
        },
    }
}
