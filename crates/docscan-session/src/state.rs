// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mutable state owned by the scan orchestrator.

use std::collections::BTreeMap;

use docscan_core::ScanConfig;
use docscan_core::types::{
    DataGroup, MrzCredentials, RetrievedDataGroups, ScanSession, SdkStatus, SessionId,
};

use crate::images::ImageCollection;

#[derive(Debug, Default)]
pub struct SessionState {
    pub id: SessionId,
    pub config: ScanConfig,
    pub sdk_status: SdkStatus,
    pub credentials: Option<MrzCredentials>,
    pub session: ScanSession,
    pub images: ImageCollection,
    /// Raw buffers of the last completed read.
    pub retrieved: Option<RetrievedDataGroups>,
    /// SHA-256 (hex) of each buffer in `retrieved`.
    pub fingerprints: BTreeMap<DataGroup, String>,
    /// Bumped by every reset; a read that started in an older epoch is
    /// not applied.
    pub epoch: u64,
    /// Bumped by every read start, stop and reset; events carrying an older
    /// token are ignored.
    pub read_token: u64,
    pub read_in_flight: bool,
    /// The running read already showed a chip error from its event stream.
    pub read_error_reported: bool,
}

impl SessionState {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sdk_status == SdkStatus::Active
    }

    /// Start a new session: no credentials, images or chip data remain.
    pub fn reset(&mut self) {
        self.id = SessionId::new();
        self.credentials = None;
        self.images.clear();
        self.retrieved = None;
        self.fingerprints.clear();
        self.session = ScanSession::default();
        self.epoch += 1;
        self.read_token += 1;
        self.read_error_reported = false;
    }

    pub fn clear_retrieved(&mut self) {
        self.retrieved = None;
        self.fingerprints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::types::{Image, ImageType};

    #[test]
    fn reset_clears_the_session_but_keeps_activation() {
        let mut state = SessionState::new(ScanConfig::default());
        state.sdk_status = SdkStatus::Active;
        state.credentials = Some(MrzCredentials::default());
        state.images.add(Image::new(ImageType::Front, "front"));
        state.session.verified = true;
        state.session.progress = 80;
        state
            .fingerprints
            .insert(DataGroup::Dg1, "00".repeat(32));
        state.read_error_reported = true;
        let before = (state.id, state.epoch, state.read_token);

        state.reset();

        assert!(state.is_initialized());
        assert_eq!(state.credentials, None);
        assert!(state.images.is_empty());
        assert_eq!(state.session, ScanSession::default());
        assert!(state.fingerprints.is_empty());
        assert!(!state.read_error_reported);
        assert_ne!(state.id, before.0);
        assert_eq!(state.epoch, before.1 + 1);
        assert_eq!(state.read_token, before.2 + 1);
    }
}
