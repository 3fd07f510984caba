// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Out-of-band NFC read notifications.
//
// The reader emits these while `scan_nfc` is in flight. Each read gets its own
// channel; once the caller drops the receiver, further sends are discarded.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Payload of a read error notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadErrorEvent {
    /// Status word in decimal, as the chip reported it.
    pub sw: Option<String>,
    pub exception: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NfcEvent {
    /// A chip was detected and the read has begun.
    ReadStart,
    Progress { current_step: u32, total_steps: u32 },
    ReadError(ReadErrorEvent),
}

/// `round(current / total * 100)`, clamped to 0–100. `None` without steps.
pub fn progress_percent(current_step: u32, total_steps: u32) -> Option<u8> {
    if total_steps == 0 {
        return None;
    }
    let percent = (f64::from(current_step) / f64::from(total_steps) * 100.0).round();
    Some(percent.clamp(0.0, 100.0) as u8)
}

pub type NfcEventReceiver = mpsc::UnboundedReceiver<NfcEvent>;

/// Sending half handed to [`crate::traits::NfcReader::scan_nfc`].
#[derive(Debug, Clone)]
pub struct NfcEventSender {
    tx: mpsc::UnboundedSender<NfcEvent>,
}

impl NfcEventSender {
    /// A fresh channel scoped to one read.
    pub fn channel() -> (Self, NfcEventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver an event. Returns `false` once the read has settled.
    pub fn emit(&self, event: NfcEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn read_start(&self) -> bool {
        self.emit(NfcEvent::ReadStart)
    }

    pub fn progress(&self, current_step: u32, total_steps: u32) -> bool {
        self.emit(NfcEvent::Progress {
            current_step,
            total_steps,
        })
    }

    pub fn read_error(&self, event: ReadErrorEvent) -> bool {
        self.emit(NfcEvent::ReadError(event))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
