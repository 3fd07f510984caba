// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Smart-card status word (SW) classification for failed chip reads.
//
// The reader SDK reports the SW as a decimal string (e.g. "27270" for 0x6A86).
// Only two status words mean the MRZ-derived access key was rejected; every
// other value, and the absence of one, is a dropped connection.

use serde::{Deserialize, Serialize};

/// SW 0x6982: security status not satisfied.
pub const SW_SECURITY_STATUS_NOT_SATISFIED: &str = "0x6982";

/// SW 0x6A86: incorrect parameters P1-P2.
pub const SW_INCORRECT_P1_P2: &str = "0x6A86";

/// Why an NFC read failed, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChipFailure {
    /// The chip rejected the key derived from the MRZ. The MRZ must be re-scanned.
    CredentialMismatch,
    /// The tag left the field or the link dropped. Retrying NFC is safe.
    ConnectionLost,
}

/// Render a decimal status word as `0x` followed by upper-case hex.
///
/// Mirrors `parseInt(sw, 10)`: leading whitespace is skipped and parsing
/// stops at the first non-digit. Returns `None` when no digits are present.
pub fn status_word_hex(sw: &str) -> Option<String> {
    let digits: String = sw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let value = digits.parse::<u64>().ok()?;
    Some(format!("0x{value:X}"))
}

/// Classify an optional decimal status word.
pub fn classify_status_word(sw: Option<&str>) -> ChipFailure {
    match sw.and_then(status_word_hex).as_deref() {
        Some(SW_SECURITY_STATUS_NOT_SATISFIED) | Some(SW_INCORRECT_P1_P2) => {
            ChipFailure::CredentialMismatch
        }
        _ => ChipFailure::ConnectionLost,
    }
}
