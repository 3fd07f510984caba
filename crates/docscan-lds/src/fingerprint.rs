// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SHA-256 fingerprints of raw data group buffers.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `data`.
///
/// Logged in place of the data group itself, which holds personal data.
pub fn fingerprint(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Short form of [`fingerprint`] for log lines.
pub fn short_fingerprint(data: &[u8]) -> String {
    let mut full = fingerprint(data);
    full.truncate(12);
    full
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn known_digests() {
        assert_eq!(fingerprint(b""), EMPTY_SHA256);
        assert_eq!(
            fingerprint(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn short_form_is_a_prefix() {
        let short = short_fingerprint(b"hello");
        assert_eq!(short, "2cf24dba5fb0");
        assert!(fingerprint(b"hello").starts_with(&short));
    }
}
