// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DG13 (issuer-defined) and DG14 (security options).
//
// Neither group feeds the credentials. They are summarised for the log so a
// read can be checked for completeness.

use docscan_core::error::{Result, ScanError};
use docscan_core::types::DataGroup;
use serde::{Deserialize, Serialize};

use crate::fingerprint::fingerprint;
use crate::tlv;

pub const TAG_DG13: u32 = 0x6D;
pub const TAG_DG14: u32 = 0x6E;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataGroupSummary {
    pub group: DataGroup,
    pub tag: u32,
    /// Number of top-level elements inside the template.
    pub elements: usize,
    pub bytes: usize,
    pub sha256: String,
}

/// Summarise a DG13 or DG14 buffer.
pub fn summarize(bytes: &[u8], group: DataGroup) -> Result<DataGroupSummary> {
    let (template, _) =
        tlv::parse_one(bytes).map_err(|e| ScanError::data_group(group, e.to_string()))?;
    let expected = match group {
        DataGroup::Dg13 => Some(TAG_DG13),
        DataGroup::Dg14 => Some(TAG_DG14),
        _ => None,
    };
    if let Some(expected) = expected
        && template.tag != expected
    {
        return Err(ScanError::data_group(
            group,
            format!("expected tag {expected:#X}, found {:#X}", template.tag),
        ));
    }
    // Issuer-defined content need not be BER-TLV; count what decodes.
    let elements = template.children().map(|c| c.len()).unwrap_or(0);
    Ok(DataGroupSummary {
        group,
        tag: template.tag,
        elements,
        bytes: bytes.len(),
        sha256: fingerprint(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::encode_tlv;

    #[test]
    fn dg14_summary() {
        let infos = encode_tlv(0x31, &[encode_tlv(0x30, &[0x06, 0x00]), encode_tlv(0x30, &[0x06, 0x00])].concat());
        let bytes = encode_tlv(TAG_DG14, &infos);
        let summary = summarize(&bytes, DataGroup::Dg14).unwrap();
        assert_eq!(summary.tag, TAG_DG14);
        assert_eq!(summary.elements, 1);
        assert_eq!(summary.bytes, bytes.len());
        assert_eq!(summary.sha256.len(), 64);
    }

    #[test]
    fn opaque_dg13_content_is_counted_as_zero() {
        let bytes = encode_tlv(TAG_DG13, &[0xFF, 0xFF]);
        let summary = summarize(&bytes, DataGroup::Dg13).unwrap();
        assert_eq!(summary.elements, 0);
    }

    #[test]
    fn mismatched_template() {
        let bytes = encode_tlv(TAG_DG13, &[]);
        assert!(summarize(&bytes, DataGroup::Dg14).is_err());
        assert!(summarize(&[0x6E], DataGroup::Dg14).is_err());
    }
}
