// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face (DG2 / driver licence DG6) and signature (DG5 / DG7) images.
//
// Face images sit in a biometric information template (0x7F61 → 0x7F60) whose
// data block (0x5F2E, or 0x7F2E) is an ISO/IEC 19794-5 facial record: a
// "FAC\0" header, one facial information block, optional feature points and
// an image information block, followed by the encoded image itself.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::DataGroup;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tlv;

pub const TAG_BIOMETRIC_DATA_BLOCK: u32 = 0x5F2E;
pub const TAG_BIOMETRIC_DATA_BLOCK_ENCIPHERED: u32 = 0x7F2E;
pub const TAG_SIGNATURE_IMAGE: u32 = 0x5F43;
pub const TAG_SIGNATURE_IMAGE_ALT: u32 = 0x5F40;

const FAC_MAGIC: &[u8; 4] = b"FAC\0";
const FAC_HEADER_LEN: usize = 14;
const FACIAL_INFO_LEN: usize = 20;
const FEATURE_POINT_LEN: usize = 8;
const IMAGE_INFO_LEN: usize = 12;

/// Encoding of an extracted image, detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageEncoding {
    Jpeg,
    Jpeg2000,
    Unknown,
}

impl ImageEncoding {
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20])
            || data.starts_with(&[0xFF, 0x4F, 0xFF, 0x51])
        {
            Self::Jpeg2000
        } else {
            Self::Unknown
        }
    }
}

/// An encoded image lifted out of a data group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub data: Vec<u8>,
    pub encoding: ImageEncoding,
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl ExtractedImage {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// Extract the first face image of a DG2 / DG6 buffer.
pub fn extract_face(bytes: &[u8], group: DataGroup) -> Result<ExtractedImage> {
    let malformed = |detail: &str| ScanError::data_group(group, detail);

    let elements = tlv::parse_all(bytes)
        .or_else(|_| tlv::parse_one(bytes).map(|(first, _)| vec![first]))
        .map_err(|e| ScanError::data_group(group, e.to_string()))?;
    let block = tlv::find(&elements, TAG_BIOMETRIC_DATA_BLOCK)
        .or_else(|| tlv::find(&elements, TAG_BIOMETRIC_DATA_BLOCK_ENCIPHERED))
        .ok_or_else(|| malformed("no biometric data block"))?;

    let image = if block.value.starts_with(FAC_MAGIC) {
        parse_facial_record(block.value).ok_or_else(|| malformed("truncated facial record"))?
    } else {
        // Some issuers store the bare image without the 19794-5 wrapper.
        ExtractedImage {
            data: block.value.to_vec(),
            encoding: ImageEncoding::detect(block.value),
            width: None,
            height: None,
        }
    };
    if image.data.is_empty() {
        return Err(malformed("empty face image"));
    }
    debug!(%group, encoding = ?image.encoding, bytes = image.data.len(), "face image extracted");
    Ok(image)
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_be_bytes(data.get(at..at + 2)?.try_into().ok()?))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_be_bytes(data.get(at..at + 4)?.try_into().ok()?))
}

fn parse_facial_record(record: &[u8]) -> Option<ExtractedImage> {
    let block_start = FAC_HEADER_LEN;
    let block_len = usize::try_from(read_u32(record, block_start)?).ok()?;
    let feature_points = usize::from(read_u16(record, block_start + 4)?);

    let info_start = block_start + FACIAL_INFO_LEN + feature_points * FEATURE_POINT_LEN;
    let width = read_u16(record, info_start + 2)?;
    let height = read_u16(record, info_start + 4)?;

    let image_start = info_start + IMAGE_INFO_LEN;
    let image_end = (block_start + block_len).min(record.len());
    let data = record.get(image_start..image_end)?.to_vec();
    Some(ExtractedImage {
        encoding: ImageEncoding::detect(&data),
        data,
        width: Some(width),
        height: Some(height),
    })
}

/// Extract the displayed signature (or usual mark) image of a DG5 / DG7 buffer.
pub fn extract_signature(bytes: &[u8], group: DataGroup) -> Result<ExtractedImage> {
    let elements = tlv::parse_all(bytes).map_err(|e| ScanError::data_group(group, e.to_string()))?;
    let image = tlv::find(&elements, TAG_SIGNATURE_IMAGE)
        .or_else(|| tlv::find(&elements, TAG_SIGNATURE_IMAGE_ALT))
        .filter(|e| !e.value.is_empty())
        .ok_or_else(|| ScanError::data_group(group, "no signature image"))?;
    Ok(ExtractedImage {
        data: image.value.to_vec(),
        encoding: ImageEncoding::detect(image.value),
        width: None,
        height: None,
    })
}
