// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-lds — Parsing of the data groups read from a document chip.
//
// Covers the ICAO 9303 logical data structure of passports and ID cards and
// the ISO/IEC 18013-2 layout of driver licences: BER-TLV decoding, MRZ
// layouts, face and signature images, and the additional detail groups.

pub mod additional;
pub mod dates;
pub mod dg1;
pub mod face;
pub mod fingerprint;
pub mod mrz;
pub mod security;
pub mod tlv;

pub use additional::{AdditionalDocumentDetails, AdditionalPersonalDetails, parse_dg11, parse_dg12};
pub use dates::{convert_six_digit_date, decode_bcd_date};
pub use dg1::{DriverLicenseFields, parse_driver_dg1, parse_travel_dg1};
pub use face::{ExtractedImage, ImageEncoding, extract_face, extract_signature};
pub use fingerprint::{fingerprint, short_fingerprint};
pub use mrz::{MrzFields, MrzFormat, parse_mrz};
pub use security::{DataGroupSummary, summarize};
