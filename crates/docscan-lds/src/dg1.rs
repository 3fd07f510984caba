// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DG1 — basic document data.
//
// Travel documents (ICAO 9303): template 0x61 holding the MRZ in 0x5F1F.
// Driver licences (ISO/IEC 18013-2): template 0x61 holding the demographic
// block 0x5F02 and the vehicle category template 0x7F63.

use chrono::NaiveDate;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{DataGroup, VehicleCategory};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dates::{decode_bcd_date, parse_ddmmyyyy};
use crate::mrz::{MrzFields, parse_mrz};
use crate::tlv::{self, Tlv};

pub const TAG_DG1: u32 = 0x61;
pub const TAG_MRZ: u32 = 0x5F1F;

// ISO/IEC 18013-2 demographic data elements.
pub const TAG_DEMOGRAPHICS: u32 = 0x5F02;
pub const TAG_ISSUING_STATE: u32 = 0x5F03;
pub const TAG_SURNAME: u32 = 0x5F04;
pub const TAG_OTHER_NAMES: u32 = 0x5F05;
pub const TAG_BIRTH_DATE: u32 = 0x5F06;
pub const TAG_BIRTH_PLACE: u32 = 0x5F07;
pub const TAG_ISSUE_DATE: u32 = 0x5F0A;
pub const TAG_EXPIRY_DATE: u32 = 0x5F0B;
pub const TAG_ISSUING_AUTHORITY: u32 = 0x5F0C;
pub const TAG_LICENCE_NUMBER: u32 = 0x5F0E;
pub const TAG_CATEGORIES: u32 = 0x7F63;
pub const TAG_CATEGORY: u32 = 0x87;

/// Document type reported for every driver licence.
pub const DRIVER_LICENSE_DOCUMENT_TYPE: &str = "D";

fn malformed(detail: impl std::fmt::Display) -> ScanError {
    ScanError::data_group(DataGroup::Dg1, detail.to_string())
}

/// Parse a passport / ID card DG1 into its MRZ fields.
pub fn parse_travel_dg1(bytes: &[u8]) -> Result<MrzFields> {
    let (dg1, _) = tlv::parse_one(bytes).map_err(malformed)?;
    let dg1 = dg1.expect_tag(TAG_DG1).map_err(malformed)?;
    let children = dg1.children().map_err(malformed)?;
    let mrz = tlv::find(&children, TAG_MRZ).ok_or_else(|| malformed("no MRZ element"))?;
    let fields = parse_mrz(&mrz.text()).map_err(malformed)?;
    debug!(format = ?fields.format, "DG1 MRZ decoded");
    Ok(fields)
}

/// Demographic data of a driver licence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLicenseFields {
    pub document_number: String,
    pub document_type: String,
    /// Surname.
    pub primary_identifier: String,
    /// Other names.
    pub secondary_identifier: String,
    /// Issuing member state.
    pub nationality: String,
    /// Issuing authority.
    pub local_authority: String,
    pub birth_date: Option<NaiveDate>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    /// Place of birth.
    pub city: Option<String>,
    pub vehicle_categories: Vec<VehicleCategory>,
}

/// Parse a driver licence DG1.
pub fn parse_driver_dg1(bytes: &[u8]) -> Result<DriverLicenseFields> {
    let (dg1, _) = tlv::parse_one(bytes).map_err(malformed)?;
    let dg1 = dg1.expect_tag(TAG_DG1).map_err(malformed)?;
    let children = dg1.children().map_err(malformed)?;

    // Element 0x5F02 is primitive by its tag bits but nests TLV elements.
    let demographics = match tlv::find(&children, TAG_DEMOGRAPHICS) {
        Some(block) => tlv::parse_all(block.value).map_err(malformed)?,
        None => children.clone(),
    };

    let text = |tag: u32| tlv::find(&demographics, tag).map(|e| e.text().trim().to_owned());
    let date = |tag: u32| tlv::find(&demographics, tag).and_then(|e| decode_bcd_date(e.value));

    let document_number = text(TAG_LICENCE_NUMBER).ok_or_else(|| malformed("no licence number"))?;
    let vehicle_categories = match tlv::find(&children, TAG_CATEGORIES) {
        Some(template) => parse_categories(&template)?,
        None => Vec::new(),
    };

    Ok(DriverLicenseFields {
        document_number,
        document_type: DRIVER_LICENSE_DOCUMENT_TYPE.to_owned(),
        primary_identifier: text(TAG_SURNAME).unwrap_or_default(),
        secondary_identifier: text(TAG_OTHER_NAMES).unwrap_or_default(),
        nationality: text(TAG_ISSUING_STATE).unwrap_or_default(),
        local_authority: text(TAG_ISSUING_AUTHORITY).unwrap_or_default(),
        birth_date: date(TAG_BIRTH_DATE),
        issue_date: date(TAG_ISSUE_DATE),
        expiry_date: date(TAG_EXPIRY_DATE),
        city: text(TAG_BIRTH_PLACE).filter(|c| !c.is_empty()),
        vehicle_categories,
    })
}

fn parse_categories(template: &Tlv<'_>) -> Result<Vec<VehicleCategory>> {
    let entries = template.children().map_err(malformed)?;
    Ok(entries
        .iter()
        .filter(|e| e.tag == TAG_CATEGORY)
        .filter_map(|e| {
            let parsed = parse_category(&e.text());
            if parsed.is_none() {
                warn!(entry = %e.text(), "skipping unreadable vehicle category");
            }
            parsed
        })
        .collect())
}

/// Parse `category;issue;expiry;code;sign;value` (dates `DDMMYYYY`).
pub fn parse_category(entry: &str) -> Option<VehicleCategory> {
    let mut parts = entry.split(';').map(str::trim);
    let category = parts.next().filter(|c| !c.is_empty())?.to_owned();
    let mut next = || parts.next().filter(|p| !p.is_empty());
    Some(VehicleCategory {
        category,
        issue_date: next().and_then(parse_ddmmyyyy),
        expiry_date: next().and_then(parse_ddmmyyyy),
        code: next().map(str::to_owned),
        sign: next().map(str::to_owned),
        value: next().map(str::to_owned),
    })
}
