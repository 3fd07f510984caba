// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DG11 (additional personal details) and DG12 (additional document details).

use chrono::NaiveDate;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::DataGroup;
use serde::{Deserialize, Serialize};

use crate::dates::parse_ddmmyyyy;
use crate::tlv::{self, Tlv};

pub const TAG_DG11: u32 = 0x6B;
pub const TAG_DG12: u32 = 0x6C;

pub const TAG_FULL_NAME: u32 = 0x5F0E;
pub const TAG_PERSONAL_NUMBER: u32 = 0x5F10;
pub const TAG_FULL_DATE_OF_BIRTH: u32 = 0x5F2B;
pub const TAG_PLACE_OF_BIRTH: u32 = 0x5F11;
pub const TAG_MRZ: u32 = 0x5F1F;
pub const TAG_ISSUING_AUTHORITY: u32 = 0x5F19;
pub const TAG_DATE_OF_ISSUE: u32 = 0x5F26;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalPersonalDetails {
    /// Full name in `PRIMARY<<SECONDARY` form with fillers turned to spaces.
    pub full_name: Option<String>,
    pub personal_number: Option<String>,
    pub full_date_of_birth: Option<NaiveDate>,
    pub place_of_birth: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalDocumentDetails {
    /// MRZ as printed, fillers kept.
    pub mrz: Option<String>,
    pub issuing_authority: Option<String>,
    pub date_of_issue: Option<NaiveDate>,
}

fn elements(bytes: &[u8], tag: u32, group: DataGroup) -> Result<Vec<Tlv<'_>>> {
    let (template, _) = tlv::parse_one(bytes).map_err(|e| ScanError::data_group(group, e.to_string()))?;
    template
        .expect_tag(tag)
        .and_then(|t| t.children())
        .map_err(|e| ScanError::data_group(group, e.to_string()))
}

fn text(elements: &[Tlv<'_>], tag: u32) -> Option<String> {
    tlv::find(elements, tag)
        .map(|e| e.text().replace('<', " ").trim().to_owned())
        .filter(|t| !t.is_empty())
}

/// Parse DG11. Absent elements stay `None`.
pub fn parse_dg11(bytes: &[u8]) -> Result<AdditionalPersonalDetails> {
    let elements = elements(bytes, TAG_DG11, DataGroup::Dg11)?;
    Ok(AdditionalPersonalDetails {
        full_name: text(&elements, TAG_FULL_NAME),
        personal_number: text(&elements, TAG_PERSONAL_NUMBER),
        full_date_of_birth: tlv::find(&elements, TAG_FULL_DATE_OF_BIRTH)
            .and_then(|e| parse_yyyymmdd(&e.text())),
        place_of_birth: text(&elements, TAG_PLACE_OF_BIRTH),
    })
}

/// Parse DG12. Absent elements stay `None`.
pub fn parse_dg12(bytes: &[u8]) -> Result<AdditionalDocumentDetails> {
    let elements = elements(bytes, TAG_DG12, DataGroup::Dg12)?;
    Ok(AdditionalDocumentDetails {
        mrz: tlv::find(&elements, TAG_MRZ)
            .map(|e| e.text().trim().to_owned())
            .filter(|m| !m.is_empty()),
        issuing_authority: text(&elements, TAG_ISSUING_AUTHORITY),
        date_of_issue: tlv::find(&elements, TAG_DATE_OF_ISSUE)
            .and_then(|e| parse_yyyymmdd(&e.text())),
    })
}

// DG11/DG12 dates are YYYYMMDD, unlike the DDMMYYYY of driver licences.
fn parse_yyyymmdd(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    parse_ddmmyyyy(&format!("{}{}{}", &text[6..8], &text[4..6], &text[0..4]))
}
