// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Document Scanner.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Families of identity documents the reader distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Passport,
    IdCard,
    DriverLicense,
}

impl DocumentKind {
    /// Infer the family from an MRZ document code (`P`, `I`, `ID`, `D`, ...).
    ///
    /// Only the exact code `D` is a driver licence; other codes starting
    /// with `D` (diplomatic documents) are ID-type documents.
    pub fn from_document_code(code: &str) -> Self {
        let code = code.trim();
        if code == "D" {
            Self::DriverLicense
        } else if code.starts_with('P') {
            Self::Passport
        } else {
            Self::IdCard
        }
    }

    pub fn is_driver_license(&self) -> bool {
        matches!(self, Self::DriverLicense)
    }
}

/// Elementary files on the document chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataGroup {
    #[serde(rename = "DG1")]
    Dg1,
    #[serde(rename = "DG2")]
    Dg2,
    #[serde(rename = "DG3")]
    Dg3,
    #[serde(rename = "DG4")]
    Dg4,
    #[serde(rename = "DG5")]
    Dg5,
    #[serde(rename = "DG6")]
    Dg6,
    #[serde(rename = "DG7")]
    Dg7,
    #[serde(rename = "DG8")]
    Dg8,
    #[serde(rename = "DG9")]
    Dg9,
    #[serde(rename = "DG10")]
    Dg10,
    #[serde(rename = "DG11")]
    Dg11,
    #[serde(rename = "DG12")]
    Dg12,
    #[serde(rename = "DG13")]
    Dg13,
    #[serde(rename = "DG14")]
    Dg14,
    #[serde(rename = "DG15")]
    Dg15,
    #[serde(rename = "DG16")]
    Dg16,
}

impl DataGroup {
    pub const ALL: [DataGroup; 16] = [
        Self::Dg1,
        Self::Dg2,
        Self::Dg3,
        Self::Dg4,
        Self::Dg5,
        Self::Dg6,
        Self::Dg7,
        Self::Dg8,
        Self::Dg9,
        Self::Dg10,
        Self::Dg11,
        Self::Dg12,
        Self::Dg13,
        Self::Dg14,
        Self::Dg15,
        Self::Dg16,
    ];

    /// Data group number (1–16).
    pub fn number(&self) -> u8 {
        match self {
            Self::Dg1 => 1,
            Self::Dg2 => 2,
            Self::Dg3 => 3,
            Self::Dg4 => 4,
            Self::Dg5 => 5,
            Self::Dg6 => 6,
            Self::Dg7 => 7,
            Self::Dg8 => 8,
            Self::Dg9 => 9,
            Self::Dg10 => 10,
            Self::Dg11 => 11,
            Self::Dg12 => 12,
            Self::Dg13 => 13,
            Self::Dg14 => 14,
            Self::Dg15 => 15,
            Self::Dg16 => 16,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }
}

impl std::fmt::Display for DataGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DG{}", self.number())
    }
}

/// Raw data group buffers returned by an NFC read, keyed by data group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedDataGroups(BTreeMap<DataGroup, Vec<u8>>);

impl RetrievedDataGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: DataGroup, data: Vec<u8>) {
        self.0.insert(group, data);
    }

    /// The buffer for `group`, if it was returned and is non-empty.
    pub fn non_empty(&self, group: DataGroup) -> Option<&[u8]> {
        self.0
            .get(&group)
            .map(Vec::as_slice)
            .filter(|data| !data.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DataGroup, &[u8])> {
        self.0.iter().map(|(group, data)| (*group, data.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(DataGroup, Vec<u8>)> for RetrievedDataGroups {
    fn from_iter<I: IntoIterator<Item = (DataGroup, Vec<u8>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A driving-licence category entry (ISO/IEC 18013-2 DG1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCategory {
    pub category: String,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub code: Option<String>,
    pub sign: Option<String>,
    pub value: Option<String>,
}

/// Credentials of the document in the current session.
///
/// Created by an MRZ or document-detection scan, then refined in place by the
/// data groups read over NFC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MrzCredentials {
    /// Document code as printed (`P`, `I`, `ID`, `D`, ...).
    pub document_type: String,
    pub document_number: String,
    /// Birth date as the six MRZ digits (YYMMDD), used to derive the chip key.
    pub birth_date_digits: String,
    /// Expiry date as the six MRZ digits (YYMMDD), used to derive the chip key.
    pub expiry_date_digits: String,
    pub birth_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub first_names: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub nationality: String,
    pub issuer: String,
    // -- Driver licence only --
    pub city: Option<String>,
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub vehicle_categories: Vec<VehicleCategory>,
    /// MRZ-equivalent key printed on driver licences, used instead of the
    /// number/date triple to open the chip.
    pub driver_mrz_key: Option<String>,
    // -- Filled from the chip --
    pub signature_base64: Option<String>,
    pub mrz: Option<String>,
    pub personal_number: Option<String>,
}

impl MrzCredentials {
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_document_code(&self.document_type)
    }
}

/// What an image in the session collection shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    Front,
    Back,
    /// Face captured by the camera.
    UnverifiedFace,
    /// Face read from the chip.
    VerifiedFace,
}

/// A tagged, base64-encoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "type")]
    pub image_type: ImageType,
    pub base64_source: String,
}

impl Image {
    pub fn new(image_type: ImageType, base64_source: impl Into<String>) -> Self {
        Self {
            image_type,
            base64_source: base64_source.into(),
        }
    }
}

/// Activation state of the reader SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SdkStatus {
    #[default]
    Uninitialized,
    Active,
    /// The licence expired.
    Revoked,
}

/// Observable NFC state of a scan session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSession {
    /// Percentage complete (0–100).
    pub progress: u8,
    /// NFC is active and the UI should show the read in progress.
    pub enabled: bool,
    /// The chip has been detected in the field.
    pub tag_detected: bool,
    /// At least one data group was applied from the chip.
    pub verified: bool,
    /// Message of the last reported failure.
    pub last_error: Option<String>,
}
