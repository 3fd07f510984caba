// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data group normalizer — maps raw chip data groups onto the credential record.
//
// Every data group is handled on its own: a malformed group yields an error
// for that group and the remaining groups are still applied.

use chrono::{NaiveDate, Utc};
use docscan_bridge::Jp2Decoder;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{
    DataGroup, DocumentKind, Image, ImageType, MrzCredentials, RetrievedDataGroups, VehicleCategory,
};
use docscan_lds::dates::convert_six_digit_date_at;
use docscan_lds::{
    DataGroupSummary, extract_face, extract_signature, parse_dg11, parse_dg12, parse_driver_dg1,
    parse_travel_dg1, short_fingerprint, summarize,
};
use tracing::{debug, info, warn};

/// Credential fields refined by a chip read. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsPatch {
    pub document_number: Option<String>,
    pub document_type: Option<String>,
    pub first_names: Option<String>,
    pub last_name: Option<String>,
    /// `Some(None)` clears the gender (driver licences carry none).
    pub gender: Option<Option<String>>,
    pub nationality: Option<String>,
    pub issuer: Option<String>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub expiry_date: Option<Option<NaiveDate>>,
    pub issue_date: Option<Option<NaiveDate>>,
    pub city: Option<Option<String>>,
    pub vehicle_categories: Option<Vec<VehicleCategory>>,
    pub signature_base64: Option<String>,
    pub personal_number: Option<String>,
    pub mrz: Option<String>,
}

impl CredentialsPatch {
    pub fn apply_to(self, credentials: &mut MrzCredentials) {
        fn set<T>(field: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *field = value;
            }
        }
        set(&mut credentials.document_number, self.document_number);
        set(&mut credentials.document_type, self.document_type);
        set(&mut credentials.first_names, self.first_names);
        set(&mut credentials.last_name, self.last_name);
        set(&mut credentials.gender, self.gender);
        set(&mut credentials.nationality, self.nationality);
        set(&mut credentials.issuer, self.issuer);
        set(&mut credentials.birth_date, self.birth_date);
        set(&mut credentials.expiry_date, self.expiry_date);
        set(&mut credentials.issue_date, self.issue_date);
        set(&mut credentials.city, self.city);
        set(&mut credentials.vehicle_categories, self.vehicle_categories);
        if self.signature_base64.is_some() {
            credentials.signature_base64 = self.signature_base64;
        }
        if self.personal_number.is_some() {
            credentials.personal_number = self.personal_number;
        }
        if self.mrz.is_some() {
            credentials.mrz = self.mrz;
        }
    }
}

/// Everything one chip read contributes to the session.
#[derive(Debug, Default)]
pub struct Normalized {
    pub patch: CredentialsPatch,
    /// Verified face images, in data group order.
    pub faces: Vec<Image>,
    /// Data groups applied without error.
    pub applied: Vec<DataGroup>,
    /// One error per data group that could not be applied.
    pub failures: Vec<ScanError>,
    pub summaries: Vec<DataGroupSummary>,
}

impl Normalized {
    /// At least one data group was applied.
    pub fn verified(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Data groups the normalizer understands, in processing order.
const HANDLED: [DataGroup; 8] = [
    DataGroup::Dg1,
    DataGroup::Dg2,
    DataGroup::Dg5,
    DataGroup::Dg6,
    DataGroup::Dg11,
    DataGroup::Dg12,
    DataGroup::Dg13,
    DataGroup::Dg14,
];

pub struct DataGroupNormalizer<'a, D: Jp2Decoder + Sync + ?Sized> {
    decoder: &'a D,
    today: NaiveDate,
}

impl<'a, D: Jp2Decoder + Sync + ?Sized> DataGroupNormalizer<'a, D> {
    pub fn new(decoder: &'a D) -> Self {
        Self {
            decoder,
            today: Utc::now().date_naive(),
        }
    }

    /// Resolve MRZ date centuries relative to `today` instead of the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn normalize(&self, groups: &RetrievedDataGroups, kind: DocumentKind) -> Normalized {
        let mut out = Normalized::default();
        for group in HANDLED {
            let Some(bytes) = groups.non_empty(group) else {
                continue;
            };
            debug!(%group, bytes = bytes.len(), sha256 = %short_fingerprint(bytes), "normalizing");

            let result = match group {
                DataGroup::Dg1 => self.basic_data(bytes, kind, &mut out.patch),
                DataGroup::Dg2 | DataGroup::Dg6 => self.face(bytes, group, kind).await.map(|face| {
                    out.faces.push(face);
                }),
                DataGroup::Dg5 => extract_signature(bytes, group).map(|signature| {
                    out.patch.signature_base64 = Some(signature.to_base64());
                }),
                DataGroup::Dg11 => parse_dg11(bytes).map(|details| {
                    out.patch.personal_number = details.personal_number;
                }),
                DataGroup::Dg12 => parse_dg12(bytes).map(|details| {
                    out.patch.mrz = details.mrz;
                }),
                // No credential fields come from DG13/DG14 yet.
                _ => summarize(bytes, group).map(|summary| {
                    debug!(%group, elements = summary.elements, "data group summarised");
                    out.summaries.push(summary);
                }),
            };

            match result {
                Ok(()) => out.applied.push(group),
                Err(e) => {
                    warn!(%group, error = %e, "data group not applied");
                    out.failures.push(e);
                }
            }
        }
        info!(
            applied = out.applied.len(),
            failed = out.failures.len(),
            "data groups normalized"
        );
        out
    }

    fn basic_data(&self, bytes: &[u8], kind: DocumentKind, patch: &mut CredentialsPatch) -> Result<()> {
        match kind {
            DocumentKind::DriverLicense => {
                let fields = parse_driver_dg1(bytes)?;
                patch.document_number = Some(fields.document_number);
                patch.gender = Some(None);
                patch.document_type = Some(fields.document_type);
                patch.first_names = Some(fields.secondary_identifier);
                patch.last_name = Some(fields.primary_identifier);
                patch.nationality = Some(fields.nationality);
                patch.issuer = Some(fields.local_authority);
                patch.birth_date = Some(fields.birth_date);
                patch.expiry_date = Some(fields.expiry_date);
                patch.city = Some(fields.city);
                patch.issue_date = Some(fields.issue_date);
                patch.vehicle_categories = Some(fields.vehicle_categories);
            }
            DocumentKind::Passport | DocumentKind::IdCard => {
                let fields = parse_travel_dg1(bytes)?;
                let birth = convert_six_digit_date_at(&fields.birth_date, true, self.today);
                let expiry = convert_six_digit_date_at(&fields.expiration_date, false, self.today);
                if birth.is_none() || expiry.is_none() {
                    warn!(
                        birth = %fields.birth_date,
                        expiry = %fields.expiration_date,
                        "DG1 carries an invalid date"
                    );
                }
                patch.document_number = Some(fields.document_number);
                patch.gender = Some(Some(fields.sex.to_uppercase()));
                patch.document_type = Some(fields.document_code);
                patch.first_names = Some(fields.first_name);
                patch.last_name = Some(fields.last_name);
                patch.nationality = Some(fields.nationality);
                patch.issuer = Some(fields.issuing_state);
                patch.birth_date = Some(birth);
                patch.expiry_date = Some(expiry);
            }
        }
        Ok(())
    }

    /// Chip faces of passports and ID cards are JPEG2000 and go through the
    /// decoder; driver licence faces are stored as read.
    async fn face(&self, bytes: &[u8], group: DataGroup, kind: DocumentKind) -> Result<Image> {
        let image = extract_face(bytes, group)?;
        let base64 = match kind {
            DocumentKind::DriverLicense => image.to_base64(),
            DocumentKind::Passport | DocumentKind::IdCard => self
                .decoder
                .decode_face_image(&image.data)
                .await
                .map_err(|e| ScanError::ImageDecode(e.to_string()))?,
        };
        Ok(Image::new(ImageType::VerifiedFace, base64))
    }
}
