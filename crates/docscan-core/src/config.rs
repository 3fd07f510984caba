// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration.

use serde::{Deserialize, Serialize};

use crate::types::{DataGroup, DocumentKind};

/// Persistent scanner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Licence token used to activate the reader SDK.
    pub license: String,
    /// Data groups requested from the chip, per document family.
    pub data_groups: DataGroupSettings,
    /// Options for automatic document detection.
    pub detect_document: DetectDocumentConfig,
    /// Texts shown by the document detection camera UI.
    pub translations: ScanTranslations,
    /// Identical messages within this window (milliseconds) are shown once.
    pub toast_window_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            license: String::new(),
            data_groups: DataGroupSettings::default(),
            detect_document: DetectDocumentConfig::default(),
            translations: ScanTranslations::default(),
            toast_window_ms: 3500,
        }
    }
}

/// Ordered data group selections for each document family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataGroupSettings {
    /// Passports and ID cards.
    pub travel_document: Vec<DataGroup>,
    pub driver_license: Vec<DataGroup>,
}

impl Default for DataGroupSettings {
    fn default() -> Self {
        Self {
            travel_document: vec![DataGroup::Dg1, DataGroup::Dg2],
            driver_license: vec![
                DataGroup::Dg1,
                DataGroup::Dg5,
                DataGroup::Dg6,
                DataGroup::Dg11,
                DataGroup::Dg12,
            ],
        }
    }
}

impl DataGroupSettings {
    /// Data groups to request for a document of `kind`.
    pub fn for_kind(&self, kind: DocumentKind) -> &[DataGroup] {
        match kind {
            DocumentKind::Passport | DocumentKind::IdCard => &self.travel_document,
            DocumentKind::DriverLicense => &self.driver_license,
        }
    }

    /// Add `group` to the selection for `kind`, or remove it when already selected.
    ///
    /// Returns whether the group is selected afterwards.
    pub fn toggle(&mut self, kind: DocumentKind, group: DataGroup) -> bool {
        let groups = match kind {
            DocumentKind::Passport | DocumentKind::IdCard => &mut self.travel_document,
            DocumentKind::DriverLicense => &mut self.driver_license,
        };
        if groups.contains(&group) {
            groups.retain(|g| *g != group);
            false
        } else {
            groups.push(group);
            true
        }
    }
}

/// Per-feature detection switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOptions {
    pub detect: bool,
    pub required: bool,
    pub src_image: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            detect: true,
            required: true,
            src_image: true,
        }
    }
}

/// Which detected feature a settings toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectFeature {
    Mrz,
    Face,
}

/// Which switch of a detected feature a settings toggle flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectOption {
    Detect,
    Required,
    SrcImage,
}

/// Configuration passed to the SDK's automatic document detection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectDocumentConfig {
    pub mrz: DetectionOptions,
    pub face: DetectionOptions,
    pub max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentKind>,
}

impl DetectDocumentConfig {
    pub fn options(&self, feature: DetectFeature) -> &DetectionOptions {
        match feature {
            DetectFeature::Mrz => &self.mrz,
            DetectFeature::Face => &self.face,
        }
    }

    /// Flip one switch. Turning `detect` off also clears `required` and
    /// `src_image`; those two can only change while `detect` is on.
    pub fn toggle(&mut self, feature: DetectFeature, option: DetectOption) {
        let opts = match feature {
            DetectFeature::Mrz => &mut self.mrz,
            DetectFeature::Face => &mut self.face,
        };
        match option {
            DetectOption::Detect if opts.detect => {
                *opts = DetectionOptions {
                    detect: false,
                    required: false,
                    src_image: false,
                };
            }
            DetectOption::Detect => opts.detect = true,
            DetectOption::Required if opts.detect => opts.required = !opts.required,
            DetectOption::SrcImage if opts.detect => opts.src_image = !opts.src_image,
            DetectOption::Required | DetectOption::SrcImage => {}
        }
    }
}

/// Texts shown by the document detection camera overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTranslations {
    pub first_result_scan: String,
    pub second_result_scan: String,
    pub processing: String,
    pub rotate: String,
    pub try_again: String,
    pub success: String,
}

impl Default for ScanTranslations {
    fn default() -> Self {
        Self {
            first_result_scan: "Scan front".into(),
            second_result_scan: "Scan back".into(),
            processing: "Processing...".into(),
            rotate: "Please rotate the document".into(),
            try_again: "Try again".into(),
            success: "Success".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_groups() {
        let settings = DataGroupSettings::default();
        assert_eq!(
            settings.for_kind(DocumentKind::Passport),
            &[DataGroup::Dg1, DataGroup::Dg2]
        );
        assert_eq!(
            settings.for_kind(DocumentKind::IdCard),
            &[DataGroup::Dg1, DataGroup::Dg2]
        );
        assert_eq!(
            settings.for_kind(DocumentKind::DriverLicense),
            &[
                DataGroup::Dg1,
                DataGroup::Dg5,
                DataGroup::Dg6,
                DataGroup::Dg11,
                DataGroup::Dg12
            ]
        );
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut settings = DataGroupSettings::default();
        assert!(settings.toggle(DocumentKind::Passport, DataGroup::Dg11));
        assert_eq!(
            settings.for_kind(DocumentKind::IdCard),
            &[DataGroup::Dg1, DataGroup::Dg2, DataGroup::Dg11]
        );
        assert!(!settings.toggle(DocumentKind::Passport, DataGroup::Dg2));
        assert_eq!(
            settings.for_kind(DocumentKind::Passport),
            &[DataGroup::Dg1, DataGroup::Dg11]
        );
        // Driver licence selection is untouched.
        assert_eq!(settings.for_kind(DocumentKind::DriverLicense).len(), 5);
    }

    #[test]
    fn disabling_detect_clears_dependent_switches() {
        let mut config = DetectDocumentConfig::default();
        config.toggle(DetectFeature::Face, DetectOption::Detect);
        assert_eq!(
            *config.options(DetectFeature::Face),
            DetectionOptions {
                detect: false,
                required: false,
                src_image: false
            }
        );
        // Dependent switches are frozen while detection is off.
        config.toggle(DetectFeature::Face, DetectOption::Required);
        assert!(!config.face.required);

        config.toggle(DetectFeature::Face, DetectOption::Detect);
        assert!(config.face.detect);
        config.toggle(DetectFeature::Face, DetectOption::SrcImage);
        assert!(config.face.src_image);
        // MRZ options never moved.
        assert_eq!(config.mrz, DetectionOptions::default());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ScanConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.toast_window_ms, 3500);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ScanConfig = serde_json::from_str(r#"{"license":"abc"}"#).unwrap();
        assert_eq!(config.license, "abc");
        assert_eq!(config.data_groups, DataGroupSettings::default());
    }
}
