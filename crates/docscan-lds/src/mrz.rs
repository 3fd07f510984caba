// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MRZ text layouts (ICAO 9303 parts 4–6) as stored in DG1.
//
// DG1 carries the MRZ as one run of characters without line breaks:
// TD1 is 3×30 (ID cards), TD2 is 2×36, TD3 is 2×44 (passports).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MrzError {
    #[error("MRZ of {0} characters matches no TD1/TD2/TD3 layout")]
    UnknownLayout(usize),

    #[error("MRZ contains non-ASCII characters")]
    NotAscii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MrzFormat {
    Td1,
    Td2,
    Td3,
}

/// Fields of a travel document MRZ. Dates stay in their `YYMMDD` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MrzFields {
    pub format: MrzFormat,
    pub document_code: String,
    pub issuing_state: String,
    pub document_number: String,
    pub nationality: String,
    pub birth_date: String,
    /// `M`, `F` or `X` (unspecified).
    pub sex: String,
    pub expiration_date: String,
    pub last_name: String,
    pub first_name: String,
    pub optional_data: String,
}

/// Parse the MRZ characters of a TD1, TD2 or TD3 document.
pub fn parse_mrz(raw: &str) -> Result<MrzFields, MrzError> {
    let text: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if !text.is_ascii() {
        return Err(MrzError::NotAscii);
    }
    match text.len() {
        90 => Ok(parse_td1(&text)),
        72 => Ok(parse_two_line(&text, 36, MrzFormat::Td2)),
        88 => Ok(parse_two_line(&text, 44, MrzFormat::Td3)),
        n => Err(MrzError::UnknownLayout(n)),
    }
}

fn parse_td1(text: &str) -> MrzFields {
    let (l1, rest) = text.split_at(30);
    let (l2, l3) = rest.split_at(30);

    let optional1 = &l1[15..30];
    // Document numbers longer than nine characters continue in the optional
    // field; the check digit position then holds a filler.
    let document_number = if &l1[14..15] == "<" {
        let overflow = optional1.split('<').next().unwrap_or("");
        let overflow = &overflow[..overflow.len().saturating_sub(1)];
        format!("{}{}", strip_filler(&l1[5..14]), overflow)
    } else {
        strip_filler(&l1[5..14])
    };

    let (last_name, first_name) = split_names(l3);
    MrzFields {
        format: MrzFormat::Td1,
        document_code: strip_filler(&l1[0..2]),
        issuing_state: strip_filler(&l1[2..5]),
        document_number,
        nationality: strip_filler(&l2[15..18]),
        birth_date: l2[0..6].to_owned(),
        sex: sex(&l2[7..8]),
        expiration_date: l2[8..14].to_owned(),
        last_name,
        first_name,
        optional_data: strip_filler(&l2[18..29]),
    }
}

fn parse_two_line(text: &str, width: usize, format: MrzFormat) -> MrzFields {
    let (l1, l2) = text.split_at(width);
    let (last_name, first_name) = split_names(&l1[5..width]);
    // TD3 keeps a check digit for its optional data, TD2 does not.
    let optional_end = match format {
        MrzFormat::Td3 => width - 2,
        _ => width - 1,
    };
    MrzFields {
        format,
        document_code: strip_filler(&l1[0..2]),
        issuing_state: strip_filler(&l1[2..5]),
        document_number: strip_filler(&l2[0..9]),
        nationality: strip_filler(&l2[10..13]),
        birth_date: l2[13..19].to_owned(),
        sex: sex(&l2[20..21]),
        expiration_date: l2[21..27].to_owned(),
        last_name,
        first_name,
        optional_data: strip_filler(&l2[28..optional_end]),
    }
}

/// Remove filler characters, turning inner fillers into spaces.
fn strip_filler(field: &str) -> String {
    field.trim_end_matches('<').replace('<', " ").trim().to_owned()
}

/// Split `PRIMARY<<SECONDARY<NAMES` into (primary, secondary).
fn split_names(field: &str) -> (String, String) {
    match field.split_once("<<") {
        Some((primary, secondary)) => (strip_filler(primary), strip_filler(secondary)),
        None => (strip_filler(field), String::new()),
    }
}

fn sex(field: &str) -> String {
    match field {
        "<" => "X".to_owned(),
        other => other.to_owned(),
    }
}
