// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Date conversions for MRZ and chip date encodings.

use chrono::{Datelike, NaiveDate, Utc};

/// Convert an MRZ `YYMMDD` date, picking the century with a heuristic.
///
/// Birth dates are assumed to lie in the past: `20YY` unless that year is
/// after the current one, then `19YY`. Expiry dates are assumed to lie in the
/// future and always resolve to `20YY`. Documents dated right at the cutover
/// can be misread; the heuristic is kept as is.
pub fn convert_six_digit_date(digits: &str, is_birth_date: bool) -> Option<NaiveDate> {
    convert_six_digit_date_at(digits, is_birth_date, Utc::now().date_naive())
}

/// [`convert_six_digit_date`] relative to an explicit `today`.
pub fn convert_six_digit_date_at(
    digits: &str,
    is_birth_date: bool,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = digits[0..2].parse().ok()?;
    let mm: u32 = digits[2..4].parse().ok()?;
    let dd: u32 = digits[4..6].parse().ok()?;

    let year = if is_birth_date && 2000 + yy > today.year() {
        1900 + yy
    } else {
        2000 + yy
    };
    NaiveDate::from_ymd_opt(year, mm, dd)
}

/// Decode a 4-byte packed BCD `DDMMYYYY` date (ISO/IEC 18013-2).
///
/// Eight ASCII digits in the same order are accepted as well.
pub fn decode_bcd_date(bytes: &[u8]) -> Option<NaiveDate> {
    match bytes.len() {
        4 => {
            let mut digits = String::with_capacity(8);
            for b in bytes {
                let (hi, lo) = (b >> 4, b & 0x0F);
                if hi > 9 || lo > 9 {
                    return None;
                }
                digits.push(char::from(b'0' + hi));
                digits.push(char::from(b'0' + lo));
            }
            parse_ddmmyyyy(&digits)
        }
        8 => parse_ddmmyyyy(std::str::from_utf8(bytes).ok()?),
        _ => None,
    }
}

/// Parse `DDMMYYYY`.
pub fn parse_ddmmyyyy(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let dd: u32 = text[0..2].parse().ok()?;
    let mm: u32 = text[2..4].parse().ok()?;
    let yyyy: i32 = text[4..8].parse().ok()?;
    NaiveDate::from_ymd_opt(yyyy, mm, dd)
}
