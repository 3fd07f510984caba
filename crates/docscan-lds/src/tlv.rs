// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// BER-TLV reader and encoder for chip data groups.
//
// Data groups are BER-TLV encoded: a tag of one or more bytes, a definite
// length in short or long form, then the value. Elements whose first tag byte
// has bit 6 set are constructed and hold further TLV elements.

use thiserror::Error;

/// Failures while decoding a TLV stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlvError {
    #[error("unexpected end of input at offset {0}")]
    Truncated(usize),

    #[error("tag longer than 4 bytes at offset {0}")]
    TagTooLong(usize),

    #[error("unsupported length encoding 0x{byte:02X} at offset {offset}")]
    UnsupportedLength { byte: u8, offset: usize },

    #[error("expected tag 0x{expected:X}, found 0x{found:X}")]
    UnexpectedTag { expected: u32, found: u32 },
}

/// One decoded TLV element, borrowing its value from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: u32,
    pub constructed: bool,
    pub value: &'a [u8],
}

impl<'a> Tlv<'a> {
    /// Decode the element's value as a sequence of TLV elements.
    pub fn children(&self) -> Result<Vec<Tlv<'a>>, TlvError> {
        parse_all(self.value)
    }

    /// Fail unless this element carries `expected`.
    pub fn expect_tag(self, expected: u32) -> Result<Self, TlvError> {
        if self.tag == expected {
            Ok(self)
        } else {
            Err(TlvError::UnexpectedTag {
                expected,
                found: self.tag,
            })
        }
    }

    /// Value interpreted as text (ISO 8859-1 / UTF-8, lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.value).into_owned()
    }
}

/// Decode the first element of `input`, returning it and the remaining bytes.
pub fn parse_one(input: &[u8]) -> Result<(Tlv<'_>, &[u8]), TlvError> {
    let first = *input.first().ok_or(TlvError::Truncated(0))?;
    let constructed = first & 0x20 != 0;

    let mut tag = u32::from(first);
    let mut pos = 1;
    if first & 0x1F == 0x1F {
        loop {
            let b = *input.get(pos).ok_or(TlvError::Truncated(pos))?;
            if pos >= 4 {
                return Err(TlvError::TagTooLong(0));
            }
            tag = (tag << 8) | u32::from(b);
            pos += 1;
            if b & 0x80 == 0 {
                break;
            }
        }
    }

    let len_byte = *input.get(pos).ok_or(TlvError::Truncated(pos))?;
    pos += 1;
    let len = if len_byte < 0x80 {
        usize::from(len_byte)
    } else {
        let count = usize::from(len_byte & 0x7F);
        if count == 0 || count > 4 {
            return Err(TlvError::UnsupportedLength {
                byte: len_byte,
                offset: pos - 1,
            });
        }
        let bytes = input
            .get(pos..pos + count)
            .ok_or(TlvError::Truncated(pos))?;
        pos += count;
        bytes.iter().fold(0usize, |acc, b| (acc << 8) | usize::from(*b))
    };

    let end = pos.checked_add(len).ok_or(TlvError::Truncated(pos))?;
    let value = input.get(pos..end).ok_or(TlvError::Truncated(input.len()))?;
    Ok((
        Tlv {
            tag,
            constructed,
            value,
        },
        &input[end..],
    ))
}

/// Decode every element of `input`.
pub fn parse_all(mut input: &[u8]) -> Result<Vec<Tlv<'_>>, TlvError> {
    let mut out = Vec::new();
    while !input.is_empty() {
        let (tlv, rest) = parse_one(input)?;
        out.push(tlv);
        input = rest;
    }
    Ok(out)
}

/// Depth-first search for the first element with `tag`.
///
/// Constructed elements whose content does not decode as TLV are treated as
/// leaves, so opaque payloads never abort the search.
pub fn find<'a>(elements: &[Tlv<'a>], tag: u32) -> Option<Tlv<'a>> {
    for element in elements {
        if element.tag == tag {
            return Some(*element);
        }
        if element.constructed
            && let Ok(children) = element.children()
            && let Some(found) = find(&children, tag)
        {
            return Some(found);
        }
    }
    None
}

/// Encode one TLV element. `tag` is written big-endian without leading zero bytes.
pub fn encode_tlv(tag: u32, value: &[u8]) -> Vec<u8> {
    let tag_bytes = tag.to_be_bytes();
    let skip = tag_bytes.iter().take_while(|b| **b == 0).count().min(3);

    let mut out = Vec::with_capacity(value.len() + 8);
    out.extend_from_slice(&tag_bytes[skip..]);
    let len = value.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let len_bytes = (len as u32).to_be_bytes();
        let skip = len_bytes.iter().take_while(|b| **b == 0).count();
        out.push(0x80 | (4 - skip) as u8);
        out.extend_from_slice(&len_bytes[skip..]);
    }
    out.extend_from_slice(value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_tag_short_length() {
        let (tlv, rest) = parse_one(&[0x02, 0x01, 0x05, 0xAA]).unwrap();
        assert_eq!(tlv.tag, 0x02);
        assert!(!tlv.constructed);
        assert_eq!(tlv.value, &[0x05]);
        assert_eq!(rest, &[0xAA]);
    }

    #[test]
    fn multi_byte_tag() {
        let data = encode_tlv(0x5F1F, b"P<UTO");
        assert_eq!(&data[..3], &[0x5F, 0x1F, 0x05]);
        let (tlv, _) = parse_one(&data).unwrap();
        assert_eq!(tlv.tag, 0x5F1F);
        assert_eq!(tlv.text(), "P<UTO");

        let encoded = encode_tlv(0x7F61, &[]);
        let (tlv, _) = parse_one(&encoded).unwrap();
        assert_eq!(tlv.tag, 0x7F61);
        assert!(tlv.constructed);
    }

    #[test]
    fn long_form_lengths() {
        let value = vec![0x11; 300];
        let data = encode_tlv(0x5F2E, &value);
        assert_eq!(&data[2..5], &[0x82, 0x01, 0x2C]);
        let (tlv, rest) = parse_one(&data).unwrap();
        assert_eq!(tlv.value.len(), 300);
        assert!(rest.is_empty());

        let data = encode_tlv(0x04, &[0u8; 200]);
        assert_eq!(&data[1..3], &[0x81, 200]);
    }

    #[test]
    fn truncated_value_is_an_error() {
        assert_eq!(
            parse_one(&[0x61, 0x05, 0x01]),
            Err(TlvError::Truncated(3))
        );
        assert!(parse_one(&[]).is_err());
        assert!(parse_one(&[0x5F]).is_err());
        assert!(parse_one(&[0x04, 0x82, 0x01]).is_err());
    }

    #[test]
    fn indefinite_length_is_rejected() {
        assert!(matches!(
            parse_one(&[0x61, 0x80, 0x00, 0x00]),
            Err(TlvError::UnsupportedLength { byte: 0x80, .. })
        ));
    }

    #[test]
    fn find_descends_into_constructed_elements() {
        let inner = encode_tlv(0x5F1F, b"MRZ");
        let outer = encode_tlv(0x61, &inner);
        let elements = parse_all(&outer).unwrap();
        let found = find(&elements, 0x5F1F).unwrap();
        assert_eq!(found.value, b"MRZ");
        assert!(find(&elements, 0x5F2E).is_none());
    }

    #[test]
    fn find_skips_opaque_constructed_content() {
        // 0x7F2E is constructed by its tag bits but holds raw image bytes.
        let mut body = encode_tlv(0x7F2E, &[0xFF, 0xD8, 0xFF, 0xE0, 0x00]);
        body.extend(encode_tlv(0x5F43, b"sig"));
        let elements = parse_all(&body).unwrap();
        assert_eq!(find(&elements, 0x5F43).unwrap().value, b"sig");
    }

    #[test]
    fn expect_tag_reports_mismatch() {
        let encoded = encode_tlv(0x75, &[]);
        let (tlv, _) = parse_one(&encoded).unwrap();
        assert_eq!(
            tlv.expect_tag(0x61),
            Err(TlvError::UnexpectedTag {
                expected: 0x61,
                found: 0x75
            })
        );
    }
}
