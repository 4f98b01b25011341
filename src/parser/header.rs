// SPDX-License-Identifier: Apache-2.0

//! Metadata prefix of a kmsg record
//!
//! Format: `priority,sequence,timestamp,flags[,caller=<T|C><id>]` terminated by `;`

use crate::error::{KmsgError, Result};

/// Fourth metadata field. The kernel emits `-` for a standalone record,
/// `c` for the start of a continued record and `+` for a fragment of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordFlags {
    Standalone,
    Continued,
    Fragment,
    Other,
}

impl RecordFlags {
    fn parse(field: &[u8]) -> Self {
        match field {
            b"-" => RecordFlags::Standalone,
            b"c" => RecordFlags::Continued,
            b"+" => RecordFlags::Fragment,
            _ => RecordFlags::Other,
        }
    }
}

/// Parsed metadata prefix, borrowing the caller field from the raw record
#[derive(Debug)]
pub(crate) struct Header<'a> {
    pub priority: u64,
    pub sequence: u64,
    pub clock_us: u64,
    // Parsed but not carried into the record yet
    #[allow(dead_code)]
    pub flags: RecordFlags,
    pub caller: Option<&'a [u8]>,
}

/// Split a raw record at the first `;` into metadata prefix and body
pub(crate) fn split_record(raw: &[u8]) -> Result<(&[u8], &[u8])> {
    let pos = raw.iter().position(|&b| b == b';').ok_or_else(|| {
        KmsgError::MalformedRecord(format!(
            "Missing ';' separator in kmsg record: {}",
            String::from_utf8_lossy(raw)
        ))
    })?;

    Ok((&raw[..pos], &raw[pos + 1..]))
}

pub(crate) fn parse_header(prefix: &[u8]) -> Result<Header<'_>> {
    let parts: Vec<&[u8]> = prefix.split(|&b| b == b',').collect();
    if parts.len() < 4 {
        return Err(KmsgError::MalformedRecord(format!(
            "Invalid kmsg header format, expected at least 4 parts: {}",
            String::from_utf8_lossy(prefix)
        )));
    }

    let priority = parse_field("priority", parts[0])?;
    let sequence = parse_field("sequence", parts[1])?;
    let clock_us = parse_field("timestamp", parts[2])?;
    let flags = RecordFlags::parse(parts[3]);

    // Anything past the caller field is left for future kernel additions
    let caller = parts.get(4).copied();

    Ok(Header {
        priority,
        sequence,
        clock_us,
        flags,
        caller,
    })
}

fn parse_field(name: &str, field: &[u8]) -> Result<u64> {
    parse_decimal(field).ok_or_else(|| {
        KmsgError::MalformedRecord(format!(
            "Failed to parse {} '{}'",
            name,
            String::from_utf8_lossy(field)
        ))
    })
}

/// Strict base-10 unsigned parse: ASCII digits only, no sign, must fit in u64
pub(crate) fn parse_decimal(field: &[u8]) -> Option<u64> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }

    field.iter().try_fold(0u64, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
    })
}
