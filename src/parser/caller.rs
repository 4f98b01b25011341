// SPDX-License-Identifier: Apache-2.0

use crate::error::{KmsgError, Result};
use crate::parser::header::parse_decimal;
use crate::record::Caller;

const CALLER_PREFIX: &[u8] = b"caller=";

/// Decode the optional fifth metadata field, `caller=<T|C><id>`
pub(crate) fn parse_caller(field: Option<&[u8]>) -> Result<Option<Caller>> {
    let Some(field) = field else {
        return Ok(None);
    };

    let malformed = || {
        KmsgError::MalformedCaller(format!(
            "Invalid caller field '{}'",
            String::from_utf8_lossy(field)
        ))
    };

    let rest = field.strip_prefix(CALLER_PREFIX).ok_or_else(malformed)?;
    let (&kind, id) = rest.split_first().ok_or_else(malformed)?;
    let id = parse_decimal(id).ok_or_else(malformed)?;

    match kind {
        b'T' => Ok(Some(Caller::Thread(id))),
        b'C' => Ok(Some(Caller::Cpu(id))),
        _ => Err(malformed()),
    }
}
