// SPDX-License-Identifier: Apache-2.0

//! Parser for the Linux kernel message format
//!
//! Reading `/dev/kmsg` yields one record per read:
//! `priority,sequence,timestamp,flags[,caller=<T|C><id>];message\n`
//! optionally followed by dictionary lines that start with a single space.
//!
//! Where:
//! - priority: syslog priority (0-7 for severity, higher bits for facility)
//! - sequence: kernel message sequence number
//! - timestamp: microseconds since boot
//! - flags: `-`, `c` or `+`, continuation state of the record
//! - caller: thread or CPU that emitted the message (`CONFIG_PRINTK_CALLER`)
//! - message: the log text, with non-printable bytes escaped as `\xHH`
//!
//! Example: `6,339,5140900,-;NET: Registered protocol family 10`
//! Example with caller: `6,378,5140900,-,caller=T148;ata1: SATA max UDMA/133`

mod caller;
mod continuation;
mod escape;
mod header;

pub use escape::{escape, unescape};

use crate::error::{KmsgError, Result};
use crate::record::{Facility, KmsgRecord, Severity};
use std::time::{Duration, SystemTime};

/// Decode one raw kmsg record, continuation lines included.
///
/// `boot_time` is the wall-clock instant matching a kernel clock of zero. The
/// record's timestamp is `boot_time` plus its clock value. Either the whole
/// record decodes or an error is returned.
pub fn decode(raw: &[u8], boot_time: SystemTime) -> Result<KmsgRecord> {
    let (prefix, body) = header::split_record(raw)?;
    let header = header::parse_header(prefix)?;
    let caller = caller::parse_caller(header.caller)?;

    let timestamp = boot_time
        .checked_add(Duration::from_micros(header.clock_us))
        .ok_or_else(|| {
            KmsgError::MalformedRecord(format!(
                "Timestamp {} overflows the boot reference time",
                header.clock_us
            ))
        })?;

    Ok(KmsgRecord {
        priority_raw: header.priority,
        facility: Facility::from_priority(header.priority),
        severity: Severity::from_priority(header.priority),
        sequence: header.sequence,
        clock_us: header.clock_us,
        timestamp,
        caller,
        message: continuation::aggregate(body),
    })
}
