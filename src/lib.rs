// SPDX-License-Identifier: Apache-2.0

//! Decoder for Linux kernel message (kmsg) records
//!
//! Turns one record read from `/dev/kmsg`, dictionary lines included, into a
//! typed [`KmsgRecord`] carrying facility, severity, sequence number, timing
//! and caller metadata. Reading the device is left to the caller, which also
//! supplies the boot time that anchors record timestamps.
//!
//! ```
//! use kmsg_decoder::{Caller, Severity, decode};
//! use std::time::UNIX_EPOCH;
//!
//! let record = decode(b"6,378,5140900,-,caller=T148;ata1: link up", UNIX_EPOCH).unwrap();
//! assert_eq!(record.severity, Severity::Info);
//! assert_eq!(record.caller, Some(Caller::Thread(148)));
//! ```

pub mod config;
pub mod convert;
pub mod decoder;
pub mod error;
pub mod parser;
pub mod record;

pub use config::KmsgDecoderConfig;
pub use decoder::{Decoded, KmsgDecoder};
pub use error::{KmsgError, Result};
pub use parser::{decode, escape, unescape};
pub use record::{Caller, Facility, KmsgRecord, Severity};
