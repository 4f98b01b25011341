// SPDX-License-Identifier: Apache-2.0

//! Configured decoder for a kmsg read loop
//!
//! Wraps [`decode`] with severity filtering, optional strict facility checks
//! and logging of skipped records.

use crate::config::KmsgDecoderConfig;
use crate::error::{KmsgError, Result};
use crate::parser::decode;
use crate::record::{Facility, KmsgRecord, Severity};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Outcome of decoding one raw record
#[derive(Debug)]
pub enum Decoded {
    /// Successfully decoded and passed the severity filter
    Record(KmsgRecord),
    /// Record was filtered out by severity
    Filtered(Severity),
    /// Record could not be decoded, logged and skipped
    Skipped(KmsgError),
}

#[derive(Debug, Clone)]
pub struct KmsgDecoder {
    config: KmsgDecoderConfig,
    boot_time: SystemTime,
}

impl KmsgDecoder {
    /// `boot_time` must stay the same across calls so timestamps of
    /// different records remain comparable.
    pub fn new(config: KmsgDecoderConfig, boot_time: SystemTime) -> Result<Self> {
        config.validate()?;

        info!(
            priority_level = config.priority_level,
            strict_facility = config.strict_facility,
            "Kmsg decoder initialized"
        );

        Ok(Self { config, boot_time })
    }

    pub fn config(&self) -> &KmsgDecoderConfig {
        &self.config
    }

    pub fn boot_time(&self) -> SystemTime {
        self.boot_time
    }

    /// Decode without severity filtering
    pub fn decode(&self, raw: &[u8]) -> Result<KmsgRecord> {
        let record = decode(raw, self.boot_time)?;

        if self.config.strict_facility && record.facility == Facility::Unknown {
            return Err(KmsgError::UnknownFacility(record.priority_raw >> 3));
        }

        Ok(record)
    }

    /// Decode a record as read from the device. The terminating newline is
    /// dropped, any other trailing whitespace belongs to the message.
    pub fn classify(&self, raw: &[u8]) -> Decoded {
        match self.decode(raw) {
            Ok(record) => {
                if record.severity.level() <= self.config.priority_level {
                    Decoded::Record(record)
                } else {
                    debug!(
                        sequence = record.sequence,
                        severity = record.severity.as_str(),
                        "Filtered kmsg record"
                    );
                    Decoded::Filtered(record.severity)
                }
            }
            Err(e) => {
                warn!("Failed to parse kmsg record: {}", e);
                Decoded::Skipped(e)
            }
        }
    }
}
