// SPDX-License-Identifier: Apache-2.0

use crate::error::{KmsgError, Result};
use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;

/// Environment prefix read by [`KmsgDecoderConfig::from_env`]
pub const ENV_PREFIX: &str = "KMSG_DECODER_";

/// Default priority level filter (6 = LOG_INFO, includes all priorities <= 6)
pub const DEFAULT_PRIORITY_LEVEL: u8 = 6;

/// Maximum valid priority level (DEBUG)
pub const MAX_PRIORITY_LEVEL: u8 = 7;

/// Configuration for the kmsg decoder
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KmsgDecoderConfig {
    /// Maximum severity level to include (0=emerg, 1=alert, 2=crit, 3=err, 4=warn, 5=notice, 6=info, 7=debug)
    /// Records with severity <= this value are kept.
    pub priority_level: u8,

    /// Reject records whose facility code is outside the known syslog range
    /// instead of reporting them as `Facility::Unknown`
    pub strict_facility: bool,
}

impl Default for KmsgDecoderConfig {
    fn default() -> Self {
        Self {
            priority_level: DEFAULT_PRIORITY_LEVEL,
            strict_facility: false,
        }
    }
}

impl KmsgDecoderConfig {
    pub fn new(priority_level: u8) -> Self {
        Self {
            // Clamp priority level to valid range 0-7
            priority_level: priority_level.min(MAX_PRIORITY_LEVEL),
            ..Default::default()
        }
    }

    /// Load from `KMSG_DECODER_*` environment variables, e.g.
    /// `KMSG_DECODER_PRIORITY_LEVEL=4`
    pub fn from_env() -> Result<Self> {
        Self::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().map_err(|e| {
            KmsgError::Configuration(format!("failed to parse kmsg decoder config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.priority_level > MAX_PRIORITY_LEVEL {
            return Err(KmsgError::Configuration(format!(
                "Priority level {} exceeds maximum {}",
                self.priority_level, MAX_PRIORITY_LEVEL
            )));
        }

        Ok(())
    }

    pub fn with_priority_level(mut self, priority_level: u8) -> Self {
        self.priority_level = priority_level.min(MAX_PRIORITY_LEVEL);
        self
    }

    pub fn with_strict_facility(mut self, strict_facility: bool) -> Self {
        self.strict_facility = strict_facility;
        self
    }
}
