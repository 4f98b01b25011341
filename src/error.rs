// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KmsgError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Malformed caller: {0}")]
    MalformedCaller(String),

    #[error("Unknown facility code {0}")]
    UnknownFacility(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, KmsgError>;
