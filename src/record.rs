// SPDX-License-Identifier: Apache-2.0

//! Decoded kmsg record and its classification types
//!
//! The kernel packs facility and severity into a single syslog priority value:
//! the low three bits carry the severity and the remaining bits the facility.

use std::borrow::Cow;
use std::fmt;
use std::time::SystemTime;

/// Kernel log severity levels (syslog severity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Emergency = 0, // System is unusable
    Alert = 1,     // Action must be taken immediately
    Critical = 2,  // Critical conditions
    Error = 3,     // Error conditions
    Warning = 4,   // Warning conditions
    Notice = 5,    // Normal but significant condition
    Info = 6,      // Informational
    Debug = 7,     // Debug-level messages
}

impl Severity {
    /// Extract the severity from a raw priority value (bits 0-2)
    pub fn from_priority(priority: u64) -> Self {
        match priority & 0x07 {
            0 => Severity::Emergency,
            1 => Severity::Alert,
            2 => Severity::Critical,
            3 => Severity::Error,
            4 => Severity::Warning,
            5 => Severity::Notice,
            6 => Severity::Info,
            // 7 is the only remaining possibility after & 0x07
            _ => Severity::Debug,
        }
    }

    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Short names as used by the kernel's `KERN_*` level macros
    pub fn keyword(&self) -> &'static str {
        match self {
            Severity::Emergency => "emerg",
            Severity::Alert => "alert",
            Severity::Critical => "crit",
            Severity::Error => "err",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Convert to OpenTelemetry severity number
    /// See: https://opentelemetry.io/docs/specs/otel/logs/data-model/#field-severitynumber
    pub fn to_otel_severity_number(&self) -> i32 {
        match self {
            Severity::Emergency => 21, // FATAL
            Severity::Alert => 21,     // FATAL
            Severity::Critical => 21,  // FATAL
            Severity::Error => 17,     // ERROR
            Severity::Warning => 13,   // WARN
            Severity::Notice => 10,    // INFO2
            Severity::Info => 9,       // INFO
            Severity::Debug => 5,      // DEBUG
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syslog facility codes
/// See: https://datatracker.ietf.org/doc/html/rfc5424#section-6.2.1
///
/// Codes the kernel may add later decode to `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    Kern,     // Kernel messages
    User,     // User-level messages
    Mail,     // Mail system
    Daemon,   // System daemons
    Auth,     // Security/authorization messages
    Syslog,   // Syslogd internal messages
    Lpr,      // Line printer subsystem
    News,     // Network news subsystem
    Uucp,     // UUCP subsystem
    Cron,     // Clock daemon
    Authpriv, // Security/authorization (private)
    Ftp,      // FTP daemon
    Ntp,      // NTP subsystem
    Audit,    // Log audit
    Alert,    // Log alert
    Clock,    // Clock daemon (note 2)
    Local0,
    Local1,
    Local2,
    Local3,
    Local4,
    Local5,
    Local6,
    Local7,
    Unknown,
}

impl Facility {
    /// Extract the facility from a raw priority value (bits 3 and up)
    pub fn from_priority(priority: u64) -> Self {
        match priority >> 3 {
            0 => Facility::Kern,
            1 => Facility::User,
            2 => Facility::Mail,
            3 => Facility::Daemon,
            4 => Facility::Auth,
            5 => Facility::Syslog,
            6 => Facility::Lpr,
            7 => Facility::News,
            8 => Facility::Uucp,
            9 => Facility::Cron,
            10 => Facility::Authpriv,
            11 => Facility::Ftp,
            12 => Facility::Ntp,
            13 => Facility::Audit,
            14 => Facility::Alert,
            15 => Facility::Clock,
            16 => Facility::Local0,
            17 => Facility::Local1,
            18 => Facility::Local2,
            19 => Facility::Local3,
            20 => Facility::Local4,
            21 => Facility::Local5,
            22 => Facility::Local6,
            23 => Facility::Local7,
            _ => Facility::Unknown,
        }
    }

    /// Numeric facility code, `None` for `Unknown`
    pub fn code(&self) -> Option<u8> {
        let code = match self {
            Facility::Kern => 0,
            Facility::User => 1,
            Facility::Mail => 2,
            Facility::Daemon => 3,
            Facility::Auth => 4,
            Facility::Syslog => 5,
            Facility::Lpr => 6,
            Facility::News => 7,
            Facility::Uucp => 8,
            Facility::Cron => 9,
            Facility::Authpriv => 10,
            Facility::Ftp => 11,
            Facility::Ntp => 12,
            Facility::Audit => 13,
            Facility::Alert => 14,
            Facility::Clock => 15,
            Facility::Local0 => 16,
            Facility::Local1 => 17,
            Facility::Local2 => 18,
            Facility::Local3 => 19,
            Facility::Local4 => 20,
            Facility::Local5 => 21,
            Facility::Local6 => 22,
            Facility::Local7 => 23,
            Facility::Unknown => return None,
        };
        Some(code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facility::Kern => "kern",
            Facility::User => "user",
            Facility::Mail => "mail",
            Facility::Daemon => "daemon",
            Facility::Auth => "auth",
            Facility::Syslog => "syslog",
            Facility::Lpr => "lpr",
            Facility::News => "news",
            Facility::Uucp => "uucp",
            Facility::Cron => "cron",
            Facility::Authpriv => "authpriv",
            Facility::Ftp => "ftp",
            Facility::Ntp => "ntp",
            Facility::Audit => "audit",
            Facility::Alert => "alert",
            Facility::Clock => "clock",
            Facility::Local0 => "local0",
            Facility::Local1 => "local1",
            Facility::Local2 => "local2",
            Facility::Local3 => "local3",
            Facility::Local4 => "local4",
            Facility::Local5 => "local5",
            Facility::Local6 => "local6",
            Facility::Local7 => "local7",
            Facility::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a record when the kernel is built with `CONFIG_PRINTK_CALLER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Caller {
    /// Emitted from task context, carries the thread ID
    Thread(u64),
    /// Emitted from interrupt context, carries the CPU number
    Cpu(u64),
}

impl Caller {
    pub fn id(&self) -> u64 {
        match self {
            Caller::Thread(id) | Caller::Cpu(id) => *id,
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caller::Thread(id) => write!(f, "T{}", id),
            Caller::Cpu(id) => write!(f, "C{}", id),
        }
    }
}

/// A decoded kernel message record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmsgRecord {
    /// The raw priority value from kmsg (contains both facility and severity)
    pub priority_raw: u64,
    pub facility: Facility,
    pub severity: Severity,
    /// Kernel message sequence number
    pub sequence: u64,
    /// Kernel timestamp in microseconds since boot
    pub clock_us: u64,
    /// Boot reference plus `clock_us`
    pub timestamp: SystemTime,
    pub caller: Option<Caller>,
    /// Unescaped message text, continuation lines joined with `\n`.
    /// Not guaranteed to be valid UTF-8.
    pub message: Vec<u8>,
}

impl KmsgRecord {
    /// Message as UTF-8, `None` if the kernel emitted invalid sequences
    pub fn message_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.message).ok()
    }

    pub fn message_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_priority_with_facility() {
        // Severity 6 with facility 1 (user) = 8 + 6 = 14
        assert_eq!(Severity::from_priority(14), Severity::Info);
        assert_eq!(Severity::from_priority(3), Severity::Error);
        assert_eq!(Severity::from_priority(191), Severity::Debug);
    }

    #[test]
    fn test_facility_and_severity_split_for_all_nominal_priorities() {
        for p in 0u64..192 {
            let facility = Facility::from_priority(p);
            let severity = Severity::from_priority(p);
            assert_eq!(facility.code(), Some((p / 8) as u8), "priority {}", p);
            assert_eq!(severity.level() as u64, p % 8, "priority {}", p);
        }
    }

    #[test]
    fn test_facility_extraction() {
        assert_eq!(Facility::from_priority(6), Facility::Kern);
        assert_eq!(Facility::from_priority(14).as_str(), "user");
        assert_eq!(Facility::from_priority(28), Facility::Daemon);
        assert_eq!(Facility::from_priority(134), Facility::Local0);
        assert_eq!(Facility::from_priority(190), Facility::Local7);
    }

    #[test]
    fn test_out_of_range_facility_is_unknown() {
        assert_eq!(Facility::from_priority(192), Facility::Unknown);
        assert_eq!(Facility::from_priority(u64::MAX), Facility::Unknown);
        assert_eq!(Facility::Unknown.code(), None);
        assert_eq!(Facility::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Emergency.as_str(), "EMERGENCY");
        assert_eq!(Severity::Emergency.keyword(), "emerg");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Critical.keyword(), "crit");
    }

    #[test]
    fn test_severity_to_otel() {
        assert_eq!(Severity::Emergency.to_otel_severity_number(), 21);
        assert_eq!(Severity::Error.to_otel_severity_number(), 17);
        assert_eq!(Severity::Warning.to_otel_severity_number(), 13);
        assert_eq!(Severity::Notice.to_otel_severity_number(), 10);
        assert_eq!(Severity::Info.to_otel_severity_number(), 9);
        assert_eq!(Severity::Debug.to_otel_severity_number(), 5);
    }

    #[test]
    fn test_caller_display() {
        assert_eq!(Caller::Thread(148).to_string(), "T148");
        assert_eq!(Caller::Cpu(10).to_string(), "C10");
        assert_eq!(Caller::Cpu(10).id(), 10);
    }

    #[test]
    fn test_message_views() {
        let mut record = KmsgRecord {
            priority_raw: 6,
            facility: Facility::Kern,
            severity: Severity::Info,
            sequence: 1,
            clock_us: 0,
            timestamp: SystemTime::UNIX_EPOCH,
            caller: None,
            message: "in µs".as_bytes().to_vec(),
        };
        assert_eq!(record.message_str(), Some("in µs"));

        record.message = vec![b'a', 0xff];
        assert_eq!(record.message_str(), None);
        assert_eq!(record.message_lossy(), "a\u{fffd}");
    }
}
