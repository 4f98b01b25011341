// SPDX-License-Identifier: Apache-2.0

//! Convert kmsg records to OTLP log records

use crate::record::{Caller, KmsgRecord};
use gethostname::gethostname;
use opentelemetry_proto::tonic::common::v1::{AnyValue, InstrumentationScope, KeyValue, any_value};
use opentelemetry_proto::tonic::logs::v1::{LogRecord, ResourceLogs, ScopeLogs};
use opentelemetry_proto::tonic::resource::v1::Resource;
use std::time::{SystemTime, UNIX_EPOCH};

// Log record attributes
const KMSG_PRIORITY_KEY: &str = "kmsg.priority";
const KMSG_PRIORITY_NAME_KEY: &str = "kmsg.priority_name";
const KMSG_FACILITY_KEY: &str = "kmsg.facility";
const KMSG_FACILITY_NAME_KEY: &str = "kmsg.facility_name";
const KMSG_SEQUENCE_KEY: &str = "kmsg.sequence";
const KMSG_CALLER_THREAD_KEY: &str = "kmsg.caller.thread_id";
const KMSG_CALLER_CPU_KEY: &str = "kmsg.caller.cpu_id";

// Resource attributes
const LOG_SOURCE_KEY: &str = "log.source";
const LOG_SOURCE_VALUE: &str = "kmsg";
const HOST_NAME_KEY: &str = "host.name";
const OS_TYPE_KEY: &str = "os.type";
const OS_TYPE_VALUE: &str = "linux";
const SERVICE_NAME_KEY: &str = "service.name";
const SERVICE_NAME_VALUE: &str = "kernel";

/// Convert a batch of KmsgRecords to OTLP ResourceLogs
pub fn convert_to_otlp_logs(records: Vec<KmsgRecord>) -> ResourceLogs {
    let log_records: Vec<LogRecord> = records
        .into_iter()
        .map(convert_record_to_log_record)
        .collect();

    let scope_logs = ScopeLogs {
        scope: Some(InstrumentationScope {
            name: "kmsg".to_string(),
            ..Default::default()
        }),
        log_records,
        schema_url: String::new(),
    };

    let mut resource_attributes = vec![
        string_attr(LOG_SOURCE_KEY, LOG_SOURCE_VALUE.to_string()),
        string_attr(OS_TYPE_KEY, OS_TYPE_VALUE.to_string()),
        string_attr(SERVICE_NAME_KEY, SERVICE_NAME_VALUE.to_string()),
    ];

    // Add hostname if available
    if let Ok(hostname) = gethostname().into_string() {
        resource_attributes.push(string_attr(HOST_NAME_KEY, hostname));
    }

    ResourceLogs {
        resource: Some(Resource {
            attributes: resource_attributes,
            ..Default::default()
        }),
        scope_logs: vec![scope_logs],
        schema_url: String::new(),
    }
}

/// Convert a single KmsgRecord to an OTLP LogRecord
///
/// The body is a string value when the message is valid UTF-8 and a bytes
/// value otherwise.
pub fn convert_record_to_log_record(record: KmsgRecord) -> LogRecord {
    let observed_time_unix_nano = unix_nanos(SystemTime::now());
    let time_unix_nano = unix_nanos(record.timestamp);

    let mut attributes = vec![
        int_attr(KMSG_PRIORITY_KEY, i64::from(record.severity.level())),
        string_attr(
            KMSG_PRIORITY_NAME_KEY,
            record.severity.as_str().to_string(),
        ),
        int_attr(
            KMSG_FACILITY_KEY,
            i64::try_from(record.priority_raw >> 3).unwrap_or(i64::MAX),
        ),
        string_attr(
            KMSG_FACILITY_NAME_KEY,
            record.facility.as_str().to_string(),
        ),
        int_attr(
            KMSG_SEQUENCE_KEY,
            i64::try_from(record.sequence).unwrap_or(i64::MAX),
        ),
    ];

    match record.caller {
        Some(Caller::Thread(id)) => attributes.push(int_attr(
            KMSG_CALLER_THREAD_KEY,
            i64::try_from(id).unwrap_or(i64::MAX),
        )),
        Some(Caller::Cpu(id)) => attributes.push(int_attr(
            KMSG_CALLER_CPU_KEY,
            i64::try_from(id).unwrap_or(i64::MAX),
        )),
        None => {}
    }

    let body = match String::from_utf8(record.message) {
        Ok(text) => any_value::Value::StringValue(text),
        Err(e) => any_value::Value::BytesValue(e.into_bytes()),
    };

    LogRecord {
        time_unix_nano,
        observed_time_unix_nano,
        severity_number: record.severity.to_otel_severity_number(),
        severity_text: record.severity.as_str().to_string(),
        body: Some(AnyValue { value: Some(body) }),
        attributes,
        ..Default::default()
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn string_attr(key: &str, value: String) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: Some(AnyValue {
            value: Some(any_value::Value::StringValue(value)),
        }),
    }
}

fn int_attr(key: &str, value: i64) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: Some(AnyValue {
            value: Some(any_value::Value::IntValue(value)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decode;
    use std::time::Duration;

    fn find_attr<'a>(log_record: &'a LogRecord, key: &str) -> Option<&'a any_value::Value> {
        log_record
            .attributes
            .iter()
            .find(|kv| kv.key == key)
            .and_then(|kv| kv.value.as_ref())
            .and_then(|v| v.value.as_ref())
    }

    #[test]
    fn test_convert_single_record() {
        let boot_time = UNIX_EPOCH + Duration::from_secs(1000);
        let record = decode(b"6,1234,5000000,-;Test message", boot_time).unwrap();

        let log_record = convert_record_to_log_record(record);

        // boot time + 5 seconds
        assert_eq!(log_record.time_unix_nano, 1_005_000_000_000);
        assert!(log_record.observed_time_unix_nano > 0);
        assert_eq!(log_record.severity_number, 9); // INFO
        assert_eq!(log_record.severity_text, "INFO");
        assert_eq!(
            log_record.body,
            Some(AnyValue {
                value: Some(any_value::Value::StringValue("Test message".to_string())),
            })
        );
        assert_eq!(
            find_attr(&log_record, KMSG_SEQUENCE_KEY),
            Some(&any_value::Value::IntValue(1234))
        );
        assert_eq!(find_attr(&log_record, KMSG_CALLER_THREAD_KEY), None);
        assert_eq!(find_attr(&log_record, KMSG_CALLER_CPU_KEY), None);
    }

    #[test]
    fn test_convert_record_with_facility() {
        // Priority 14 = facility 1 (user) + severity 6 (info)
        let record = decode(b"14,1234,1000000,-;User message", UNIX_EPOCH).unwrap();
        let log_record = convert_record_to_log_record(record);

        assert_eq!(
            find_attr(&log_record, KMSG_FACILITY_KEY),
            Some(&any_value::Value::IntValue(1))
        );
        assert_eq!(
            find_attr(&log_record, KMSG_FACILITY_NAME_KEY),
            Some(&any_value::Value::StringValue("user".to_string()))
        );
        assert_eq!(
            find_attr(&log_record, KMSG_PRIORITY_KEY),
            Some(&any_value::Value::IntValue(6))
        );
    }

    #[test]
    fn test_convert_caller_attributes() {
        let record = decode(b"6,378,5140900,-,caller=T148;ata1: up", UNIX_EPOCH).unwrap();
        let log_record = convert_record_to_log_record(record);
        assert_eq!(
            find_attr(&log_record, KMSG_CALLER_THREAD_KEY),
            Some(&any_value::Value::IntValue(148))
        );

        let record = decode(b"0,380,5140900,-,caller=C10;watchdog", UNIX_EPOCH).unwrap();
        let log_record = convert_record_to_log_record(record);
        assert_eq!(
            find_attr(&log_record, KMSG_CALLER_CPU_KEY),
            Some(&any_value::Value::IntValue(10))
        );
        assert_eq!(log_record.severity_number, 21); // FATAL
    }

    #[test]
    fn test_convert_invalid_utf8_body_as_bytes() {
        let record = decode(br"6,1,1,-;bad \xff byte", UNIX_EPOCH).unwrap();
        let log_record = convert_record_to_log_record(record);

        assert_eq!(
            log_record.body,
            Some(AnyValue {
                value: Some(any_value::Value::BytesValue(b"bad \xff byte".to_vec())),
            })
        );
    }

    #[test]
    fn test_convert_multiple_records() {
        let records = vec![
            decode(b"3,100,1000000,-;Error 1", UNIX_EPOCH).unwrap(),
            decode(b"6,101,2000000,-;Info 1", UNIX_EPOCH).unwrap(),
        ];

        let resource_logs = convert_to_otlp_logs(records);

        let log_records = &resource_logs.scope_logs[0].log_records;
        assert_eq!(log_records.len(), 2);
        assert_eq!(log_records[0].severity_number, 17); // ERROR
        assert_eq!(log_records[1].severity_number, 9); // INFO
        assert!(log_records[1].time_unix_nano > log_records[0].time_unix_nano);

        let resource = resource_logs.resource.unwrap();
        assert!(resource.attributes.iter().any(|kv| kv.key == LOG_SOURCE_KEY));
        assert!(
            resource
                .attributes
                .iter()
                .any(|kv| kv.key == SERVICE_NAME_KEY)
        );
    }
}
