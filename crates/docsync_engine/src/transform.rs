//! `datePosted` normalization applied to every record before indexing.

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use docsync_protocol::{Record, DATE_POSTED_FIELD};
use serde_json::Value;

/// Largest absolute epoch offset a date may carry, in milliseconds.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Converts a `datePosted` value to whole UNIX seconds.
///
/// Returns `Ok(None)` when the value should be left as it is: `null` or an
/// empty string. Numbers are epoch milliseconds; strings may be RFC 3339,
/// RFC 2822, a naive date-time (read as UTC) or a bare `YYYY-MM-DD` date
/// (UTC midnight). Seconds are rounded toward negative infinity.
pub fn parse_timestamp(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => parse_date_str(s).map(Some),
        Value::Number(n) => {
            if let Some(millis) = n.as_i64() {
                if (millis as f64).abs() > MAX_EPOCH_MILLIS {
                    return Err(format!("{millis} ms is outside the representable date range"));
                }
                Ok(Some(millis.div_euclid(1000)))
            } else {
                match n.as_f64() {
                    Some(millis) if millis.is_finite() && millis.abs() <= MAX_EPOCH_MILLIS => {
                        Ok(Some((millis.trunc() / 1000.0).floor() as i64))
                    }
                    _ => Err(format!("{n} ms is outside the representable date range")),
                }
            }
        }
        Value::Bool(_) => Err("expected a date string or epoch milliseconds, got a boolean".into()),
        Value::Array(_) => Err("expected a date string or epoch milliseconds, got an array".into()),
        Value::Object(_) => Err("expected a date string or epoch milliseconds, got an object".into()),
    }
}

fn parse_date_str(s: &str) -> Result<i64, String> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.timestamp());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt.timestamp());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.and_utc().timestamp());
        }
    }
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .ok_or_else(|| format!("{s:?} has no midnight")),
        Err(e) => Err(format!("{s:?} is not a recognized date ({e})")),
    }
}

/// Returns a copy of `record` with `datePosted` normalized to UNIX seconds.
///
/// Records without the field, or with a `null` or empty value, come back
/// unchanged. An unparsable value fails with [`SyncError::MalformedDate`].
pub fn transform_record(record: &Record) -> SyncResult<Record> {
    let mut transformed = record.clone();

    if let Some(value) = record.get(DATE_POSTED_FIELD) {
        match parse_timestamp(value) {
            Ok(Some(seconds)) => {
                transformed.insert(DATE_POSTED_FIELD, seconds);
            }
            Ok(None) => {}
            Err(reason) => {
                return Err(SyncError::MalformedDate {
                    record_id: record.id().unwrap_or("<no $id>").to_string(),
                    value: value.to_string(),
                    reason,
                })
            }
        }
    }

    Ok(transformed)
}

/// Transforms a page, failing on the first malformed record.
pub fn transform_page(records: &[Record]) -> SyncResult<Vec<Record>> {
    records.iter().map(transform_record).collect()
}
