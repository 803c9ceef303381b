//! Property-based test generators using proptest.
//!
//! Provides strategies for generating collections that keep the
//! invariants the sync engine relies on: unique string ids and dates
//! with a known epoch value.

use chrono::DateTime;
use docsync_protocol::{Record, DATE_POSTED_FIELD};
use proptest::prelude::*;
use serde_json::Value;

/// Earliest generated timestamp (1970-01-01).
const MIN_SECONDS: i64 = 0;
/// Latest generated timestamp (2100-01-01).
const MAX_SECONDS: i64 = 4_102_444_800;

/// Strategy for document ids.
pub fn record_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{1,20}").expect("Invalid regex")
}

/// Strategy for plain field values.
pub fn field_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,40}".prop_map(Value::from),
        prop::collection::vec("[a-z]{1,8}", 0..4).prop_map(Value::from),
    ]
}

/// Strategy for a record with an id and a few extra fields.
///
/// Field names never collide with `$id` or `datePosted`.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    (
        record_id_strategy(),
        prop::collection::btree_map("[a-z]{1,10}", field_value_strategy(), 0..6),
    )
        .prop_map(|(id, fields)| {
            fields
                .into_iter()
                .filter(|(name, _)| name != DATE_POSTED_FIELD)
                .fold(Record::with_id(id), |record, (name, value)| {
                    record.with_field(name, value)
                })
        })
}

/// Strategy for a collection of up to `max` records with unique ids.
pub fn collection_strategy(max: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::btree_set(record_id_strategy(), 0..=max).prop_map(|ids| {
        ids.into_iter()
            .enumerate()
            .map(|(i, id)| Record::with_id(id).with_field("rank", i as u64))
            .collect()
    })
}

/// Strategy for UNIX seconds in a plausible publication range.
pub fn epoch_seconds_strategy() -> impl Strategy<Value = i64> {
    MIN_SECONDS..MAX_SECONDS
}

/// Strategy for an RFC 3339 date string paired with its UNIX seconds.
///
/// Sub-second digits are added so that truncation is exercised.
pub fn dated_string_strategy() -> impl Strategy<Value = (String, i64)> {
    (epoch_seconds_strategy(), 0u32..1000).prop_map(|(secs, millis)| {
        let text = DateTime::from_timestamp(secs, millis * 1_000_000)
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
            .unwrap_or_default();
        (text, secs)
    })
}

/// Strategy for a record whose `datePosted` is a date string, paired with
/// the expected UNIX seconds.
pub fn dated_record_strategy() -> impl Strategy<Value = (Record, i64)> {
    (record_strategy(), dated_string_strategy())
        .prop_map(|(record, (date, secs))| (record.with_field(DATE_POSTED_FIELD, date), secs))
}
