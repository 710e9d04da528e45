//! Calendar appointment.
//!
//! # Invariants
//! - `date` is an absolute instant (UTC); local rendering is a UI concern.
//! - Storage order is insertion order; date order is a display projection.
//! - `date` is written as RFC 3339. Lists saved by the first app release carry
//!   it as seconds since 2001-01-01T00:00:00Z instead; both forms are read.

use super::record::{new_record_id, require_text, Record, RecordId, ValidationError};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z.
const REFERENCE_DATE_UNIX_SECS: i64 = 978_307_200;

/// One dated appointment with an optional reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub title: String,
    /// RFC 3339 in storage.
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    /// Whether a one-shot reminder was requested at creation.
    #[serde(default)]
    pub notify: bool,
}

impl Appointment {
    pub fn new(title: &str, date: DateTime<Utc>, notify: bool) -> Result<Self, ValidationError> {
        Ok(Self {
            id: new_record_id(),
            title: require_text("title", title)?,
            date,
            notify,
        })
    }
}

impl Record for Appointment {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDate {
    Rfc3339(DateTime<Utc>),
    ReferenceSeconds(f64),
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match StoredDate::deserialize(deserializer)? {
        StoredDate::Rfc3339(date) => Ok(date),
        StoredDate::ReferenceSeconds(secs) => from_reference_seconds(secs).ok_or_else(|| {
            serde::de::Error::custom(format!("date out of range: {secs}"))
        }),
    }
}

fn from_reference_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let millis = (secs * 1000.0).round();
    if millis.abs() > i64::MAX as f64 / 2.0 {
        return None;
    }
    let unix_millis = (millis as i64).checked_add(REFERENCE_DATE_UNIX_SECS * 1000)?;
    Utc.timestamp_millis_opt(unix_millis).single()
}
