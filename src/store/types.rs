// Reservation data types module
// Defines court categories, the reservation record, and the wire time format

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Wire format for slot timestamps, minute precision ("2026-03-01T09:00")
const TIME_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";
/// Accepted on input when a client sends seconds as well
const TIME_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a slot timestamp from its wire form.
///
/// Timestamps are compared chronologically after parsing; the string form
/// is only the transport representation.
pub fn parse_slot_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT_MINUTES)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, TIME_FORMAT_SECONDS))
        .ok()
}

/// Format a slot timestamp back to its wire form.
///
/// Minute precision unless the stored value carries seconds.
pub fn format_slot_time(time: &NaiveDateTime) -> String {
    if time.second() == 0 {
        time.format(TIME_FORMAT_MINUTES).to_string()
    } else {
        time.format(TIME_FORMAT_SECONDS).to_string()
    }
}

/// Serde adapter for `NaiveDateTime` fields using the wire time format
pub mod slot_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_slot_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_slot_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid slot timestamp: {raw}")))
    }
}

/// Bookable court categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Basketball,
    Tennis,
}

impl Category {
    /// Parse the wire form of a category. Matching is exact, as in the UI's
    /// select options.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Basketball" => Some(Self::Basketball),
            "Tennis" => Some(Self::Tennis),
            _ => None,
        }
    }
}

/// A confirmed reservation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: u64,
    pub court_type: Category,
    #[serde(with = "slot_time")]
    pub start_time: NaiveDateTime,
    #[serde(with = "slot_time")]
    pub end_time: NaiveDateTime,
    pub student_id: String,
}

/// Raw booking input as decoded from the wire, before validation.
///
/// Doubles as the JSON body shape for POST; every field is optional so
/// validation can report the first missing one.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBooking {
    pub court_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub student_id: Option<String>,
}

/// A booking request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub court_type: Category,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub student_id: String,
}

/// Tagged failure returned by store operations.
///
/// The store never panics across its boundary; the API layer is the only
/// place these are turned into status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Rejected input, first failing rule's message
    Validation(String),
    /// Requested interval overlaps an existing reservation
    Conflict(String),
    /// Exact-match delete found nothing
    NotFound(String),
    /// Positional delete outside the visible list
    InvalidIndex(String),
}

impl StoreError {
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Conflict(m) | Self::NotFound(m) | Self::InvalidIndex(m) => m,
        }
    }
}
