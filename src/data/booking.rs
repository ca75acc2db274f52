use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{Court, Sport, TimeSlot};

/// The reservation being assembled by the wizard, one field per step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub sport: Option<Sport>,
    pub date: Option<NaiveDate>,
    pub court: Option<Court>,
    pub time_slot: Option<TimeSlot>,
}

impl BookingDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Availability keyed by slot value (`9:00`) or court id (`court_1`).
///
/// A missing key reads as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityMap(HashMap<String, bool>);

impl AvailabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, available: bool) {
        self.0.insert(key.into(), available);
    }

    pub fn is_available(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.0.values().filter(|available| **available).count()
    }
}

impl FromIterator<(String, bool)> for AvailabilityMap {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Body of `POST bookings/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub sport: Sport,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub court: Option<Court>,
    pub time_slot: TimeSlot,
    pub booking_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "bg-blue-100 text-blue-700",
            BookingStatus::Completed => "bg-green-100 text-green-700",
            BookingStatus::Cancelled => "bg-red-100 text-red-700",
            BookingStatus::Pending => "bg-gray-100 text-gray-700",
        }
    }
}

/// A reservation owned by the signed-in user, as returned by `GET bookings/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(default)]
    pub id: i64,
    pub sport: String,
    #[serde(default)]
    pub sport_display: String,
    pub booking_date: NaiveDate,
    pub time_slot: String,
    #[serde(default)]
    pub time_slot_display: String,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub court_display: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub status_display: Option<String>,
}

impl BookingRecord {
    pub fn sport_label(&self) -> &str {
        if self.sport_display.is_empty() {
            &self.sport
        } else {
            &self.sport_display
        }
    }

    pub fn time_label(&self) -> &str {
        if self.time_slot_display.is_empty() {
            &self.time_slot
        } else {
            &self.time_slot_display
        }
    }

    pub fn status_label(&self) -> &str {
        self.status_display
            .as_deref()
            .unwrap_or_else(|| self.status.as_str())
    }
}

/// `GET bookings/` answers with either a bare array or a paginated envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BookingList {
    Page { results: Vec<BookingRecord> },
    Plain(Vec<BookingRecord>),
}

impl BookingList {
    pub fn into_records(self) -> Vec<BookingRecord> {
        match self {
            BookingList::Page { results } => results,
            BookingList::Plain(records) => records,
        }
    }
}

/// `GET bookings/available_courts/` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableCourts {
    #[serde(default)]
    pub available_courts: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "id": 7,
        "sport": "squash",
        "sport_display": "Squash",
        "booking_date": "2024-01-02",
        "time_slot": "10:00",
        "time_slot_display": "10:00 AM",
        "status": "confirmed"
    }"#;

    #[test]
    fn booking_list_accepts_both_shapes() {
        let plain = format!("[{}]", RECORD);
        let page = format!("{{\"count\": 1, \"results\": [{}]}}", RECORD);

        let plain: BookingList = serde_json::from_str(&plain).unwrap();
        let page: BookingList = serde_json::from_str(&page).unwrap();

        assert_eq!(plain.into_records(), page.into_records());
    }

    #[test]
    fn record_labels_fall_back_to_raw_values() {
        let mut record: BookingRecord = serde_json::from_str(RECORD).unwrap();
        assert_eq!(record.sport_label(), "Squash");
        assert_eq!(record.status_label(), "confirmed");
        assert_eq!(record.court, None);

        record.time_slot_display.clear();
        assert_eq!(record.time_label(), "10:00");
    }

    #[test]
    fn new_booking_omits_missing_court() {
        let body = NewBooking {
            sport: Sport::Badminton,
            court: None,
            time_slot: TimeSlot::from_hour(9).unwrap(),
            booking_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sport": "badminton",
                "time_slot": "9:00",
                "booking_date": "2024-01-01"
            })
        );
    }

    #[test]
    fn created_booking_without_id_still_decodes() {
        let record: BookingRecord = serde_json::from_str(
            r#"{"sport": "badminton", "booking_date": "2024-01-01", "time_slot": "9:00", "court": "court_2"}"#,
        )
        .unwrap();
        assert_eq!(record.id, 0);
        assert_eq!(record.court.as_deref(), Some("court_2"));
        assert_eq!(record.status, BookingStatus::Pending);
    }

    #[test]
    fn missing_keys_are_unavailable() {
        let map: AvailabilityMap = serde_json::from_str(r#"{"9:00": false, "10:00": true}"#).unwrap();
        assert!(!map.is_available("9:00"));
        assert!(map.is_available("10:00"));
        assert!(!map.is_available("11:00"));
        assert_eq!(map.open_count(), 1);
    }
}
