use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Badminton,
    Squash,
    Football,
    Basketball,
    Cricket,
}

impl Sport {
    pub const ALL: [Sport; 5] = [
        Sport::Badminton,
        Sport::Squash,
        Sport::Football,
        Sport::Basketball,
        Sport::Cricket,
    ];

    /// Value sent to the API.
    pub fn value(self) -> &'static str {
        match self {
            Sport::Badminton => "badminton",
            Sport::Squash => "squash",
            Sport::Football => "football",
            Sport::Basketball => "basketball",
            Sport::Cricket => "cricket",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sport::Badminton => "Badminton",
            Sport::Squash => "Squash",
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
            Sport::Cricket => "Cricket",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Sport::Badminton => "🏸",
            Sport::Squash => "🎾",
            Sport::Football => "⚽",
            Sport::Basketball => "🏀",
            Sport::Cricket => "🏏",
        }
    }

    /// Tailwind classes for the unselected card.
    pub fn card_class(self) -> &'static str {
        match self {
            Sport::Badminton => "bg-blue-50 border-blue-200 hover:bg-blue-100",
            Sport::Squash => "bg-green-50 border-green-200 hover:bg-green-100",
            Sport::Football => "bg-orange-50 border-orange-200 hover:bg-orange-100",
            Sport::Basketball => "bg-red-50 border-red-200 hover:bg-red-100",
            Sport::Cricket => "bg-purple-50 border-purple-200 hover:bg-purple-100",
        }
    }

    pub fn accent_class(self) -> &'static str {
        match self {
            Sport::Badminton => "text-blue-600",
            Sport::Squash => "text-green-600",
            Sport::Football => "text-orange-600",
            Sport::Basketball => "text-red-600",
            Sport::Cricket => "text-purple-600",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.value() == s)
            .ok_or_else(|| format!("unknown sport '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Court {
    #[serde(rename = "court_1")]
    Court1,
    #[serde(rename = "court_2")]
    Court2,
    #[serde(rename = "court_3")]
    Court3,
    #[serde(rename = "court_4")]
    Court4,
    #[serde(rename = "court_5")]
    Court5,
    #[serde(rename = "court_6")]
    Court6,
    #[serde(rename = "court_7")]
    Court7,
    #[serde(rename = "court_8")]
    Court8,
}

impl Court {
    pub const ALL: [Court; 8] = [
        Court::Court1,
        Court::Court2,
        Court::Court3,
        Court::Court4,
        Court::Court5,
        Court::Court6,
        Court::Court7,
        Court::Court8,
    ];

    pub fn number(self) -> u8 {
        match self {
            Court::Court1 => 1,
            Court::Court2 => 2,
            Court::Court3 => 3,
            Court::Court4 => 4,
            Court::Court5 => 5,
            Court::Court6 => 6,
            Court::Court7 => 7,
            Court::Court8 => 8,
        }
    }

    /// Identifier used by the API, e.g. `court_3`.
    pub fn id(self) -> &'static str {
        match self {
            Court::Court1 => "court_1",
            Court::Court2 => "court_2",
            Court::Court3 => "court_3",
            Court::Court4 => "court_4",
            Court::Court5 => "court_5",
            Court::Court6 => "court_6",
            Court::Court7 => "court_7",
            Court::Court8 => "court_8",
        }
    }

    pub fn label(self) -> String {
        format!("Court {}", self.number())
    }
}

impl fmt::Display for Court {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Court {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Court::ALL
            .into_iter()
            .find(|court| court.id() == s)
            .ok_or_else(|| format!("unknown court '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Evening];

    pub fn heading(self) -> &'static str {
        match self {
            Period::Morning => "Morning (9 AM - 12 PM)",
            Period::Afternoon => "Afternoon (12 PM - 5 PM)",
            Period::Evening => "Evening (5 PM onwards)",
        }
    }
}

/// One of the fixed bookable slots. The inner value is the starting hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(u8);

impl TimeSlot {
    pub const ALL: [TimeSlot; 9] = [
        TimeSlot(9),
        TimeSlot(10),
        TimeSlot(11),
        TimeSlot(12),
        TimeSlot(13),
        TimeSlot(14),
        TimeSlot(15),
        TimeSlot(16),
        TimeSlot(17),
    ];

    pub fn from_hour(hour: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.0 == hour)
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    /// Value sent to the API and used as the availability key, e.g. `9:00`.
    pub fn value(self) -> String {
        format!("{}:00", self.0)
    }

    /// 12-hour label shown on the slot button, e.g. `1:00 PM`.
    pub fn label(self) -> String {
        match self.0 {
            h @ 0..=11 => format!("{}:00 AM", h),
            12 => "12:00 PM".to_string(),
            h => format!("{}:00 PM", h - 12),
        }
    }

    pub fn period(self) -> Period {
        match self.0 {
            0..=11 => Period::Morning,
            12..=16 => Period::Afternoon,
            _ => Period::Evening,
        }
    }

    pub fn in_period(period: Period) -> impl Iterator<Item = TimeSlot> {
        Self::ALL.into_iter().filter(move |slot| slot.period() == period)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00", self.0)
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hour = s
            .strip_suffix(":00")
            .and_then(|h| h.parse::<u8>().ok())
            .ok_or_else(|| format!("malformed time slot '{}'", s))?;
        TimeSlot::from_hour(hour).ok_or_else(|| format!("unknown time slot '{}'", s))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_cover_nine_to_five() {
        let values: Vec<String> = TimeSlot::ALL.iter().map(|s| s.value()).collect();
        assert_eq!(values.first().map(String::as_str), Some("9:00"));
        assert_eq!(values.last().map(String::as_str), Some("17:00"));
        assert_eq!(values.len(), 9);
    }

    #[test]
    fn slot_labels_and_periods() {
        let one_pm: TimeSlot = "13:00".parse().unwrap();
        assert_eq!(one_pm.label(), "1:00 PM");
        assert_eq!(one_pm.period(), Period::Afternoon);
        assert_eq!(TimeSlot::from_hour(12).unwrap().label(), "12:00 PM");
        assert_eq!(TimeSlot::from_hour(9).unwrap().period(), Period::Morning);
        assert_eq!(TimeSlot::from_hour(17).unwrap().period(), Period::Evening);
        assert_eq!(TimeSlot::in_period(Period::Afternoon).count(), 5);
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("8:00".parse::<TimeSlot>().is_err());
        assert!("9:30".parse::<TimeSlot>().is_err());
        assert!("court_9".parse::<Court>().is_err());
        assert!("tennis".parse::<Sport>().is_err());
    }

    #[test]
    fn serde_uses_api_values() {
        assert_eq!(serde_json::to_string(&Court::Court4).unwrap(), "\"court_4\"");
        assert_eq!(serde_json::to_string(&Sport::Cricket).unwrap(), "\"cricket\"");
        let slot: TimeSlot = serde_json::from_str("\"10:00\"").unwrap();
        assert_eq!(slot.hour(), 10);
    }
}
