/// Shift model
///
/// A shift is one employee's block of work on a weekday, with wall-clock
/// start and end times written as "HH:MM".

use super::employee::EmployeeRole;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Monday first
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub employee_id: String,
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub role: EmployeeRole,
    /// Display color token
    pub color: String,
}

/// Parses an "HH:MM" clock time
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

impl Shift {
    pub fn start(&self) -> Option<NaiveTime> {
        parse_clock(&self.start_time)
    }

    pub fn end(&self) -> Option<NaiveTime> {
        parse_clock(&self.end_time)
    }

    /// Length in whole hours, counted from the start hour to the end hour
    pub fn duration_hours(&self) -> u32 {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => end.hour().saturating_sub(start.hour()),
            _ => 0,
        }
    }

    /// Whether `time` falls strictly inside the shift
    pub fn covers(&self, time: NaiveTime) -> bool {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => start < time && time < end,
            _ => false,
        }
    }
}
