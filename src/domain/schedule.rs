//! Time-of-day, duration, and the two schedule entry shapes (weekly class
//! instances and dated event sessions).

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::common::Identifiable;
use crate::errors::DojoError;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => write!(f, "AM"),
            Meridiem::Pm => write!(f, "PM"),
        }
    }
}

/// Twelve-hour clock reading: hour in `1..=12`, minute in `0..=59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeOfDay")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    meridiem: Meridiem,
}

/// Unchecked wire form; stored times pass through [`TimeOfDay::new`].
#[derive(Deserialize)]
struct RawTimeOfDay {
    hour: u8,
    minute: u8,
    meridiem: Meridiem,
}

impl TryFrom<RawTimeOfDay> for TimeOfDay {
    type Error = DojoError;

    fn try_from(raw: RawTimeOfDay) -> Result<Self, Self::Error> {
        TimeOfDay::new(raw.hour, raw.minute, raw.meridiem)
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self {
            hour: 6,
            minute: 0,
            meridiem: Meridiem::Pm,
        }
    }
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8, meridiem: Meridiem) -> Result<Self, DojoError> {
        if !(1..=12).contains(&hour) {
            return Err(DojoError::InvalidInput(format!(
                "hour must be between 1 and 12 (got {hour})"
            )));
        }
        if minute > 59 {
            return Err(DojoError::InvalidInput(format!(
                "minute must be between 0 and 59 (got {minute})"
            )));
        }
        Ok(Self {
            hour,
            minute,
            meridiem,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    pub fn to_naive(self) -> NaiveTime {
        let hour24 = match (self.hour, self.meridiem) {
            (12, Meridiem::Am) => 0,
            (12, Meridiem::Pm) => 12,
            (hour, Meridiem::Am) => hour,
            (hour, Meridiem::Pm) => hour + 12,
        };
        NaiveTime::from_hms_opt(u32::from(hour24), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    pub fn from_naive(time: NaiveTime) -> Self {
        let hour24 = time.hour();
        let meridiem = if hour24 >= 12 {
            Meridiem::Pm
        } else {
            Meridiem::Am
        };
        let hour = match hour24 % 12 {
            0 => 12,
            other => other,
        };
        Self {
            hour: hour as u8,
            minute: time.minute() as u8,
            meridiem,
        }
    }

    /// Clock reading after `duration`, plus how many midnights were crossed.
    pub fn advance(self, duration: SessionDuration) -> (TimeOfDay, u32) {
        let delta = Duration::minutes(i64::from(duration.total_minutes()));
        let (end, overflow_secs) = self.to_naive().overflowing_add_signed(delta);
        let days = (overflow_secs / SECONDS_PER_DAY).max(0) as u32;
        (Self::from_naive(end), days)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour, self.minute, self.meridiem)
    }
}

impl FromStr for TimeOfDay {
    type Err = DojoError;

    /// Accepts `6:30 PM`, `6:30pm`, `6 PM`, or 24-hour `18:30`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_uppercase();
        let invalid = || DojoError::InvalidInput(format!("unrecognised time `{}`", input.trim()));

        let (clock, meridiem) = if let Some(rest) = normalized.strip_suffix("AM") {
            (rest.trim(), Some(Meridiem::Am))
        } else if let Some(rest) = normalized.strip_suffix("PM") {
            (rest.trim(), Some(Meridiem::Pm))
        } else {
            (normalized.as_str(), None)
        };

        let (hour_text, minute_text) = clock.split_once(':').unwrap_or((clock, "0"));
        let hour: u8 = hour_text.trim().parse().map_err(|_| invalid())?;
        let minute: u8 = minute_text.trim().parse().map_err(|_| invalid())?;

        match meridiem {
            Some(meridiem) => TimeOfDay::new(hour, minute, meridiem),
            None => NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0)
                .map(TimeOfDay::from_naive)
                .ok_or_else(invalid),
        }
    }
}

/// Length of a class instance or event session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDuration {
    pub hours: u8,
    pub minutes: u8,
}

impl Default for SessionDuration {
    fn default() -> Self {
        Self {
            hours: 1,
            minutes: 0,
        }
    }
}

impl SessionDuration {
    pub fn new(hours: u8, minutes: u8) -> Self {
        Self { hours, minutes }
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }

    pub fn total_minutes(&self) -> u32 {
        u32::from(self.hours) * 60 + u32::from(self.minutes)
    }
}

impl fmt::Display for SessionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.hours, self.minutes) {
            (0, minutes) => write!(f, "{minutes}m"),
            (hours, 0) => write!(f, "{hours}h"),
            (hours, minutes) => write!(f, "{hours}h {minutes}m"),
        }
    }
}

impl FromStr for SessionDuration {
    type Err = DojoError;

    /// Accepts `1:30`, `1h 30m`, `1h`, `45m`, or a bare minute count.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim().to_ascii_lowercase();
        let invalid = || DojoError::InvalidInput(format!("unrecognised duration `{}`", input.trim()));

        let total_minutes: u32 = if let Some((h, m)) = trimmed.split_once(':') {
            let hours: u32 = h.trim().parse().map_err(|_| invalid())?;
            let minutes: u32 = m.trim().parse().map_err(|_| invalid())?;
            hours * 60 + minutes
        } else if trimmed.contains('h') || trimmed.contains('m') {
            let mut total = 0u32;
            for token in trimmed.split_whitespace() {
                if let Some(value) = token.strip_suffix('h') {
                    total += value.parse::<u32>().map_err(|_| invalid())? * 60;
                } else if let Some(value) = token.strip_suffix('m') {
                    total += value.parse::<u32>().map_err(|_| invalid())?;
                } else {
                    return Err(invalid());
                }
            }
            total
        } else {
            trimmed.parse().map_err(|_| invalid())?
        };

        let hours = u8::try_from(total_minutes / 60).map_err(|_| invalid())?;
        Ok(Self {
            hours,
            minutes: (total_minutes % 60) as u8,
        })
    }
}

/// Full English weekday name.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Shared shape of schedule entries: staffed, timed, uniquely identified.
pub trait ScheduleEntry: Identifiable {
    fn staff_id(&self) -> &str;

    fn duration(&self) -> SessionDuration;

    /// An entry is complete once it has a staff member and a non-zero length.
    fn is_complete(&self) -> bool {
        !self.staff_id().trim().is_empty() && !self.duration().is_zero()
    }
}

/// One weekly occurrence of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInstance {
    pub id: String,
    pub weekday: Weekday,
    pub start: TimeOfDay,
    pub duration: SessionDuration,
    pub staff_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
}

impl ScheduleInstance {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weekday: Weekday::Mon,
            start: TimeOfDay::default(),
            duration: SessionDuration::default(),
            staff_id: String::new(),
            assistant_id: None,
        }
    }

    pub fn end_time(&self) -> TimeOfDay {
        self.start.advance(self.duration).0
    }
}

impl Identifiable for ScheduleInstance {
    fn id(&self) -> &str {
        &self.id
    }
}

impl ScheduleEntry for ScheduleInstance {
    fn staff_id(&self) -> &str {
        &self.staff_id
    }

    fn duration(&self) -> SessionDuration {
        self.duration
    }
}

/// One dated session of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSession {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub start: TimeOfDay,
    pub duration: SessionDuration,
    pub staff_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
}

impl EventSession {
    pub fn new(id: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            id: id.into(),
            date,
            start: TimeOfDay::default(),
            duration: SessionDuration::default(),
            staff_id: String::new(),
            assistant_id: None,
        }
    }

    pub fn end_time(&self) -> TimeOfDay {
        self.start.advance(self.duration).0
    }
}

impl Identifiable for EventSession {
    fn id(&self) -> &str {
        &self.id
    }
}

impl ScheduleEntry for EventSession {
    fn staff_id(&self) -> &str {
        &self.staff_id
    }

    fn duration(&self) -> SessionDuration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u8, minute: u8, meridiem: Meridiem) -> TimeOfDay {
        TimeOfDay::new(hour, minute, meridiem).unwrap()
    }

    #[test]
    fn stored_times_are_checked_on_load() {
        let json = serde_json::to_string(&time(7, 30, Meridiem::Am)).unwrap();
        let loaded: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, time(7, 30, Meridiem::Am));

        let bad_hour = json.replace("\"hour\":7", "\"hour\":13");
        assert!(serde_json::from_str::<TimeOfDay>(&bad_hour).is_err());
        let bad_minute = json.replace("\"minute\":30", "\"minute\":75");
        assert!(serde_json::from_str::<TimeOfDay>(&bad_minute).is_err());
    }

    #[test]
    fn rejects_out_of_range_clock_values() {
        assert!(TimeOfDay::new(0, 0, Meridiem::Am).is_err());
        assert!(TimeOfDay::new(13, 0, Meridiem::Pm).is_err());
        assert!(TimeOfDay::new(5, 60, Meridiem::Pm).is_err());
    }

    #[test]
    fn end_time_rolls_over_noon() {
        let (end, days) = time(11, 30, Meridiem::Am).advance(SessionDuration::new(1, 30));
        assert_eq!(end, time(1, 0, Meridiem::Pm));
        assert_eq!(days, 0);
    }

    #[test]
    fn end_time_rolls_over_midnight() {
        let (end, days) = time(11, 15, Meridiem::Pm).advance(SessionDuration::new(1, 0));
        assert_eq!(end, time(12, 15, Meridiem::Am));
        assert_eq!(days, 1);
    }

    #[test]
    fn twelve_am_and_pm_map_to_midnight_and_noon() {
        assert_eq!(time(12, 0, Meridiem::Am).to_naive(), NaiveTime::MIN);
        assert_eq!(
            time(12, 0, Meridiem::Pm).to_naive(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn parses_twelve_and_twenty_four_hour_input() {
        assert_eq!("6:30 pm".parse::<TimeOfDay>().unwrap(), time(6, 30, Meridiem::Pm));
        assert_eq!("7 AM".parse::<TimeOfDay>().unwrap(), time(7, 0, Meridiem::Am));
        assert_eq!("18:45".parse::<TimeOfDay>().unwrap(), time(6, 45, Meridiem::Pm));
        assert!("25:00".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn parses_duration_formats() {
        assert_eq!("1:30".parse::<SessionDuration>().unwrap(), SessionDuration::new(1, 30));
        assert_eq!("1h 15m".parse::<SessionDuration>().unwrap(), SessionDuration::new(1, 15));
        assert_eq!("90".parse::<SessionDuration>().unwrap(), SessionDuration::new(1, 30));
        assert_eq!("45m".parse::<SessionDuration>().unwrap(), SessionDuration::new(0, 45));
        assert!("soon".parse::<SessionDuration>().is_err());
    }

    #[test]
    fn completeness_needs_staff_and_length() {
        let mut instance = ScheduleInstance::new("instance-1");
        assert!(!instance.is_complete());
        instance.staff_id = "staff-1".into();
        assert!(instance.is_complete());
        instance.duration = SessionDuration::new(0, 0);
        assert!(!instance.is_complete());
    }

    #[test]
    fn display_formats() {
        assert_eq!(time(7, 5, Meridiem::Am).to_string(), "7:05 AM");
        assert_eq!(SessionDuration::new(1, 30).to_string(), "1h 30m");
        assert_eq!(SessionDuration::new(0, 45).to_string(), "45m");
        assert_eq!(SessionDuration::new(2, 0).to_string(), "2h");
    }
}
