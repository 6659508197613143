//! Decoding of the compact iCalendar date-time form and week arithmetic.
//!
//! Feed times are `YYYYMMDD`, optionally followed by `THHMMSS`, optionally
//! followed by `Z`. Without the `Z` the value is a local wall-clock time.

use std::{fmt, str::FromStr};

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Utc, Weekday,
};

use crate::error::{ScheduleError, ScheduleResult};

const DATE_LEN: usize = 8;
const TIME_LEN: usize = 7;

/// A decoded feed time.
///
/// Local values are kept as wall-clock times; only UTC values are instants.
/// All comparisons go through [`Timestamp::naive_local`], which is the one
/// place the ambient time zone is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Local(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl Timestamp {
    /// Decode the compact form positionally.
    pub fn parse(compact: &str) -> ScheduleResult<Self> {
        let malformed = || ScheduleError::MalformedTimestamp(compact.to_string());
        let bytes = compact.as_bytes();
        if bytes.len() < DATE_LEN || !bytes[..DATE_LEN].iter().all(u8::is_ascii_digit) {
            return Err(malformed());
        }
        let date = NaiveDate::from_ymd_opt(
            compact[0..4].parse().map_err(|_| malformed())?,
            compact[4..6].parse().map_err(|_| malformed())?,
            compact[6..8].parse().map_err(|_| malformed())?,
        )
        .ok_or_else(malformed)?;

        let rest = &compact[DATE_LEN..];
        let (rest, is_utc) = match rest.strip_suffix('Z') {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let time = if rest.is_empty() {
            NaiveTime::default()
        } else {
            parse_time(rest).ok_or_else(malformed)?
        };

        let naive = NaiveDateTime::new(date, time);
        if is_utc {
            Ok(Timestamp::Utc(Utc.from_utc_datetime(&naive)))
        } else {
            Ok(Timestamp::Local(naive))
        }
    }

    /// The wall-clock time this timestamp shows on the local calendar.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Timestamp::Local(naive) => *naive,
            Timestamp::Utc(instant) => instant.with_timezone(&Local).naive_local(),
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.naive_local().weekday()
    }

    /// Minutes elapsed since local midnight.
    pub fn minute_of_day(&self) -> u32 {
        let local = self.naive_local();
        local.hour() * 60 + local.minute()
    }

    /// The local clock time as `HH:MM`.
    pub fn clock(&self) -> String {
        let local = self.naive_local();
        format_clock(local.hour(), local.minute())
    }
}

impl FromStr for Timestamp {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Local(naive) => write!(f, "{}", naive.format("%Y%m%dT%H%M%S")),
            Timestamp::Utc(instant) => write!(f, "{}", instant.format("%Y%m%dT%H%M%SZ")),
        }
    }
}

/// Parse `THHMMSS`.
fn parse_time(segment: &str) -> Option<NaiveTime> {
    let digits = segment.strip_prefix('T')?;
    if segment.len() != TIME_LEN || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    NaiveTime::from_hms_opt(
        digits[0..2].parse().ok()?,
        digits[2..4].parse().ok()?,
        digits[4..6].parse().ok()?,
    )
}

/// The Monday at local midnight of the week containing `date`.
///
/// Sunday belongs to the week that started six days earlier.
pub fn start_of_week(date: &Timestamp) -> Timestamp {
    Timestamp::Local(week_start(date.naive_local()))
}

pub(crate) fn week_start(date: NaiveDateTime) -> NaiveDateTime {
    let days_since_monday = date.weekday().num_days_from_monday() as i64;
    NaiveDateTime::new(
        date.date() - Duration::days(days_since_monday),
        NaiveTime::default(),
    )
}

/// Format a clock time as `HH:MM`.
pub fn format_clock(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}
