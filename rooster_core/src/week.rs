//! Selection of the lessons that start inside a given week.

use chrono::{Datelike, Days, NaiveDateTime};
use serde::Serialize;

use crate::{
    error::{ScheduleError, ScheduleResult},
    event::LessonEvent,
    timestamp::week_start,
};

/// A week, from Monday at local midnight up to and including `end`.
///
/// `end` lies exactly six days after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WeekWindow {
    /// The window `week_offset` weeks away from the week containing `now`.
    ///
    /// Fails with `InvalidWeekOffset` when the window would lie outside the
    /// representable calendar.
    pub fn relative_to(now: NaiveDateTime, week_offset: i64) -> ScheduleResult<Self> {
        let out_of_range = || ScheduleError::InvalidWeekOffset(week_offset);
        let days = week_offset.checked_mul(7).ok_or_else(out_of_range)?;
        let monday = week_start(now);
        let start = if days >= 0 {
            monday.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            monday.checked_sub_days(Days::new(days.unsigned_abs()))
        }
        .ok_or_else(out_of_range)?;
        let end = start
            .checked_add_days(Days::new(6))
            .ok_or_else(out_of_range)?;
        Ok(WeekWindow { start, end })
    }

    /// Whether `moment` lies in `[start, end]`.
    pub fn contains(&self, moment: NaiveDateTime) -> bool {
        self.start <= moment && moment <= self.end
    }

    /// The ISO week number of this window.
    pub fn iso_week(&self) -> u32 {
        self.start.iso_week().week()
    }
}

/// Keep the events whose start lies in the window `week_offset` weeks away
/// from the week containing `now`.
///
/// Events without a usable start are dropped. Input order is preserved.
pub fn filter_by_week(
    events: &[LessonEvent],
    week_offset: i64,
    now: NaiveDateTime,
) -> ScheduleResult<Vec<&LessonEvent>> {
    let window = WeekWindow::relative_to(now, week_offset)?;
    Ok(filter_by_window(events, &window))
}

/// Keep the events whose start lies in `window`.
pub fn filter_by_window<'a>(
    events: &'a [LessonEvent],
    window: &WeekWindow,
) -> Vec<&'a LessonEvent> {
    events
        .iter()
        .filter(|event| {
            event
                .start_timestamp()
                .is_some_and(|start| window.contains(start.naive_local()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use crate::{
        error::ScheduleError,
        event::LessonEvent,
        week::{filter_by_week, WeekWindow},
    };

    fn now() -> NaiveDateTime {
        // a Wednesday
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(11, 30, 0)
            .unwrap()
    }

    fn lesson(subject: &str, start: NaiveDateTime) -> LessonEvent {
        LessonEvent {
            summary: subject.to_string(),
            subject: subject.to_string(),
            start: Some(start.format("%Y%m%dT%H%M%S").to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_window() {
        let window = WeekWindow::relative_to(now(), 0).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(window.start, monday);
        assert_eq!(window.end, monday + Duration::days(6));
        assert_eq!(window.iso_week(), 2);

        let previous = WeekWindow::relative_to(now(), -1).unwrap();
        assert_eq!(previous.start, monday - Duration::days(7));
    }

    #[test]
    fn test_lower_boundary_inclusive() {
        let window = WeekWindow::relative_to(now(), 0).unwrap();
        let events = vec![
            lesson("on", window.start),
            lesson("before", window.start - Duration::seconds(1)),
        ];
        let filtered = filter_by_week(&events, 0, now()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].subject, "on");
    }

    #[test]
    fn test_upper_boundary_inclusive() {
        let window = WeekWindow::relative_to(now(), 0).unwrap();
        let events = vec![
            lesson("on", window.end),
            lesson("after", window.end + Duration::seconds(1)),
        ];
        let filtered = filter_by_week(&events, 0, now()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].subject, "on");
    }

    #[test]
    fn test_offset_shifts_by_seven_days() {
        let window = WeekWindow::relative_to(now(), 0).unwrap();
        let events = vec![
            lesson("this", window.start + Duration::hours(9)),
            lesson("next", window.start + Duration::days(7) + Duration::hours(9)),
            lesson("last", window.start - Duration::days(7) + Duration::hours(9)),
        ];
        let subjects = |offset| {
            filter_by_week(&events, offset, now())
                .unwrap()
                .into_iter()
                .map(|event| event.subject.clone())
                .collect::<Vec<String>>()
        };
        assert_eq!(subjects(0), vec!["this"]);
        assert_eq!(subjects(1), vec!["next"]);
        assert_eq!(subjects(-1), vec!["last"]);
        assert!(subjects(2).is_empty());
    }

    #[test]
    fn test_unschedulable_events_dropped() {
        let window = WeekWindow::relative_to(now(), 0).unwrap();
        let mut malformed = lesson("malformed", window.start);
        malformed.start = Some(String::from("2024-01-08"));
        let missing = LessonEvent {
            subject: String::from("missing"),
            ..Default::default()
        };
        let events = vec![malformed, missing, lesson("ok", window.start + Duration::hours(8))];
        let filtered = filter_by_week(&events, 0, now()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].subject, "ok");
    }

    #[test]
    fn test_offset_beyond_calendar() {
        for offset in [100_000_000, -100_000_000, i64::MAX, i64::MIN] {
            assert!(matches!(
                WeekWindow::relative_to(now(), offset),
                Err(ScheduleError::InvalidWeekOffset(o)) if o == offset
            ));
        }
        let events = vec![lesson("this", now())];
        assert!(filter_by_week(&events, i64::MAX, now()).is_err());
        // far but representable
        let window = WeekWindow::relative_to(now(), 10_000).unwrap();
        assert_eq!(window.end - window.start, Duration::days(6));
    }
}
