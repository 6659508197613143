//! Projection of a week's lessons onto the desktop grid and the mobile list.

use std::{collections::BTreeMap, fmt};

use chrono::Weekday;
use serde::Serialize;

use crate::{
    error::{ScheduleError, ScheduleResult},
    event::LessonEvent,
    timestamp::{format_clock, Timestamp},
};

const DEFAULT_START_HOUR: u32 = 8;
const DEFAULT_END_HOUR: u32 = 20;
const DEFAULT_SLOT_MINUTES: u32 = 30;

/// The time range shown by the grid and the height of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_minutes: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

impl GridConfig {
    pub fn new(start_hour: u32, end_hour: u32, slot_minutes: u32) -> ScheduleResult<Self> {
        let config = GridConfig {
            start_hour,
            end_hour,
            slot_minutes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        if self.slot_minutes == 0 || 60 % self.slot_minutes != 0 {
            return Err(ScheduleError::InvalidGridConfig(format!(
                "slot length of {} minutes does not divide an hour",
                self.slot_minutes
            )));
        }
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(ScheduleError::InvalidGridConfig(format!(
                "hour range {}-{} is empty or exceeds a day",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    /// Number of rows in the grid; zero for a config that has no valid rows.
    pub fn slot_count(&self) -> usize {
        if self.slot_minutes == 0 {
            return 0;
        }
        self.end_hour
            .saturating_sub(self.start_hour)
            .saturating_mul(60 / self.slot_minutes) as usize
    }
}

/// A weekday shown by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    /// Weekend days have no school day.
    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(SchoolDay::Monday),
            Weekday::Tue => Some(SchoolDay::Tuesday),
            Weekday::Wed => Some(SchoolDay::Wednesday),
            Weekday::Thu => Some(SchoolDay::Thursday),
            Weekday::Fri => Some(SchoolDay::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    /// Column of this day in the grid.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
        }
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The lesson shown in an occupied grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleCell {
    pub subject: String,
    pub class_label: String,
    pub extra_info: String,
    pub start: String,
    pub end: Option<String>,
    pub note_key: String,
}

impl ScheduleCell {
    fn new(event: &LessonEvent, start: &Timestamp) -> Self {
        ScheduleCell {
            subject: event.subject.clone(),
            class_label: event.class_label.clone(),
            extra_info: event.extra_info.clone(),
            start: start.clock(),
            end: event.end_timestamp().map(|end| end.clock()),
            note_key: event.note_key(),
        }
    }
}

/// One time slot across all school days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub label: String,
    /// One entry per [`SchoolDay`], in order.
    pub cells: Vec<Option<ScheduleCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub rows: Vec<GridRow>,
}

impl Grid {
    pub fn cell(&self, day: SchoolDay, row: usize) -> Option<&ScheduleCell> {
        self.rows.get(row)?.cells.get(day.index())?.as_ref()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.iter().all(Option::is_none))
    }
}

/// Place events onto the grid of school days by time slot.
///
/// A cell holds the first event, in input order, that starts within its slot
/// on its day. Later events starting in the same slot are not shown.
pub fn project_grid<'a, I>(events: I, config: &GridConfig) -> ScheduleResult<Grid>
where
    I: IntoIterator<Item = &'a LessonEvent>,
{
    config.validate()?;
    let placed = schedulable(events);
    let rows = (0..config.slot_count() as u32)
        .map(|slot| {
            let start_minutes = config.start_hour * 60 + slot * config.slot_minutes;
            let end_minutes = start_minutes + config.slot_minutes;
            let cells = SchoolDay::ALL
                .iter()
                .map(|day| {
                    placed
                        .iter()
                        .find(|(_, start)| {
                            let minute = start.minute_of_day();
                            minute >= start_minutes
                                && minute < end_minutes
                                && SchoolDay::from_weekday(start.weekday()) == Some(*day)
                        })
                        .map(|(event, start)| ScheduleCell::new(event, start))
                })
                .collect();
            GridRow {
                start_minutes,
                end_minutes,
                label: format!(
                    "{} - {}",
                    format_clock(start_minutes / 60, start_minutes % 60),
                    format_clock(end_minutes / 60, end_minutes % 60)
                ),
                cells,
            }
        })
        .collect();
    Ok(Grid { rows })
}

/// A lesson in the day-grouped list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MobileLesson {
    #[serde(flatten)]
    pub event: LessonEvent,
    pub start_clock: String,
}

/// Group events by school day, each day sorted by start time.
///
/// Weekend lessons are left out and days without lessons are absent.
pub fn project_mobile_list<'a, I>(events: I) -> BTreeMap<SchoolDay, Vec<MobileLesson>>
where
    I: IntoIterator<Item = &'a LessonEvent>,
{
    let mut days: BTreeMap<SchoolDay, Vec<(Timestamp, &LessonEvent)>> = BTreeMap::new();
    for (event, start) in schedulable(events) {
        if let Some(day) = SchoolDay::from_weekday(start.weekday()) {
            days.entry(day).or_default().push((start, event));
        }
    }
    days.into_iter()
        .map(|(day, mut lessons)| {
            lessons.sort_by_key(|(start, _)| start.naive_local());
            let lessons = lessons
                .into_iter()
                .map(|(start, event)| MobileLesson {
                    event: event.clone(),
                    start_clock: start.clock(),
                })
                .collect();
            (day, lessons)
        })
        .collect()
}

/// Pair every event with its decoded start, dropping those without one.
fn schedulable<'a, I>(events: I) -> Vec<(&'a LessonEvent, Timestamp)>
where
    I: IntoIterator<Item = &'a LessonEvent>,
{
    events
        .into_iter()
        .filter_map(|event| event.start_timestamp().map(|start| (event, start)))
        .collect()
}
