//! This crate turns a lesson feed in iCalendar form into weekly schedules.
//!
//! The feed is parsed once into [`LessonEvent`]s. From there a week is
//! selected relative to today and projected onto a grid of school days by
//! time slot, and onto a list grouped by day, for a renderer to draw.

pub use ical;

pub mod error;
pub mod event;
pub mod export;
pub mod feed;
pub mod fetch;
pub mod navigation;
pub mod schedule;
pub mod session;
pub mod timestamp;
pub mod week;

pub use error::{ScheduleError, ScheduleResult};
pub use event::LessonEvent;
pub use navigation::{WeekNavigator, WeekView};
