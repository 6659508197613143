//! Week-by-week navigation over a feed that is parsed once.

use std::{collections::BTreeMap, fmt};

use chrono::{Local, NaiveDateTime};
use log::{info, warn};
use serde::Serialize;

use crate::{
    error::ScheduleResult,
    event::LessonEvent,
    feed,
    fetch::{fetch_feed, FeedSource},
    schedule::{project_grid, project_mobile_list, Grid, GridConfig, MobileLesson, SchoolDay},
    week::{filter_by_window, WeekWindow},
};

/// Everything a renderer needs to draw one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub offset: i64,
    pub window: WeekWindow,
    pub grid: Grid,
    pub days: BTreeMap<SchoolDay, Vec<MobileLesson>>,
}

/// Project the lessons of the week `offset` weeks away from `now`.
pub fn project_week(
    events: &[LessonEvent],
    offset: i64,
    now: NaiveDateTime,
    config: &GridConfig,
) -> ScheduleResult<WeekView> {
    let window = WeekWindow::relative_to(now, offset)?;
    let filtered = filter_by_window(events, &window);
    Ok(WeekView {
        offset,
        window,
        grid: project_grid(filtered.iter().copied(), config)?,
        days: project_mobile_list(filtered.iter().copied()),
    })
}

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Holds the loaded lessons and the week currently looked at.
///
/// The offset starts at zero for every navigator and is never persisted.
/// Moving between weeks only filters and projects again; the feed is not
/// fetched anew.
pub struct WeekNavigator {
    events: Option<Vec<LessonEvent>>,
    offset: i64,
    config: GridConfig,
    clock: Clock,
}

impl fmt::Debug for WeekNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeekNavigator")
            .field("events", &self.events.as_ref().map(Vec::len))
            .field("offset", &self.offset)
            .field("config", &self.config)
            .finish()
    }
}

impl WeekNavigator {
    pub fn new(config: GridConfig) -> Self {
        WeekNavigator::with_clock(config, || Local::now().naive_local())
    }

    /// A navigator that reads the current time from `clock`.
    pub fn with_clock<C>(config: GridConfig, clock: C) -> Self
    where
        C: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        WeekNavigator {
            events: None,
            offset: 0,
            config,
            clock: Box::new(clock),
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn is_loaded(&self) -> bool {
        self.events.is_some()
    }

    pub fn events(&self) -> &[LessonEvent] {
        self.events.as_deref().unwrap_or_default()
    }

    /// Replace the loaded lessons with those in `raw_text`.
    pub fn load(&mut self, raw_text: &str) {
        self.events = Some(feed::parse(raw_text));
    }

    /// Fetch and load a feed.
    ///
    /// On failure the previously loaded lessons stay in place.
    pub async fn refresh(&mut self, source: &FeedSource) -> ScheduleResult<()> {
        match fetch_feed(source).await {
            Ok(raw_text) => {
                self.load(&raw_text);
                Ok(())
            }
            Err(err) => {
                warn!("keeping the previous schedule: {err}");
                Err(err)
            }
        }
    }

    /// The view of the current week offset, if a feed is loaded.
    pub fn current(&self) -> Option<ScheduleResult<WeekView>> {
        let events = self.events.as_deref()?;
        Some(project_week(events, self.offset, (self.clock)(), &self.config))
    }

    /// Move one week forward.
    pub fn advance(&mut self) -> Option<ScheduleResult<WeekView>> {
        self.navigate(self.offset.saturating_add(1))
    }

    /// Move one week back.
    pub fn retreat(&mut self) -> Option<ScheduleResult<WeekView>> {
        self.navigate(self.offset.saturating_sub(1))
    }

    /// Go back to the current week.
    pub fn reset(&mut self) -> Option<ScheduleResult<WeekView>> {
        self.navigate(0)
    }

    /// Go to the week `offset` weeks away from the current one.
    pub fn jump(&mut self, offset: i64) -> Option<ScheduleResult<WeekView>> {
        self.navigate(offset)
    }

    /// Project the week at `offset` and keep it only if that succeeds.
    fn navigate(&mut self, offset: i64) -> Option<ScheduleResult<WeekView>> {
        let events = self.events.as_deref()?;
        let view = project_week(events, offset, (self.clock)(), &self.config);
        match &view {
            Ok(_) => {
                self.offset = offset;
                info!("showing week offset {offset}");
            }
            Err(err) => warn!("staying at week offset {}: {err}", self.offset),
        }
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::{
        error::ScheduleError,
        fetch::FeedSource,
        navigation::WeekNavigator,
        schedule::{GridConfig, SchoolDay},
    };

    static FEED: &str = "BEGIN:VCALENDAR\n\
        BEGIN:VEVENT\nSUMMARY:Nederlands - h2hv1 - wtr\nDTSTART:20240108T091500\nEND:VEVENT\n\
        BEGIN:VEVENT\nSUMMARY:Wiskunde - 109\nDTSTART:20240116T100000\nEND:VEVENT\n\
        BEGIN:VEVENT\nSUMMARY:Frans - h1 - 012\nDTSTART:20240105T130000\nEND:VEVENT\n\
        END:VCALENDAR\n";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn navigator() -> WeekNavigator {
        WeekNavigator::with_clock(GridConfig::default(), now)
    }

    fn subjects(navigator: &WeekNavigator) -> Vec<String> {
        let view = navigator.current().unwrap().unwrap();
        view.days
            .values()
            .flatten()
            .map(|lesson| lesson.event.subject.clone())
            .collect()
    }

    #[test]
    fn test_navigation_without_feed_is_noop() {
        let mut navigator = navigator();
        assert!(navigator.current().is_none());
        assert!(navigator.advance().is_none());
        assert!(navigator.retreat().is_none());
        assert_eq!(navigator.offset(), 0);
        assert!(navigator.events().is_empty());
    }

    #[test]
    fn test_advance_and_retreat() {
        let mut navigator = navigator();
        navigator.load(FEED);
        assert_eq!(navigator.events().len(), 3);
        assert_eq!(subjects(&navigator), vec!["Nederlands"]);

        let view = navigator.advance().unwrap().unwrap();
        assert_eq!(view.offset, 1);
        assert!(view.grid.cell(SchoolDay::Tuesday, 4).is_some());
        assert_eq!(subjects(&navigator), vec!["Wiskunde"]);

        navigator.retreat().unwrap().unwrap();
        navigator.retreat().unwrap().unwrap();
        assert_eq!(navigator.offset(), -1);
        assert_eq!(subjects(&navigator), vec!["Frans"]);

        let view = navigator.jump(2).unwrap().unwrap();
        assert_eq!(view.offset, 2);
        assert!(view.grid.is_empty());

        let view = navigator.reset().unwrap().unwrap();
        assert_eq!(view.offset, 0);
        assert_eq!(view.window.start.date(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_reload_keeps_offset() {
        let mut navigator = navigator();
        navigator.load(FEED);
        navigator.advance();
        navigator.load("");
        assert_eq!(navigator.offset(), 1);
        let view = navigator.current().unwrap().unwrap();
        assert!(view.grid.is_empty());
        assert!(view.days.is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_schedule() {
        let mut navigator = navigator();
        navigator.load(FEED);
        let before = navigator.current().unwrap().unwrap();
        let result = navigator
            .refresh(&FeedSource::Direct(String::from("not a url")))
            .await;
        assert!(matches!(result, Err(ScheduleError::TransportFailure(_))));
        assert_eq!(navigator.events().len(), 3);
        assert_eq!(navigator.current().unwrap().unwrap(), before);
    }

    #[test]
    fn test_offset_beyond_calendar_keeps_position() {
        let mut navigator = navigator();
        navigator.load(FEED);
        navigator.advance().unwrap().unwrap();
        assert!(matches!(
            navigator.jump(100_000_000),
            Some(Err(ScheduleError::InvalidWeekOffset(100_000_000)))
        ));
        assert!(navigator.jump(i64::MIN).unwrap().is_err());
        assert_eq!(navigator.offset(), 1);
        assert_eq!(subjects(&navigator), vec!["Wiskunde"]);
        assert_eq!(navigator.advance().unwrap().unwrap().offset, 2);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = GridConfig {
            start_hour: 10,
            end_hour: 9,
            slot_minutes: 30,
        };
        let mut navigator = WeekNavigator::with_clock(config, now);
        navigator.load(FEED);
        assert!(navigator.current().unwrap().is_err());
    }
}
