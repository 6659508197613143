//! Export of a single week as an iCalendar file.

use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, Property},
    ical_property,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{event::LessonEvent, week::WeekWindow};

static PROD_ID: [&str; 2] = ["Rooster", "Week"];

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Build a calendar holding the lessons that start inside `window`.
///
/// Start and end are copied verbatim from the feed so that local and UTC
/// times survive the export unchanged.
pub fn week_calendar<'a, I>(events: I, window: &WeekWindow) -> IcalCalendar
where
    I: IntoIterator<Item = &'a LessonEvent>,
{
    let changed = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(prod_id(window))
        .build();
    for event in events {
        let Some(start) = event.start_timestamp() else {
            continue;
        };
        if window.contains(start.naive_local()) {
            calendar.events.push(lesson_event(event, &changed));
        }
    }
    calendar
}

fn lesson_event(event: &LessonEvent, changed: &str) -> IcalEvent {
    let mut ical_event = IcalEvent::new();
    let mut properties: Vec<Property> = vec![
        ical_property!("UID", uid(event)),
        ical_property!("DTSTAMP", changed),
        ical_property!("SUMMARY", event.summary.as_str()),
    ];
    if let Some(start) = &event.start {
        properties.push(ical_property!("DTSTART", start.as_str()));
    }
    if let Some(end) = &event.end {
        properties.push(ical_property!("DTEND", end.as_str()));
    }
    if !event.extra_info.is_empty() {
        properties.push(ical_property!("LOCATION", event.extra_info.as_str()));
    }
    ical_event.properties = properties;
    ical_event
}

fn prod_id(window: &WeekWindow) -> String {
    let mut strings: Vec<String> = Vec::from(PROD_ID).into_iter().map(String::from).collect();
    strings.push(window.iso_week().to_string());
    strings.insert(0, String::from("-"));
    strings.join("//")
}

/// A stable id for one lesson occurrence.
///
/// Changing this function is a breaking change!
fn uid(event: &LessonEvent) -> String {
    let subject = WHITESPACE_REGEX.replace_all(&event.subject, "-");
    let class_label = WHITESPACE_REGEX.replace_all(&event.class_label, "-");
    let start = event.start.as_deref().unwrap_or_default();
    format!("Rooster_{subject}_{class_label}_{start}@rooster")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ical::generator::{Emitter, IcalCalendar, IcalEvent};

    use crate::{export::week_calendar, feed::parse, week::WeekWindow};

    fn window() -> WeekWindow {
        WeekWindow::relative_to(
            NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            0,
        )
        .unwrap()
    }

    fn property_value<'a>(event: &'a IcalEvent, name: &str) -> Option<&'a str> {
        event
            .properties
            .iter()
            .find(|property| property.name == name)
            .and_then(|property| property.value.as_deref())
    }

    fn calendar() -> IcalCalendar {
        let ics = include_str!("feed/tests/lessons.ics");
        let events = parse(ics);
        week_calendar(&events, &window())
    }

    #[test]
    fn test_week_calendar() {
        let calendar = calendar();
        // the lesson without a start is left out
        assert_eq!(calendar.events.len(), 3);
        let first = &calendar.events[0];
        assert_eq!(property_value(first, "SUMMARY"), Some("Nederlands - h2hv1 - wtr"));
        assert_eq!(property_value(first, "DTSTART"), Some("20240108T091500"));
        assert_eq!(property_value(first, "DTEND"), Some("20240108T094500"));
        assert_eq!(property_value(first, "LOCATION"), Some("wtr"));
        assert_eq!(
            property_value(first, "UID"),
            Some("Rooster_Nederlands_hv1_20240108T091500@rooster")
        );
        assert_eq!(property_value(&calendar.events[1], "LOCATION"), None);
    }

    #[test]
    fn test_other_week_is_empty() {
        let events = parse(include_str!("feed/tests/lessons.ics"));
        let next_week = WeekWindow {
            start: window().start + chrono::Duration::days(7),
            end: window().end + chrono::Duration::days(7),
        };
        let calendar = week_calendar(&events, &next_week);
        assert!(calendar.events.is_empty());
    }

    #[test]
    fn test_generate() {
        let generated = calendar().generate();
        assert!(generated.contains("BEGIN:VCALENDAR"));
        assert!(generated.contains("PRODID:-//Rooster//Week//2"));
        assert!(generated.contains("SUMMARY:Wiskunde - 109"));
    }
}
