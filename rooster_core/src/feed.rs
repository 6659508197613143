//! Line-oriented reader turning feed text into lesson events.
//!
//! Only a handful of line kinds are interpreted; everything else is skipped.
//! `DTSTART`/`DTEND` are accepted both as `DTSTART:value` and with
//! parameters, as in `DTSTART;TZID=Europe/Amsterdam:value`.

use log::{debug, info};

use crate::event::LessonEvent;

static BEGIN_EVENT: &str = "BEGIN:VEVENT";
static END_EVENT: &str = "END:VEVENT";
static SUMMARY: &str = "SUMMARY:";
static DTSTART: &str = "DTSTART";
static DTEND: &str = "DTEND";

/// A single feed line, decoded once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    BeginEvent,
    EndEvent,
    Summary(&'a str),
    Start(&'a str),
    End(&'a str),
    Other,
}

impl<'a> LineKind<'a> {
    pub fn decode(line: &'a str) -> Self {
        if line.starts_with(BEGIN_EVENT) {
            LineKind::BeginEvent
        } else if line.starts_with(END_EVENT) {
            LineKind::EndEvent
        } else if let Some(summary) = line.strip_prefix(SUMMARY) {
            LineKind::Summary(summary)
        } else if line.starts_with(DTSTART) {
            property_value(line).map_or(LineKind::Other, LineKind::Start)
        } else if line.starts_with(DTEND) {
            property_value(line).map_or(LineKind::Other, LineKind::End)
        } else {
            LineKind::Other
        }
    }
}

/// The text between the first and second colon of a property line.
fn property_value(line: &str) -> Option<&str> {
    line.split(':').nth(1)
}

/// Reader state: either outside an event or accumulating one.
#[derive(Debug)]
enum State {
    Idle,
    Accumulating(LessonEvent),
}

/// Parse raw feed text into the lesson events it contains, in feed order.
///
/// Never fails: unknown lines are ignored, an event that is never closed is
/// dropped and fields seen outside an event are no-ops.
pub fn parse(raw_text: &str) -> Vec<LessonEvent> {
    let mut events = vec![];
    let mut state = State::Idle;
    for line in raw_text.lines() {
        let line_kind = LineKind::decode(line);
        state = match (state, line_kind) {
            (_, LineKind::BeginEvent) => State::Accumulating(LessonEvent::default()),
            (State::Accumulating(event), LineKind::EndEvent) => {
                events.push(event);
                State::Idle
            }
            (State::Accumulating(mut event), LineKind::Summary(summary)) => {
                event.set_summary(summary);
                State::Accumulating(event)
            }
            (State::Accumulating(mut event), LineKind::Start(start)) => {
                event.start = Some(start.to_string());
                State::Accumulating(event)
            }
            (State::Accumulating(mut event), LineKind::End(end)) => {
                event.end = Some(end.to_string());
                State::Accumulating(event)
            }
            (state, LineKind::Other) => state,
            (State::Idle, line_kind) => {
                debug!("ignoring {line_kind:?} outside of an event");
                State::Idle
            }
        };
    }
    info!("parsed {} lesson events", events.len());
    events
}

#[cfg(test)]
mod tests {
    use crate::{
        event::LessonEvent,
        feed::{parse, LineKind},
    };

    #[test]
    fn test_line_kind() {
        assert_eq!(LineKind::decode("BEGIN:VEVENT"), LineKind::BeginEvent);
        assert_eq!(LineKind::decode("END:VEVENT"), LineKind::EndEvent);
        assert_eq!(
            LineKind::decode("SUMMARY:Frans - 012"),
            LineKind::Summary("Frans - 012")
        );
        assert_eq!(
            LineKind::decode("DTSTART:20240108T091500"),
            LineKind::Start("20240108T091500")
        );
        assert_eq!(
            LineKind::decode("DTSTART;TZID=Europe/Amsterdam:20240108T091500"),
            LineKind::Start("20240108T091500")
        );
        assert_eq!(
            LineKind::decode("DTEND:20240108T094500"),
            LineKind::End("20240108T094500")
        );
        assert_eq!(LineKind::decode("DTSTAMP:20240105T120000Z"), LineKind::Other);
        assert_eq!(LineKind::decode("BEGIN:VCALENDAR"), LineKind::Other);
        assert_eq!(LineKind::decode("DTSTART"), LineKind::Other);
    }

    /// Test whether the fixture feed is parsed correctly.
    #[test]
    fn test_parse() {
        let ics = include_str!("feed/tests/lessons.ics");
        let parsed = parse(ics);
        let expected = vec![
            LessonEvent {
                summary: String::from("Nederlands - h2hv1 - wtr"),
                subject: String::from("Nederlands"),
                class_label: String::from("hv1"),
                extra_info: String::from("wtr"),
                start: Some(String::from("20240108T091500")),
                end: Some(String::from("20240108T094500")),
            },
            LessonEvent {
                summary: String::from("Wiskunde - 109"),
                subject: String::from("Wiskunde"),
                class_label: String::from("109"),
                extra_info: String::new(),
                start: Some(String::from("20240109T100000")),
                end: Some(String::from("20240109T105000")),
            },
            LessonEvent {
                summary: String::from("Studie-uur"),
                subject: String::from("Studie-uur"),
                class_label: String::new(),
                extra_info: String::new(),
                start: Some(String::from("20240110T080000Z")),
                end: Some(String::from("20240110T085000Z")),
            },
            LessonEvent {
                summary: String::from("Engels - h2 - 014"),
                subject: String::from("Engels"),
                class_label: String::new(),
                extra_info: String::from("014"),
                start: None,
                end: None,
            },
        ];
        assert_eq!(parsed, expected)
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_crlf() {
        let ics = "BEGIN:VEVENT\r\nSUMMARY:Frans - 012\r\nDTSTART:20240111T130000\r\nEND:VEVENT\r\n";
        let parsed = parse(ics);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].class_label, "012");
        assert_eq!(parsed[0].start.as_deref(), Some("20240111T130000"));
    }

    #[test]
    fn test_parse_ignores_fields_outside_events() {
        let ics = "SUMMARY:Stray\nDTSTART:20240108T080000\nEND:VEVENT\n\
                   BEGIN:VEVENT\nSUMMARY:Biologie - 201\nEND:VEVENT\n\
                   SUMMARY:After\nEND:VEVENT\n";
        let parsed = parse(ics);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].subject, "Biologie");
    }

    #[test]
    fn test_parse_drops_unterminated_event() {
        let ics = "BEGIN:VEVENT\nSUMMARY:Done - 1\nEND:VEVENT\nBEGIN:VEVENT\nSUMMARY:Open - 2\n";
        let parsed = parse(ics);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].subject, "Done");
    }

    #[test]
    fn test_begin_resets_accumulator() {
        let ics = "BEGIN:VEVENT\nSUMMARY:Lost - 1\nDTSTART:20240108T080000\n\
                   BEGIN:VEVENT\nSUMMARY:Kept - 2\nEND:VEVENT\n";
        let parsed = parse(ics);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].subject, "Kept");
        assert_eq!(parsed[0].start, None);
    }
}
