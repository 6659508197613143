//! The lesson event as read from a feed.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::timestamp::Timestamp;

static SUMMARY_SEPARATOR: &str = " - ";

/// Group tokens such as `h2` inside a class label.
static GROUP_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"h\d+").unwrap());

/// One calendar occurrence of a lesson.
///
/// `subject`, `class_label` and `extra_info` are always derived from
/// `summary`; `start` and `end` hold the raw feed tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LessonEvent {
    pub summary: String,
    pub subject: String,
    pub class_label: String,
    pub extra_info: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl LessonEvent {
    /// Store the summary and split it into subject, class and extra info.
    ///
    /// With three or more parts the group tokens are stripped from the class
    /// label. With fewer parts the second part is taken verbatim.
    pub fn set_summary(&mut self, summary: &str) {
        self.summary = summary.trim().to_string();
        let parts: Vec<&str> = self.summary.split(SUMMARY_SEPARATOR).collect();
        self.subject = parts[0].to_string();
        if parts.len() >= 3 {
            self.class_label = GROUP_TOKEN_REGEX
                .replace_all(parts[1], "")
                .trim()
                .to_string();
            self.extra_info = parts[2].to_string();
        } else {
            self.class_label = parts.get(1).map(|part| part.to_string()).unwrap_or_default();
            self.extra_info = String::new();
        }
    }

    /// The decoded start, or `None` when the event cannot be placed in time.
    ///
    /// Malformed tokens are logged and treated like a missing start.
    pub fn start_timestamp(&self) -> Option<Timestamp> {
        decode(self.start.as_deref()?)
    }

    pub fn end_timestamp(&self) -> Option<Timestamp> {
        decode(self.end.as_deref()?)
    }

    /// The composed description under which notes for this lesson are kept.
    pub fn note_key(&self) -> String {
        format!("{} {} {}", self.subject, self.class_label, self.extra_info)
    }
}

fn decode(token: &str) -> Option<Timestamp> {
    match Timestamp::parse(token) {
        Ok(timestamp) => Some(timestamp),
        Err(err) => {
            warn!("skipping lesson with unusable time: {err}");
            None
        }
    }
}
