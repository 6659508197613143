//! Login state, preferences and lesson notes kept in a string key-value store.

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{error::ScheduleResult, schedule::GridConfig};

static KEY_LOGGED_IN: &str = "isLoggedIn";
static KEY_USERNAME: &str = "username";
static KEY_CALENDAR_CODE: &str = "calendarCode";
static KEY_ACCOUNTS: &str = "calendarAccounts";
static KEY_NOTES: &str = "lessonNotes";
static KEY_NOTES_ENABLED: &str = "notesEnabled";
static KEY_LAST_WEEK: &str = "lastWeekSaved";
static KEY_FONT_SIZE: &str = "fontSize";
static KEY_COMPACT_VIEW: &str = "compactView";
static KEY_NOTIFY_DEADLINES: &str = "notifyDeadlines";
static KEY_START_HOUR: &str = "startHour";
static KEY_END_HOUR: &str = "endHour";

/// A get/set/remove store over strings.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> ScheduleResult<()>;
    fn remove(&mut self, key: &str) -> ScheduleResult<()>;
}

/// A store that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> ScheduleResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ScheduleResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// A known user and the feed address that belongs to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    pub ical_code: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            _ => Err(format!("unknown font size '{s}', expected small, medium or large")),
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FontSize {
    fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    /// Base font size in pixels.
    pub fn base_px(&self) -> u32 {
        match self {
            FontSize::Small => 14,
            FontSize::Medium => 16,
            FontSize::Large => 18,
        }
    }
}

/// Display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub font_size: FontSize,
    pub compact_view: bool,
    pub notify_deadlines: bool,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        let grid_config = GridConfig::default();
        Preferences {
            font_size: FontSize::default(),
            compact_view: false,
            notify_deadlines: true,
            start_hour: grid_config.start_hour,
            end_hour: grid_config.end_hour,
        }
    }
}

impl Preferences {
    /// Spacing between elements in rem.
    pub fn spacing_rem(&self) -> f32 {
        if self.compact_view {
            0.5
        } else {
            1.0
        }
    }

    /// The grid for the preferred hours, or the default grid when those
    /// hours do not form a valid range.
    pub fn grid_config(&self) -> GridConfig {
        let default = GridConfig::default();
        GridConfig::new(self.start_hour, self.end_hour, default.slot_minutes).unwrap_or(default)
    }
}

/// The state of one user session on top of a store.
///
/// Created at session start, which also purges notes of a previous week.
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session and clear the notes if `today` lies in another ISO week
    /// than the one last recorded.
    pub fn start(store: S, today: NaiveDate) -> ScheduleResult<Self> {
        let mut session = Session { store };
        let current_week = today.iso_week().week();
        let saved_week: Option<u32> = session.read_json(KEY_LAST_WEEK)?;
        if saved_week != Some(current_week) {
            info!("week rolled over to {current_week}; clearing lesson notes");
            session.store.remove(KEY_NOTES)?;
            session.write_json(KEY_LAST_WEEK, &current_week)?;
        }
        Ok(session)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get(KEY_LOGGED_IN).as_deref() == Some("true")
    }

    pub fn username(&self) -> Option<String> {
        self.store.get(KEY_USERNAME)
    }

    /// The feed address of the logged-in user.
    pub fn calendar_code(&self) -> Option<String> {
        if !self.is_logged_in() {
            return None;
        }
        self.store.get(KEY_CALENDAR_CODE)
    }

    /// Log in as one of the registered accounts.
    ///
    /// Returns `false` when no account has this username.
    pub fn login(&mut self, username: &str) -> ScheduleResult<bool> {
        let username = username.trim();
        let accounts: Vec<Account> = self.read_json(KEY_ACCOUNTS)?.unwrap_or_default();
        let Some(account) = accounts.into_iter().find(|account| account.username == username)
        else {
            return Ok(false);
        };
        self.mark_logged_in(&account.username, &account.ical_code)?;
        Ok(true)
    }

    /// Store a username and feed address directly.
    ///
    /// Both must be non-empty; returns `false` otherwise.
    pub fn save_credentials(&mut self, username: &str, token: &str) -> ScheduleResult<bool> {
        let (username, token) = (username.trim(), token.trim());
        if username.is_empty() || token.is_empty() {
            return Ok(false);
        }
        self.mark_logged_in(username, token)?;
        Ok(true)
    }

    fn mark_logged_in(&mut self, username: &str, calendar_code: &str) -> ScheduleResult<()> {
        self.store.set(KEY_LOGGED_IN, "true")?;
        self.store.set(KEY_USERNAME, username)?;
        self.store.set(KEY_CALENDAR_CODE, calendar_code)?;
        info!("logged in as {username}");
        Ok(())
    }

    pub fn logout(&mut self) -> ScheduleResult<()> {
        self.store.remove(KEY_LOGGED_IN)?;
        self.store.remove(KEY_USERNAME)?;
        self.store.remove(KEY_CALENDAR_CODE)?;
        Ok(())
    }

    pub fn notes_enabled(&self) -> ScheduleResult<bool> {
        Ok(self.read_json(KEY_NOTES_ENABLED)?.unwrap_or(true))
    }

    /// Flip note visibility and return the new state.
    pub fn toggle_notes(&mut self) -> ScheduleResult<bool> {
        let enabled = !self.notes_enabled()?;
        self.write_json(KEY_NOTES_ENABLED, &enabled)?;
        Ok(enabled)
    }

    /// The note for a lesson, empty when there is none.
    pub fn note(&self, note_key: &str) -> ScheduleResult<String> {
        let mut notes = self.notes()?;
        Ok(notes.remove(note_key).unwrap_or_default())
    }

    pub fn save_note(&mut self, note_key: &str, text: &str) -> ScheduleResult<()> {
        let mut notes = self.notes()?;
        notes.insert(note_key.to_string(), text.to_string());
        self.write_json(KEY_NOTES, &notes)
    }

    /// All notes by note key.
    pub fn notes(&self) -> ScheduleResult<HashMap<String, String>> {
        Ok(self.read_json(KEY_NOTES)?.unwrap_or_default())
    }

    /// Preferences, with defaults for anything missing or unreadable.
    pub fn preferences(&self) -> Preferences {
        let default = Preferences::default();
        let hour = |key: &str, fallback: u32| {
            self.store
                .get(key)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(fallback)
        };
        Preferences {
            font_size: self
                .store
                .get(KEY_FONT_SIZE)
                .and_then(|value| value.parse().ok())
                .unwrap_or(default.font_size),
            compact_view: self.store.get(KEY_COMPACT_VIEW).as_deref() == Some("true"),
            notify_deadlines: self.store.get(KEY_NOTIFY_DEADLINES).as_deref() != Some("false"),
            start_hour: hour(KEY_START_HOUR, default.start_hour),
            end_hour: hour(KEY_END_HOUR, default.end_hour),
        }
    }

    pub fn save_preferences(&mut self, preferences: &Preferences) -> ScheduleResult<()> {
        let values = [
            (KEY_FONT_SIZE, preferences.font_size.as_str().to_string()),
            (KEY_COMPACT_VIEW, preferences.compact_view.to_string()),
            (KEY_NOTIFY_DEADLINES, preferences.notify_deadlines.to_string()),
            (KEY_START_HOUR, preferences.start_hour.to_string()),
            (KEY_END_HOUR, preferences.end_hour.to_string()),
        ];
        for (key, value) in values {
            self.store.set(key, &value)?;
        }
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> ScheduleResult<Option<T>> {
        match self.store.get(key) {
            Some(value) => Ok(serde_json::from_str(&value)?),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> ScheduleResult<()> {
        let value = serde_json::to_string(value)?;
        self.store.set(key, &value)
    }
}
