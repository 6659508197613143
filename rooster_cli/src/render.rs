//! Plain-text drawing of a projected week.

use std::{collections::HashMap, fmt::Write};

use rooster_core::{
    schedule::{ScheduleCell, SchoolDay},
    session::Preferences,
    WeekView,
};

const TIME_WIDTH: usize = 13;
const DAY_WIDTH: usize = 22;

/// Notes per note key; empty when notes are hidden.
pub type Notes = HashMap<String, String>;

/// Heading with the dates the week covers.
pub fn heading(view: &WeekView) -> String {
    let relative = match view.offset {
        0 => String::from("this week"),
        1 => String::from("next week"),
        -1 => String::from("last week"),
        offset if offset > 0 => format!("in {offset} weeks"),
        offset => format!("{} weeks ago", -offset),
    };
    format!(
        "Week {} ({}), {} - {}",
        view.window.iso_week(),
        relative,
        view.window.start.format("%d-%m-%Y"),
        view.window.end.format("%d-%m-%Y"),
    )
}

/// Draw the grid of time slots by school day.
///
/// A compact grid leaves out the rows in which no lesson starts.
pub fn grid(view: &WeekView, notes: &Notes, compact: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<TIME_WIDTH$}", "");
    for day in SchoolDay::ALL {
        let _ = write!(out, "| {:<DAY_WIDTH$}", day.name());
    }
    out.push('\n');
    out.push_str(&"-".repeat(TIME_WIDTH + SchoolDay::ALL.len() * (DAY_WIDTH + 2)));
    out.push('\n');
    for row in &view.grid.rows {
        if compact && row.cells.iter().all(Option::is_none) {
            continue;
        }
        let _ = write!(out, "{:<TIME_WIDTH$}", row.label);
        for cell in &row.cells {
            let text = cell.as_ref().map(cell_text).unwrap_or_default();
            let _ = write!(out, "| {:<DAY_WIDTH$}", fit(&text));
        }
        out.push('\n');
        let row_notes: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                cell.as_ref()
                    .and_then(|cell| notes.get(&cell.note_key))
                    .map(|note| format!("> {note}"))
                    .unwrap_or_default()
            })
            .collect();
        if row_notes.iter().any(|note| !note.is_empty()) {
            let _ = write!(out, "{:<TIME_WIDTH$}", "");
            for note in row_notes {
                let _ = write!(out, "| {:<DAY_WIDTH$}", fit(&note));
            }
            out.push('\n');
        }
    }
    out
}

/// Draw the lessons as a list grouped by day.
pub fn list(view: &WeekView, notes: &Notes) -> String {
    if view.days.is_empty() {
        return String::from("No lessons this week.\n");
    }
    let mut out = String::new();
    for (day, lessons) in &view.days {
        let _ = writeln!(out, "{day}");
        for lesson in lessons {
            let event = &lesson.event;
            let _ = writeln!(
                out,
                "  {}  {} {}  {}",
                lesson.start_clock, event.subject, event.class_label, event.extra_info
            );
            if let Some(note) = notes.get(&event.note_key()) {
                let _ = writeln!(out, "         > {note}");
            }
        }
    }
    out
}

/// Describe the stored preferences.
pub fn preferences(preferences: &Preferences) -> String {
    let on_off = |value: bool| if value { "on" } else { "off" };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "font size:        {} ({}px)",
        preferences.font_size,
        preferences.font_size.base_px()
    );
    let _ = writeln!(
        out,
        "compact view:     {} ({}rem spacing)",
        on_off(preferences.compact_view),
        preferences.spacing_rem()
    );
    let _ = writeln!(
        out,
        "notify deadlines: {}",
        on_off(preferences.notify_deadlines)
    );
    let _ = writeln!(
        out,
        "hours:            {:02}:00 - {:02}:00",
        preferences.start_hour, preferences.end_hour
    );
    out
}

fn cell_text(cell: &ScheduleCell) -> String {
    format!("{} {} {}", cell.subject, cell.class_label, cell.extra_info)
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Cut text to the column width.
fn fit(text: &str) -> String {
    if text.chars().count() <= DAY_WIDTH {
        return text.to_string();
    }
    let mut fitted: String = text.chars().take(DAY_WIDTH - 1).collect();
    fitted.push('~');
    fitted
}
