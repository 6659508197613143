//! Terminal front-end for viewing a lesson feed week by week.

mod render;
mod store;

use std::{
    env::current_dir,
    fs::{read_to_string, write},
    io::{stdin, BufRead},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use rooster_core::{
    export::week_calendar,
    fetch::FeedSource,
    ical::generator::Emitter,
    schedule::GridConfig,
    session::{FontSize, KeyValueStore, Session},
    WeekNavigator, WeekView,
};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::{render::Notes, store::JsonFileStore};

#[derive(Debug, Parser)]
#[command()]
pub struct Arguments {
    /// the file holding login state, notes and preferences
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
    /// the log level
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: LevelFilter,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// the feed URL or a path to an .ics file; defaults to the stored calendar
    pub source: Option<String>,
    /// fetch the feed through this pass-through proxy
    #[arg(long)]
    pub proxy: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// print the schedule of a week
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// the week relative to this one
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        week: i64,
        /// print a list grouped by day instead of the grid
        #[arg(long)]
        mobile: bool,
    },
    /// page through the weeks interactively
    Browse {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// write the lessons of a week to week.ics
    Export {
        #[command(flatten)]
        source: SourceArgs,
        /// the week relative to this one
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        week: i64,
    },
    /// log in with a registered username, or with a username and feed URL
    Login {
        /// the username
        username: String,
        /// the feed URL
        token: Option<String>,
    },
    /// forget the logged-in user
    Logout,
    /// attach a note to a lesson
    Note {
        /// the lesson as shown in the grid, e.g. "Nederlands hv1 wtr"
        key: String,
        /// the note text
        text: String,
    },
    /// show or hide notes
    ToggleNotes,
    /// show the display preferences, changing those given
    Settings {
        /// small, medium or large
        #[arg(long)]
        font_size: Option<FontSize>,
        /// leave out empty time slots
        #[arg(long)]
        compact: Option<bool>,
        #[arg(long)]
        notify_deadlines: Option<bool>,
        /// first hour shown in the grid
        #[arg(long)]
        start_hour: Option<u32>,
        /// hour at which the grid ends
        #[arg(long)]
        end_hour: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    TermLogger::init(
        args.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    let store_path = args.store.unwrap_or_else(JsonFileStore::default_path);
    let store = JsonFileStore::open(&store_path)?;
    let mut session = Session::start(store, Local::now().date_naive())?;
    run(args.command, &mut session).await
}

async fn run(command: Command, session: &mut Session<JsonFileStore>) -> Result<()> {
    match command {
        Command::Show {
            source,
            week,
            mobile,
        } => {
            let mut navigator = load(&source, session).await?;
            let view = navigator
                .jump(week)
                .ok_or_else(|| anyhow!("no feed loaded"))??;
            let layout = if mobile {
                Layout::List
            } else {
                Layout::Grid {
                    compact: session.preferences().compact_view,
                }
            };
            print_view(&view, layout, &notes(session)?);
        }
        Command::Browse { source } => {
            let navigator = load(&source, session).await?;
            let layout = Layout::Grid {
                compact: session.preferences().compact_view,
            };
            browse(navigator, layout, &notes(session)?)?;
        }
        Command::Export { source, week } => {
            let mut navigator = load(&source, session).await?;
            let view = navigator
                .jump(week)
                .ok_or_else(|| anyhow!("no feed loaded"))??;
            let calendar = week_calendar(navigator.events(), &view.window);
            let mut path = current_dir()?;
            path.push("week.ics");
            write(&path, calendar.generate())?;
            println!("wrote {} lessons to {}", calendar.events.len(), path.display());
        }
        Command::Login { username, token } => {
            let logged_in = match token {
                Some(token) => session.save_credentials(&username, &token)?,
                None => session.login(&username)?,
            };
            if !logged_in {
                bail!("invalid code");
            }
            println!("logged in as {}", username.trim());
        }
        Command::Logout => session.logout()?,
        Command::Note { key, text } => session.save_note(&key, &text)?,
        Command::ToggleNotes => {
            let enabled = session.toggle_notes()?;
            println!("notes {}", if enabled { "shown" } else { "hidden" });
        }
        Command::Settings {
            font_size,
            compact,
            notify_deadlines,
            start_hour,
            end_hour,
        } => {
            let mut preferences = session.preferences();
            let changed = font_size.is_some()
                || compact.is_some()
                || notify_deadlines.is_some()
                || start_hour.is_some()
                || end_hour.is_some();
            preferences.font_size = font_size.unwrap_or(preferences.font_size);
            preferences.compact_view = compact.unwrap_or(preferences.compact_view);
            preferences.notify_deadlines =
                notify_deadlines.unwrap_or(preferences.notify_deadlines);
            preferences.start_hour = start_hour.unwrap_or(preferences.start_hour);
            preferences.end_hour = end_hour.unwrap_or(preferences.end_hour);
            if changed {
                GridConfig::new(
                    preferences.start_hour,
                    preferences.end_hour,
                    GridConfig::default().slot_minutes,
                )?;
                session.save_preferences(&preferences)?;
            }
            print!("{}", render::preferences(&preferences));
        }
    }
    Ok(())
}

/// Build a navigator holding the feed named by `source_args`.
async fn load(
    source_args: &SourceArgs,
    session: &Session<JsonFileStore>,
) -> Result<WeekNavigator> {
    let mut navigator = WeekNavigator::new(session.preferences().grid_config());
    let source = match &source_args.source {
        Some(source) => source.clone(),
        None => session
            .calendar_code()
            .ok_or_else(|| anyhow!("not logged in; pass a feed or run `login` first"))?,
    };
    if Path::new(&source).is_file() {
        navigator.load(&read_to_string(&source)?);
        return Ok(navigator);
    }
    let feed_source = match &source_args.proxy {
        Some(proxy) => FeedSource::Proxied {
            proxy: proxy.clone(),
            url: source,
        },
        None => FeedSource::Direct(source),
    };
    navigator.refresh(&feed_source).await?;
    Ok(navigator)
}

fn notes<S: KeyValueStore>(session: &Session<S>) -> Result<Notes> {
    if !session.notes_enabled()? {
        return Ok(Notes::new());
    }
    let mut notes = session.notes()?;
    notes.retain(|_, note| !note.is_empty());
    Ok(notes)
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    Grid { compact: bool },
    List,
}

fn print_view(view: &WeekView, layout: Layout, notes: &Notes) {
    println!("{}", render::heading(view));
    match layout {
        Layout::Grid { compact } => print!("{}", render::grid(view, notes, compact)),
        Layout::List => print!("{}", render::list(view, notes)),
    }
}

/// Read `n`, `p`, `t` or `q` from stdin and redraw after each.
fn browse(mut navigator: WeekNavigator, layout: Layout, notes: &Notes) -> Result<()> {
    if let Some(view) = navigator.current() {
        print_view(&view?, layout, notes);
    }
    println!("[n]ext, [p]revious, [t]his week, [q]uit");
    for line in stdin().lock().lines() {
        let view = match line?.trim() {
            "n" | "next" => navigator.advance(),
            "p" | "prev" | "previous" => navigator.retreat(),
            "t" | "today" => navigator.reset(),
            "q" | "quit" => break,
            other => {
                println!("unknown command '{other}'");
                continue;
            }
        };
        match view {
            Some(Ok(view)) => print_view(&view, layout, notes),
            Some(Err(err)) => println!("{err}"),
            None => {}
        }
    }
    Ok(())
}
