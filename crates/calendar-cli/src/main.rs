//! `calendar` CLI: manage the event store from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Add a one-off event
//! calendar add --title "Dentist" --date 2024-03-14 --time 15:30
//!
//! # Add a weekly event ending with the semester
//! calendar add --title "Standup" --date 2024-01-01 --time 09:30 --repeat weekly --until 2024-06-28
//!
//! # Show a day (stored events plus recurrence echoes)
//! calendar list --date 2024-01-08
//!
//! # Show a month grid
//! calendar month --year 2024 --month 1
//!
//! # Edit or delete the first event stored on a date
//! calendar edit --date 2024-03-14 --index 0 --time 16:00
//! calendar delete --date 2024-01-01 --index 0 --series --yes
//!
//! # Dump the raw stored blob
//! calendar export
//! ```
//!
//! The blob lives in `<data-dir>/<key>.json`. Set `RUST_LOG=debug` to trace
//! store operations on stderr.

use anyhow::{bail, Context, Result};
use calendar_engine::config::DEFAULT_STORAGE_KEY;
use calendar_engine::month::{shift_month, WEEKDAY_HEADERS};
use calendar_engine::{
    display_time, events_for_display, Clock, DateKey, DeleteMode, EventDraft, EventStore,
    FileBackend, MonthView, RecurrenceDraft, RecurrenceKind, SaveTarget, StoreConfig,
    SystemClock,
};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calendar", version, about = "Month-grid calendar event store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the event blob (defaults to the platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage key of the event blob
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_KEY)]
    key: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an event
    Add {
        #[arg(long)]
        title: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Start time as HH:MM (all-day if omitted)
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Repeat: daily, weekly, monthly, yearly, weekdays, weekends
        #[arg(long)]
        repeat: Option<RecurrenceKind>,
        /// Last date of the series (requires --repeat)
        #[arg(long, requires = "repeat")]
        until: Option<String>,
    },
    /// Change a stored event; omitted fields keep their value
    Edit {
        /// Date the event is stored under
        #[arg(long)]
        date: String,
        /// Position in that date's list (as shown by `list`)
        #[arg(long)]
        index: usize,
        #[arg(long)]
        title: Option<String>,
        /// Move the event to another date
        #[arg(long)]
        move_to: Option<String>,
        /// New start time; pass an empty string to make it all-day
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, conflicts_with = "no_repeat")]
        repeat: Option<RecurrenceKind>,
        #[arg(long, conflicts_with = "no_repeat")]
        until: Option<String>,
        /// Stop the event from repeating
        #[arg(long)]
        no_repeat: bool,
    },
    /// List the events on a day, in display order
    List {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show a month grid with event markers
    Month {
        #[arg(long)]
        year: Option<i32>,
        /// 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Shift the shown month by this many months
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
    /// Delete a stored event
    Delete {
        #[arg(long)]
        date: String,
        #[arg(long)]
        index: usize,
        /// Delete every event of the series instead of detaching this one
        #[arg(long)]
        series: bool,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Print the raw stored events as JSON
    Export,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .map(|d| d.join("calendar"))
            .context("No platform data directory; pass --data-dir")?,
    };
    let backend = FileBackend::new(data_dir);
    let path = backend
        .path_for(&cli.key)
        .with_context(|| format!("Cannot use '{}' as a storage key", cli.key))?;
    debug!(path = %path.display(), "using event blob");

    let config = StoreConfig::default().with_storage_key(cli.key);
    let mut store = EventStore::open(backend, config);
    let clock = SystemClock;

    match cli.command {
        Commands::Add {
            title,
            date,
            time,
            description,
            color,
            repeat,
            until,
        } => {
            let draft = EventDraft {
                title,
                date,
                time: time.unwrap_or_default(),
                description: description.unwrap_or_default(),
                color: color.unwrap_or_default(),
                recurrence: repeat.map(|kind| RecurrenceDraft {
                    kind,
                    end_date: until.unwrap_or_default(),
                }),
            };
            let (date, index) = store
                .save_event(SaveTarget::Create, &draft, &clock)
                .context("Failed to save event")?;
            println!("Event saved: {} #{}", date, index);
        }
        Commands::Edit {
            date,
            index,
            title,
            move_to,
            time,
            description,
            color,
            repeat,
            until,
            no_repeat,
        } => {
            let date = parse_date(&date)?;
            let existing = store
                .get(date, index)
                .with_context(|| format!("No event at index {} on {}", index, date))?;

            let mut draft = EventDraft::from_event(date, existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(move_to) = move_to {
                draft.date = move_to;
            }
            if let Some(time) = time {
                draft.time = time;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(color) = color {
                draft.color = color;
            }
            if no_repeat {
                draft.recurrence = None;
            } else if let Some(kind) = repeat {
                let end_date = draft
                    .recurrence
                    .take()
                    .map(|r| r.end_date)
                    .unwrap_or_default();
                draft.recurrence = Some(RecurrenceDraft { kind, end_date });
            }
            if let Some(until) = until {
                let Some(recurrence) = draft.recurrence.as_mut() else {
                    bail!("'{}' does not repeat; pass --repeat with --until", draft.title);
                };
                recurrence.end_date = until;
            }

            let (date, index) = store
                .save_event(SaveTarget::Edit { date, index }, &draft, &clock)
                .context("Failed to save event")?;
            println!("Event saved: {} #{}", date, index);
        }
        Commands::List { date } => {
            let date = match date {
                Some(raw) => parse_date(&raw)?,
                None => DateKey::from(clock.today()),
            };
            print_day(&store, date);
        }
        Commands::Month {
            year,
            month,
            offset,
        } => {
            let today = clock.today();
            let year = year.unwrap_or(today.year());
            let month0 = month.map_or(today.month0(), |m| m - 1);
            let (year, month0) = shift_month(year, month0, offset);
            let view = MonthView::build(year, month0, store.events(), today)
                .context("Failed to build month view")?;
            print_month(&view);
        }
        Commands::Delete {
            date,
            index,
            series,
            yes,
        } => {
            let date = parse_date(&date)?;
            let event = store
                .get(date, index)
                .with_context(|| format!("No event at index {} on {}", index, date))?;

            let prompt = if series && event.is_recurring() {
                format!("Delete every occurrence of '{}'?", event.title)
            } else {
                format!("Are you sure you want to delete '{}'?", event.title)
            };
            if !yes && !confirm(&prompt)? {
                println!("Cancelled");
                return Ok(());
            }

            let mode = if series {
                DeleteMode::Series
            } else {
                DeleteMode::Instance
            };
            store
                .delete(date, index, mode)
                .context("Failed to delete event")?;
            println!("Event deleted");
        }
        Commands::Export => {
            let json = serde_json::to_string_pretty(store.events())?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_date(raw: &str) -> Result<DateKey> {
    raw.parse()
        .with_context(|| format!("Expected a date as YYYY-MM-DD, got '{}'", raw))
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_day(store: &EventStore<FileBackend>, date: DateKey) {
    println!("{} ({})", date, date.weekday());
    let occurrences = events_for_display(date, store.events());
    if occurrences.is_empty() {
        println!("  No events scheduled for this day");
        return;
    }
    for occurrence in &occurrences {
        let event = &occurrence.event;
        let reference = format!("{}#{}", occurrence.anchor(date), occurrence.index);
        print!(
            "  {:>8}  {}  [{}]",
            display_time(event.time),
            event.title,
            reference
        );
        if let Some(rule) = &event.recurrence {
            print!("  (repeats {})", rule.kind);
        }
        println!();
        if let Some(description) = &event.description {
            println!("            {}", description);
        }
    }
}

fn print_month(view: &MonthView) {
    println!("{} {}", view.title, view.year);
    println!(
        "{}",
        WEEKDAY_HEADERS
            .iter()
            .map(|h| format!("{:>4}", h))
            .collect::<String>()
    );

    let mut line = "    ".repeat(view.leading_blanks as usize);
    let mut column = view.leading_blanks;
    for cell in &view.days {
        let marker = match (cell.is_today, cell.event_count > 0) {
            (true, _) => '<',
            (false, true) => '*',
            (false, false) => ' ',
        };
        line.push_str(&format!("{:>3}{}", cell.day, marker));
        column += 1;
        if column == 7 {
            println!("{}", line.trim_end());
            line.clear();
            column = 0;
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }

    let busy: Vec<_> = view.busy_days().collect();
    if !busy.is_empty() {
        println!();
        for cell in busy {
            let noun = if cell.event_count == 1 { "event" } else { "events" };
            println!("  {}: {} {}", cell.date, cell.event_count, noun);
        }
    }
}
