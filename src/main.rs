/*!
# MoodFlow - A Tiny Mood Journal

This file contains the binary entry point: it installs logging, loads the
configuration, opens the mood log in the data directory and runs one command
against the application state.

## Usage

```
moodflow [OPTIONS] <COMMAND>

Commands:
  today   Show today's mood and note
  log     Log a mood for today, keeping today's note
  note    Replace today's note (saved once today has a mood)
  edit    Edit the entry of a past day or today
  delete  Delete the entry of a day
  show    Print the entry of a day (today by default)
  stats   Show how often each mood was logged
  month   Show a month calendar with logged moods
  year    Show the year heatmap
  moods   List the moods you can log
  remind  Schedule the daily reminder
  share   Write the share card for today

Options:
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
      --log-level <LOG_LEVEL>    Log level when RUST_LOG is not set [default: info]
```

## Configuration

- `MOODFLOW_DIR`: The directory holding the mood log (defaults to "~/Documents/moodflow")
- `MOODFLOW_REMINDER`: Daily reminder time as HH:MM (defaults to "20:00")
- `MOODFLOW_HEATMAP_COLUMNS`: Days per heatmap row (defaults to 20)
*/

use chrono::{Datelike, NaiveDate};
use moodflow::app::MoodApp;
use moodflow::cli::{CliArgs, Commands};
use moodflow::constants::{DEFAULT_SHARE_FILE_NAME, LOG_FORMAT_JSON, TRACING_SERVICE_NAME};
use moodflow::date_key::{Clock, DateKey, SystemClock};
use moodflow::errors::{AppError, AppResult};
use moodflow::log_store::LogStore;
use moodflow::services::{StoredReminderScheduler, SvgFileExporter, TracingHaptics};
use moodflow::storage::{FileStore, KeyValueStore};
use moodflow::{mood, render, Config};
use std::process::ExitCode;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

fn init_tracing(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.effective_log_level()));
    let registry = tracing_subscriber::registry().with(filter);
    if args.log_format == LOG_FORMAT_JSON {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// The main entry point for the moodflow binary.
///
/// Failures already shown to the user as notices are not printed a second
/// time; anything else is reported as `Error: ...` on stderr. Either way the
/// process exits with a failure status.
fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    let correlation_id = Uuid::new_v4();
    let span = info_span!(
        "app_invocation",
        service = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = span.enter();
    debug!("CLI arguments: {:?}", args);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs one command; `Ok(false)` means it failed and a notice said so.
fn run(args: &CliArgs) -> AppResult<bool> {
    info!("Loading configuration");
    let config = Config::load()?;
    debug!("Configuration: {:?}", config);

    let backend = FileStore::open(&config.data_dir)?;
    let store = LogStore::load(backend);
    let mut app = MoodApp::new(store, SystemClock)
        .with_haptics(Box::new(TracingHaptics))
        .with_heatmap_columns(config.heatmap_columns);

    let result = dispatch(&mut app, &config, &args.command);

    let mut reported_failure = false;
    for notice in app.take_notices() {
        if notice.is_failure() {
            reported_failure = true;
            eprintln!("{}", notice);
        } else {
            println!("{}", notice);
        }
    }

    match result {
        Ok(()) => Ok(true),
        Err(e) if reported_failure => {
            debug!("Command failed after notice: {}", e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn parse_month(raw: &str) -> AppResult<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| AppError::Date(format!("Invalid month '{}', expected YYYY-MM", raw)))?;
    Ok((first.year(), first.month()))
}

fn dispatch<S: KeyValueStore, C: Clock>(
    app: &mut MoodApp<S, C>,
    config: &Config,
    command: &Commands,
) -> AppResult<()> {
    match command {
        Commands::Today => {
            print!("{}", render::today(app.today_key(), app.today()));
        }
        Commands::Log { mood, note } => {
            let mood = mood::parse(mood)?;
            app.select_mood(mood)?;
            if let Some(note) = note {
                app.edit_today_note(note)?;
            }
            print!("{}", render::today(app.today_key(), app.today()));
        }
        Commands::Note { text } => {
            app.edit_today_note(text)?;
            print!("{}", render::today(app.today_key(), app.today()));
            if app.today().mood_id.is_none() {
                println!("Choose a mood with `moodflow log <MOOD>` to save this note.");
            }
        }
        Commands::Edit { date, mood, note } => {
            let key = DateKey::parse_user_input(date)?;
            let mood = mood.as_deref().map(mood::parse).transpose()?;
            app.press_day(key)?;
            if let Some(mood) = mood {
                app.edit_select_mood(mood)?;
            }
            if let Some(note) = note {
                app.edit_set_note(note)?;
            }
            app.save_edit()?;
            print!("{}", render::entry(key, app.store().get(key)));
        }
        Commands::Delete { date } => {
            let key = DateKey::parse_user_input(date)?;
            let logged = app.store().get(key).is_some();
            app.press_day(key)?;
            app.delete_edit()?;
            if logged {
                println!("Deleted {}", key);
            } else {
                print!("{}", render::entry(key, None));
            }
        }
        Commands::Show { date } => {
            let key = match date {
                Some(raw) => DateKey::parse_user_input(raw)?,
                None => app.today_key(),
            };
            print!("{}", render::entry(key, app.store().get(key)));
        }
        Commands::Stats => {
            print!("{}", render::stats(app.stats()));
        }
        Commands::Month { month, focus } => {
            let (year, month) = match month {
                Some(raw) => parse_month(raw)?,
                None => {
                    let today = app.today_key().date();
                    (today.year(), today.month())
                }
            };
            let focus = focus
                .as_deref()
                .map(DateKey::parse_user_input)
                .transpose()?;
            app.set_focus(focus);
            print!("{}", render::month(year, month, app.marks())?);
        }
        Commands::Year { year } => {
            if let Some(year) = year {
                let shown = app.show_year(*year);
                if shown != *year {
                    info!("Year {} is in the future, showing {}", year, shown);
                }
            }
            let grid = app.year_grid()?;
            print!("{}", render::year(&grid));
        }
        Commands::Moods => {
            print!("{}", render::catalog());
        }
        Commands::Remind => {
            let mut scheduler = StoredReminderScheduler::new(FileStore::open(&config.data_dir)?);
            app.schedule_reminder(&mut scheduler, config.reminder_hour, config.reminder_minute)?;
        }
        Commands::Share { output } => {
            let path = output
                .clone()
                .unwrap_or_else(|| config.data_dir.join(DEFAULT_SHARE_FILE_NAME));
            let mut exporter = SvgFileExporter::new(&path);
            app.export_share_card(&mut exporter)?;
            println!("Share card written to {}", exporter.output().display());
        }
    }
    Ok(())
}
