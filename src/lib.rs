/*!
# MoodFlow

MoodFlow is a tiny daily mood journal: one mood from a fixed catalog of five
and an optional short note per calendar day. The log is persisted as a single
JSON document and every view (statistics, month markings, the year heatmap
and the share card) is derived from it on demand.

## Architecture

- `mood`: The static mood catalog
- `date_key`: Canonical `YYYY-MM-DD` day keys and the clock abstraction
- `storage`: Key/value persistence (file-backed and in-memory)
- `log_store`: The mood log, its JSON layout and write-through persistence
- `stats`, `calendar`: Views derived from the log
- `edit_flow`: The open/edit/save cycle for a single day
- `services`, `share`: Reminder, share export and haptics seams
- `app`: The application state container tying everything together
- `cli`, `config`, `render`: The command-line surface

## Usage Example

```rust,no_run
use moodflow::app::MoodApp;
use moodflow::date_key::SystemClock;
use moodflow::log_store::LogStore;
use moodflow::storage::FileStore;
use moodflow::{mood, Config};

fn main() -> moodflow::AppResult<()> {
    let config = Config::load()?;
    let store = LogStore::load(FileStore::open(&config.data_dir)?);
    let mut app = MoodApp::new(store, SystemClock);

    if let Some(good) = mood::find("good") {
        app.select_mood(good)?;
    }
    println!("{} days logged", app.stats().total);
    Ok(())
}
```
*/

/// Application state container
pub mod app;
/// Month markings and the year heatmap
pub mod calendar;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Day keys and clocks
pub mod date_key;
/// Single-day edit flow
pub mod edit_flow;
/// Error types and utilities for error handling
pub mod errors;
/// The persisted mood log
pub mod log_store;
/// The mood catalog
pub mod mood;
/// Plain-text terminal views
pub mod render;
/// Reminder, share and haptic services
pub mod services;
/// The share card
pub mod share;
/// Mood statistics
pub mod stats;
/// Key/value persistence
pub mod storage;

// Re-export important types for convenience
pub use app::MoodApp;
pub use cli::CliArgs;
pub use config::Config;
pub use date_key::DateKey;
pub use errors::{AppError, AppResult};
pub use log_store::{LogEntry, LogStore, MoodLog};
pub use mood::Mood;
