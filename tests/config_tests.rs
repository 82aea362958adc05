use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::tempdir;

use moodflow::config::Config;
use moodflow::errors::{AppError, AppResult};
use moodflow::log_store::LogStore;
use moodflow::storage::FileStore;

fn restore(name: &str, value: Option<String>) {
    match value {
        Some(val) => env::set_var(name, val),
        None => env::remove_var(name),
    }
}

#[test]
#[serial]
fn test_config_load_with_environment_vars() {
    let original_dir = env::var("MOODFLOW_DIR").ok();
    let original_reminder = env::var("MOODFLOW_REMINDER").ok();
    let original_columns = env::var("MOODFLOW_HEATMAP_COLUMNS").ok();

    let temp_dir = tempdir().unwrap();
    let dir_path = temp_dir.path().to_string_lossy().to_string();

    env::set_var("MOODFLOW_DIR", &dir_path);
    env::set_var("MOODFLOW_REMINDER", "21:15");
    env::set_var("MOODFLOW_HEATMAP_COLUMNS", "7");

    let config = Config::load();

    restore("MOODFLOW_DIR", original_dir);
    restore("MOODFLOW_REMINDER", original_reminder);
    restore("MOODFLOW_HEATMAP_COLUMNS", original_columns);

    let config = config.unwrap();
    assert_eq!(config.data_dir, PathBuf::from(&dir_path));
    assert_eq!(config.reminder_hour, 21);
    assert_eq!(config.reminder_minute, 15);
    assert_eq!(config.heatmap_columns, 7);
}

#[test]
#[serial]
fn test_config_load_expands_home() {
    let original_dir = env::var("MOODFLOW_DIR").ok();
    let original_home = env::var("HOME").ok();

    env::set_var("HOME", "/home/moodflow-test");
    env::set_var("MOODFLOW_DIR", "~/moods");

    let config = Config::load();

    restore("MOODFLOW_DIR", original_dir);
    restore("HOME", original_home);

    assert_eq!(
        config.unwrap().data_dir,
        PathBuf::from("/home/moodflow-test/moods")
    );
}

#[test]
#[serial]
fn test_config_drives_store_location() -> AppResult<()> {
    let original_dir = env::var("MOODFLOW_DIR").ok();
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("nested").join("moodflow");

    env::set_var("MOODFLOW_DIR", &data_dir);
    let config = Config::load();
    restore("MOODFLOW_DIR", original_dir);

    let config = config?;
    let mut store = LogStore::load(FileStore::open(&config.data_dir)?);
    store.upsert("2024-06-15".parse().unwrap(), "good", "", 1)?;

    assert!(data_dir.join("moodLogs.json").exists());
    Ok(())
}

#[test]
fn test_config_validate_rejects_bad_columns() {
    let config = Config {
        data_dir: PathBuf::from("/tmp/moodflow"),
        heatmap_columns: 0,
        ..Config::default()
    };

    match config.validate() {
        Err(AppError::Config(message)) => assert!(message.contains("between 1 and 28")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}
