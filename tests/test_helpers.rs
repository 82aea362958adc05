#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Creates a `Command` for the `moodflow` binary with a clean environment
/// whose data directory is `data_dir`.
pub fn base_moodflow_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("moodflow").expect("moodflow binary not built");
    configure_moodflow_command(&mut cmd);
    cmd.env("MOODFLOW_DIR", data_dir);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_moodflow_command(cmd: &mut Command) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", "/tmp");
}

/// Reads the persisted mood log as JSON.
pub fn read_log(data_dir: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(data_dir.join("moodLogs.json")).expect("mood log missing");
    serde_json::from_str(&raw).expect("mood log is not JSON")
}
