use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A tiny daily mood journal
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output (sets the log level to debug)
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(long, global = true, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[clap(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Things you can do with the journal
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show today's mood and note
    Today,

    /// Log a mood for today, keeping today's note
    Log {
        /// Mood id (rad, good, meh, sad, awful)
        mood: String,

        /// Replace today's note as well
        #[clap(short = 'n', long)]
        note: Option<String>,
    },

    /// Replace today's note (saved once today has a mood)
    Note {
        /// Note text, at most 100 characters are kept
        text: String,
    },

    /// Edit the entry of a past day or today
    Edit {
        /// Day to edit (format: YYYY-MM-DD or YYYYMMDD)
        date: String,

        /// New mood; required when the day has no entry yet
        #[clap(short = 'm', long)]
        mood: Option<String>,

        /// New note
        #[clap(short = 'n', long)]
        note: Option<String>,
    },

    /// Delete the entry of a day
    Delete {
        /// Day to delete (format: YYYY-MM-DD or YYYYMMDD)
        date: String,
    },

    /// Print the entry of a day (today by default)
    Show {
        /// Day to show (format: YYYY-MM-DD or YYYYMMDD)
        date: Option<String>,
    },

    /// Show how often each mood was logged
    Stats,

    /// Show a month calendar with logged moods
    Month {
        /// Month to show (format: YYYY-MM), the current month by default
        month: Option<String>,

        /// Highlight a day
        #[clap(short = 'f', long)]
        focus: Option<String>,
    },

    /// Show the year heatmap
    Year {
        /// Year to show, the current year by default
        year: Option<i32>,
    },

    /// List the moods you can log
    Moods,

    /// Schedule the daily reminder
    Remind,

    /// Write the share card for today
    Share {
        /// Where to write the card (defaults to moodflow-card.svg in the data directory)
        #[clap(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        <CliArgs as Parser>::parse()
    }

    /// Log filter directive to use when RUST_LOG is unset
    pub fn effective_log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_global_flags() {
        let args = CliArgs::parse_from(vec!["moodflow", "today"]);
        assert_eq!(args.command, Commands::Today);
        assert!(!args.verbose);
        assert_eq!(args.log_format, "text");
        assert_eq!(args.effective_log_level(), "info");
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(vec!["moodflow"]).is_err());
    }

    #[test]
    fn test_log_command() {
        let args = CliArgs::parse_from(vec!["moodflow", "log", "good", "--note", "sunny"]);
        assert_eq!(
            args.command,
            Commands::Log {
                mood: "good".to_string(),
                note: Some("sunny".to_string())
            }
        );

        let args = CliArgs::parse_from(vec!["moodflow", "log", "meh"]);
        assert_eq!(
            args.command,
            Commands::Log {
                mood: "meh".to_string(),
                note: None
            }
        );
    }

    #[test]
    fn test_edit_command() {
        let args = CliArgs::parse_from(vec![
            "moodflow", "edit", "20240101", "-m", "rad", "-n", "x",
        ]);
        assert_eq!(
            args.command,
            Commands::Edit {
                date: "20240101".to_string(),
                mood: Some("rad".to_string()),
                note: Some("x".to_string())
            }
        );
    }

    #[test]
    fn test_month_and_year_commands() {
        let args = CliArgs::parse_from(vec![
            "moodflow",
            "month",
            "2024-06",
            "--focus",
            "2024-06-03",
        ]);
        assert_eq!(
            args.command,
            Commands::Month {
                month: Some("2024-06".to_string()),
                focus: Some("2024-06-03".to_string())
            }
        );

        let args = CliArgs::parse_from(vec!["moodflow", "year", "2023"]);
        assert_eq!(args.command, Commands::Year { year: Some(2023) });
        assert!(CliArgs::try_parse_from(vec!["moodflow", "year", "next"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(vec!["moodflow", "stats", "-v", "--log-format", "json"]);
        assert!(args.verbose);
        assert_eq!(args.log_format, "json");
        assert_eq!(args.effective_log_level(), "debug");
    }

    #[test]
    fn test_invalid_log_format() {
        assert!(CliArgs::try_parse_from(vec!["moodflow", "--log-format", "xml", "stats"]).is_err());
    }

    #[test]
    fn test_share_output() {
        let args = CliArgs::parse_from(vec!["moodflow", "share", "-o", "/tmp/card.svg"]);
        assert_eq!(
            args.command,
            Commands::Share {
                output: Some(PathBuf::from("/tmp/card.svg"))
            }
        );
    }
}
