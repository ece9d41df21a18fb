use crate::song_lookup::DEFAULT_MODEL;
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

const DATA_FILE_NAME: &str = "journal_entries.json";
const LOG_FILE_NAME: &str = "journal.log";

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// File holding the journal entries
    #[arg(long, env = "ZENITH_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Where to write logs
    #[arg(long, env = "ZENITH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "ZENITH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Gemini API key used for song search
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model used for song search
    #[arg(long, env = "ZENITH_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

/// Settings resolved from the command line, the environment and the
/// platform data directory, in that order.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let needs_default_dir = cli.data_file.is_none() || cli.log_file.is_none();
        let data_dir = if needs_default_dir {
            Some(default_data_dir()?)
        } else {
            None
        };
        let in_data_dir = |name: &str| data_dir.as_ref().map(|d| d.join(name));

        Ok(Config {
            data_file: cli
                .data_file
                .or_else(|| in_data_dir(DATA_FILE_NAME))
                .ok_or_else(|| eyre!("no location for the journal file"))?,
            log_file: cli
                .log_file
                .or_else(|| in_data_dir(LOG_FILE_NAME))
                .ok_or_else(|| eyre!("no location for the log file"))?,
            log_level: cli.log_level,
            api_key: cli.api_key.filter(|k| !k.trim().is_empty()),
            model: cli.model,
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "zenith-journal")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| eyre!("could not locate a home directory for the journal"))
}
