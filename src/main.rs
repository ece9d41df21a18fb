mod config;
mod entry_store;
mod error;
mod journal_entry;
mod journal_state;
mod session;
mod song_lookup;
mod song_search;
mod stats;
mod ui;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use config::{Cli, Config};
use entry_store::JsonFileStore;
use journal_state::{JournalState, SystemClock};
use session::Session;
use song_lookup::GeminiSongLookup;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{Action, UI};

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::from_cli(Cli::parse())?;
    init_logging(&config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting journal");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .wrap_err("failed to start the async runtime")?;

    let lookup = GeminiSongLookup::new(config.api_key.clone(), config.model.clone());
    if !lookup.is_configured() {
        warn!("API_KEY is not set, song search will not work");
    }

    let store = JsonFileStore::new(&config.data_file);
    info!(path = %store.path().display(), "Opening journal");
    let mut session = Session::new(JournalState::open(store, SystemClock));

    let mut ui = UI::new()?;
    ui.load_form(session.active_entry());

    loop {
        ui.tick();
        ui.display(&session)?;

        if let Some(action) = ui.handle_input(&session)? {
            match action {
                Action::NewEntry => {
                    session.start_new_entry();
                    ui.load_form(None);
                }
                Action::Select(id) => {
                    if session.select_entry(&id) {
                        ui.load_form(session.active_entry());
                    }
                }
                Action::Save => match session.save_entry(ui.form_draft()) {
                    Ok(saved) => {
                        ui.load_form(Some(&saved));
                        ui.set_status(format!("Saved {}", saved.heading()));
                    }
                    Err(e) => ui.set_status(e.to_string()),
                },
                Action::Delete(id) => {
                    session.delete_entry(&id);
                    ui.load_form(session.active_entry());
                }
                Action::Cancel => {
                    session.cancel_edit();
                    ui.load_form(session.active_entry());
                }
                Action::SearchSongs => {
                    if let Some(dialog) = ui.song_search_mut() {
                        dialog.submit(runtime.handle(), &lookup);
                    }
                }
                Action::Quit => break,
            }
        }
    }

    info!("Journal closed");
    Ok(())
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent).wrap_err("failed to create the log directory")?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .wrap_err_with(|| format!("failed to open log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .wrap_err("invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
