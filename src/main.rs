//! profile-recovery: rebuild open tabs, bookmarks and history from a Chrome profile.
//!
//! Entry point: parses the command line, loads settings, and writes the
//! recovery dashboard and bookmark export.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use profile_recovery::app::App;
use profile_recovery::platform;
use profile_recovery::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "profile-recovery",
    about = "Recover open tabs, bookmarks and history from a Chrome profile folder",
    version
)]
struct Cli {
    /// Profile folder to read (defaults to the browser's Default profile)
    profile_dir: Option<PathBuf>,

    /// Folder to write the outputs to (defaults to the Desktop, then home)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file to load instead of the platform default
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Maximum number of history entries to read
    #[arg(long)]
    history_limit: Option<usize>,

    /// Show chrome:// and other internal pages in the dashboard
    #[arg(long)]
    include_internal_urls: bool,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,

    /// Log decoding details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings_engine = SettingsEngine::new(cli.settings);
    let mut settings = match settings_engine.load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(limit) = cli.history_limit {
        settings.history_limit = limit;
    }
    settings.include_internal_urls |= cli.include_internal_urls;
    if let Err(e) = settings_engine.set_settings(settings) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    if cli.save_settings {
        if let Err(e) = settings_engine.save() {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
        println!("Settings: {}", settings_engine.get_config_path().display());
    }

    let profile_dir = cli.profile_dir.unwrap_or_else(platform::default_profile_dir);
    let app = match App::new(&profile_dir, settings_engine.get_settings().clone()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let output_dir = platform::resolve_output_dir(cli.output.as_deref());
    match app.run(&output_dir) {
        Ok(report) => {
            println!("{}", report.summary());
            println!("Dashboard: {}", report.dashboard_path.display());
            if let Some(path) = &report.bookmarks_path {
                println!("Importable bookmarks: {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
