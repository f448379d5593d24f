//! Standing Desk Timer CLI
//!
//! Sends a gentle reminder every few hours to switch between sitting and
//! standing:
//! - `run` starts the reminder loop with a console panel
//! - `config` shows or changes the stored interval

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use standing_desk_timer::cli::{
    run_console, Cli, Commands, ConfigCommand, ConfigReport, Display, RunArgs,
};
use standing_desk_timer::{
    truncate_to_tenths, Coordinator, CoordinatorParts, DesktopNotificationSink,
    GlobalInputSource, Interval, IntervalStore, JsonIntervalStore, LogNotificationSink,
    ManualInputSource, NotificationSink, StoreError, SystemClock, TerminalSurface,
    TokioTimerDriver,
};

/// Name shown on desktop notifications.
const APP_NAME: &str = "Standing Desk Timer";

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = if verbose {
        "warn,standing_desk_timer=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let path = settings_path(cli.settings)?;
            run(args, path).await?;
        }
        Some(Commands::Config(ConfigCommand::Show { json })) => {
            let path = settings_path(cli.settings)?;
            show_config(&path, json)?;
        }
        Some(Commands::Config(ConfigCommand::SetInterval { hours })) => {
            let path = settings_path(cli.settings)?;
            set_interval(&path, hours)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Resolves the settings file from `--settings` or the home directory.
fn settings_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => JsonIntervalStore::default_path().context("could not locate the settings file"),
    }
}

/// Runs the reminder loop until quit or Ctrl-C.
async fn run(args: RunArgs, settings: PathBuf) -> Result<()> {
    let driver = TokioTimerDriver::new().context("failed to set up timers")?;
    let sink: Box<dyn NotificationSink> = if args.no_desktop_notifications {
        Box::new(LogNotificationSink)
    } else {
        Box::new(DesktopNotificationSink::new(APP_NAME))
    };
    let (input, clicker) = input_source();

    let mut coordinator = Coordinator::new(CoordinatorParts {
        driver: Box::new(driver),
        clock: Arc::new(SystemClock),
        sink,
        input,
        surface: Box::new(TerminalSurface::new()),
        store: Box::new(JsonIntervalStore::new(settings)),
    });
    coordinator
        .start(args.interval)
        .context("failed to arm the first reminder")?;

    println!(
        "Reminding you {}. Type 'help' for commands.",
        Display::interval_label(coordinator.interval())
    );

    let ui = coordinator.ui_sender();
    let countdown = coordinator.countdown();
    let console = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = run_console(stdin, ui, countdown, clicker).await {
            tracing::warn!("console input failed: {}", e);
        }
    });

    coordinator
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    console.abort();
    drop(coordinator);

    // A pending stdin read would keep the runtime from shutting down.
    std::process::exit(0);
}

/// Global input source and, when presses are injected by hand, its clicker.
#[cfg(feature = "global-input")]
fn input_source() -> (Box<dyn GlobalInputSource>, Option<ManualInputSource>) {
    (Box::new(standing_desk_timer::RdevInputSource::new()), None)
}

/// Global input source and, when presses are injected by hand, its clicker.
#[cfg(not(feature = "global-input"))]
fn input_source() -> (Box<dyn GlobalInputSource>, Option<ManualInputSource>) {
    let source = ManualInputSource::new();
    (Box::new(source.clone()), Some(source))
}

/// Prints the stored interval.
///
/// An unparsable settings file is reported as unset, the same way `run`
/// treats it.
fn show_config(path: &Path, json: bool) -> Result<()> {
    let store = JsonIntervalStore::new(path);
    let stored = stored_or_warn(&store)?;
    let report = ConfigReport::new(path, stored);

    if json {
        Display::show_config_json(&report)?;
    } else {
        Display::show_config(&report);
    }
    Ok(())
}

/// Reads the stored interval, warning about and skipping an unparsable file.
fn stored_or_warn(store: &JsonIntervalStore) -> Result<Option<f64>, StoreError> {
    match store.get_stored_interval() {
        Err(e @ StoreError::Parse { .. }) => {
            Display::show_warning(&format!("{} ({})", e, e.suggestion()));
            Ok(None)
        }
        other => other,
    }
}

/// Truncates, validates and stores a new interval.
fn set_interval(path: &Path, hours: f64) -> Result<()> {
    let interval = Interval::new(truncate_to_tenths(hours))
        .with_context(|| format!("{} hours rounds down to zero", hours))?;

    let mut store = JsonIntervalStore::new(path);
    store.set_stored_interval(interval)?;
    Display::show_interval_saved(interval, path);
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["standing-desk-timer"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["standing-desk-timer", "run"]);
        assert!(matches!(cli.command, Some(Commands::Run(_))));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["standing-desk-timer", "--verbose", "config", "show"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_settings_path_explicit() {
        let path = settings_path(Some(PathBuf::from("/tmp/custom.json"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.json"));
    }

    #[test]
    fn test_set_interval_truncates_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        set_interval(&path, 2.37).unwrap();

        let store = JsonIntervalStore::new(&path);
        let stored = store.get_stored_interval().unwrap().unwrap();
        assert!((stored - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_set_interval_rejects_truncated_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert!(set_interval(&path, 0.05).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_show_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        show_config(&dir.path().join("settings.json"), true).unwrap();
    }

    #[test]
    fn test_show_config_unparsable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonIntervalStore::new(&path);
        assert!(matches!(
            store.get_stored_interval(),
            Err(StoreError::Parse { .. })
        ));
        assert_eq!(stored_or_warn(&store).unwrap(), None);
        show_config(&path, false).unwrap();
    }

    #[test]
    fn test_show_config_unreadable_path_fails() {
        let dir = tempfile::tempdir().unwrap();

        // A directory cannot be read as a settings file.
        assert!(show_config(dir.path(), false).is_err());
    }
}
