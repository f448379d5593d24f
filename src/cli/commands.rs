//! Command definitions for the standing desk timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::Interval;

// ============================================================================
// CLI Structure
// ============================================================================

/// Standing Desk Timer - gentle reminders to switch between sitting and standing
#[derive(Parser, Debug)]
#[command(
    name = "standing-desk-timer",
    version,
    about = "Recurring reminders to switch between sitting and standing",
    long_about = "Runs in the background and sends a desktop notification every few hours\n\
                  as a reminder to change position. The interval can be changed while it runs.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ~/.standing-desk-timer/settings.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the reminder loop in this terminal
    Run(RunArgs),

    /// Show or change the persisted settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// `config` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the stored interval
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Store a new interval in hours (truncated to 0.1)
    SetInterval {
        /// Hours between reminders
        #[arg(value_parser = parse_hours)]
        hours: f64,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Interval in hours for this session (saved as the new default)
    #[arg(short, long, value_parser = parse_hours)]
    pub interval: Option<f64>,

    /// Print reminders to the terminal instead of desktop notifications
    #[arg(long)]
    pub no_desktop_notifications: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a positive, finite number of hours.
fn parse_hours(s: &str) -> Result<f64, String> {
    let hours: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    Interval::new(hours).map_err(|e| e.to_string())?;
    Ok(hours)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["standing-desk-timer"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.settings.is_none());
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["standing-desk-timer", "--verbose"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["standing-desk-timer", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_settings_after_subcommand() {
            let cli = Cli::parse_from([
                "standing-desk-timer",
                "config",
                "show",
                "--settings",
                "/tmp/s.json",
            ]);
            assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
        }

        #[test]
        fn test_parse_completions_bash() {
            let cli = Cli::parse_from(["standing-desk-timer", "completions", "bash"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Bash);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["standing-desk-timer", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Run Command Tests
    // ------------------------------------------------------------------------

    mod run_args_tests {
        use super::*;

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["standing-desk-timer", "run"]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert!(args.interval.is_none());
                    assert!(!args.no_desktop_notifications);
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_interval() {
            let cli = Cli::parse_from(["standing-desk-timer", "run", "--interval", "1.5"]);
            match cli.command {
                Some(Commands::Run(args)) => assert_eq!(args.interval, Some(1.5)),
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_interval_short() {
            let cli = Cli::parse_from(["standing-desk-timer", "run", "-i", "2"]);
            match cli.command {
                Some(Commands::Run(args)) => assert_eq!(args.interval, Some(2.0)),
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_no_desktop_notifications() {
            let cli = Cli::parse_from(["standing-desk-timer", "run", "--no-desktop-notifications"]);
            match cli.command {
                Some(Commands::Run(args)) => assert!(args.no_desktop_notifications),
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_rejects_zero() {
            let result = Cli::try_parse_from(["standing-desk-timer", "run", "--interval", "0"]);
            assert!(result.is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Config Command Tests
    // ------------------------------------------------------------------------

    mod config_tests {
        use super::*;

        #[test]
        fn test_parse_config_show() {
            let cli = Cli::parse_from(["standing-desk-timer", "config", "show"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Config(ConfigCommand::Show { json: false }))
            ));
        }

        #[test]
        fn test_parse_config_show_json() {
            let cli = Cli::parse_from(["standing-desk-timer", "config", "show", "--json"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Config(ConfigCommand::Show { json: true }))
            ));
        }

        #[test]
        fn test_parse_set_interval() {
            let cli = Cli::parse_from(["standing-desk-timer", "config", "set-interval", "2.5"]);
            match cli.command {
                Some(Commands::Config(ConfigCommand::SetInterval { hours })) => {
                    assert_eq!(hours, 2.5);
                }
                _ => panic!("Expected SetInterval command"),
            }
        }

        #[test]
        fn test_parse_set_interval_rejects_invalid() {
            for bad in ["0", "-1", "abc", "inf", "NaN"] {
                let result =
                    Cli::try_parse_from(["standing-desk-timer", "config", "set-interval", bad]);
                assert!(result.is_err(), "expected '{}' to be rejected", bad);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Validation Tests
    // ------------------------------------------------------------------------

    mod validation_tests {
        use super::*;

        #[test]
        fn test_parse_hours_valid() {
            assert_eq!(parse_hours("1"), Ok(1.0));
            assert_eq!(parse_hours(" 0.5 "), Ok(0.5));
        }

        #[test]
        fn test_parse_hours_not_a_number() {
            assert!(parse_hours("soon").unwrap_err().contains("not a number"));
        }

        #[test]
        fn test_parse_hours_not_positive() {
            assert!(parse_hours("0").unwrap_err().contains("positive"));
        }
    }
}
