//! CLI module for the standing desk timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `console`: stdin front-end that drives a running session
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod console;
pub mod display;

pub use commands::{Cli, Commands, ConfigCommand, RunArgs};
pub use console::{parse_line, run_console, ConsoleCommand, ConsoleError};
pub use display::{ConfigReport, Display};
