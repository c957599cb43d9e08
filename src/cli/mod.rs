//! Command-line interface for music-ledger.
//!
//! This module provides the subcommands for generating reports, exporting
//! and importing delimited text, and inspecting the column catalog.

mod commands;

pub use commands::{Cli, Commands, run_command};
