//! Music Ledger - an HTML library report generator for audio collections.
//!
//! Scans a directory tree for audio files, normalizes their tag metadata
//! (resolving cover art from sibling images), and runs the result through an
//! in-memory data grid - filterable, sortable, column-customizable, with
//! delimited-text export and import - whose output is a single
//! self-contained HTML report.

pub mod cli;
pub mod config;
pub mod cover;
pub mod delimited;
pub mod error;
pub mod grid;
pub mod library;
pub mod metadata;
pub mod model;
pub mod report;
pub mod scanner;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("music_ledger=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
