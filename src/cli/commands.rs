//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns an `anyhow::Result<()>`. This is also where filter
//! rules are validated before they reach the engine: unknown columns, bad
//! operator/type pairings, and rules on image columns are rejected here.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::delimited::{self, Delimiter};
use crate::error::Error;
use crate::grid::{FilterOp, FilterRule, GridSession, SortState};
use crate::library;
use crate::model::{ColumnKey, ValueType};
use crate::report;

/// Music Ledger CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory and write the HTML library report
    Report {
        /// Path to the directory to scan
        path: PathBuf,
        /// Output file (default: configured report output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Filter rule KEY:OP[+FLAGS]:VALUE, repeatable.
        /// Flags: c = match case, w = whole word, r = regex.
        /// Examples: year:between:1990:1999  trackName:contains+w:Love
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Sort column: KEY or KEY:desc
        #[arg(long)]
        sort: Option<String>,
        /// Comma-separated columns to show, in order
        #[arg(long)]
        columns: Option<String>,
    },
    /// Export the visible table as delimited text
    Export {
        /// Path to the directory to scan
        path: PathBuf,
        /// Output file (default: library.csv or library.txt by delimiter)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Field separator
        #[arg(long, value_enum)]
        delimiter: Option<Delimiter>,
        /// Comma-separated columns to export, in order
        #[arg(long)]
        columns: Option<String>,
        /// Filter rule KEY:OP[+FLAGS]:VALUE, repeatable
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Sort column: KEY or KEY:desc
        #[arg(long)]
        sort: Option<String>,
        /// Print to stdout instead of writing a file (omits the BOM)
        #[arg(long)]
        preview: bool,
    },
    /// Import delimited text and render it as a report
    Import {
        /// Input file, or - for stdin
        input: PathBuf,
        /// Output file (default: configured report output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Field separator
        #[arg(long, value_enum)]
        delimiter: Option<Delimiter>,
    },
    /// List the column catalog
    Columns,
}

/// Run the parsed CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = config::load();

    match &cli.command {
        Commands::Report {
            path,
            output,
            filters,
            sort,
            columns,
        } => cmd_report(
            &config,
            path,
            output.as_deref(),
            filters,
            sort.as_deref(),
            columns.as_deref(),
        ),
        Commands::Export {
            path,
            output,
            delimiter,
            columns,
            filters,
            sort,
            preview,
        } => cmd_export(
            &config,
            path,
            output.as_deref(),
            *delimiter,
            columns.as_deref(),
            filters,
            sort.as_deref(),
            *preview,
        ),
        Commands::Import {
            input,
            output,
            delimiter,
        } => cmd_import(&config, input, output.as_deref(), *delimiter),
        Commands::Columns => cmd_columns(),
    }
}

// ============================================================================
// Individual command implementations
// ============================================================================

fn cmd_report(
    config: &Config,
    path: &Path,
    output: Option<&Path>,
    filters: &[String],
    sort: Option<&str>,
    columns: Option<&str>,
) -> anyhow::Result<()> {
    let session = build_session(config, path, filters, sort, columns)?;
    let html = report::render(&session, &config.report.title);

    let out = output.unwrap_or(&config.report.output);
    report::write_report(out, &html)?;
    println!(
        "Report written to {} ({} of {} tracks shown)",
        out.display(),
        session.visible_count(),
        session.records().len()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_export(
    config: &Config,
    path: &Path,
    output: Option<&Path>,
    delimiter: Option<Delimiter>,
    columns: Option<&str>,
    filters: &[String],
    sort: Option<&str>,
    preview: bool,
) -> anyhow::Result<()> {
    let delimiter = delimiter.unwrap_or(config.export.delimiter);
    let session = build_session(config, path, filters, sort, None)?;

    // The export column picker works on its own snapshot of the catalog.
    let keys: Vec<ColumnKey> = match columns {
        Some(arg) => parse_columns(arg)?,
        None => session
            .catalog()
            .snapshot()
            .visible_columns()
            .filter(|c| c.value_type() != ValueType::Image)
            .map(|c| c.key)
            .collect(),
    };

    let text = session.export(&keys, delimiter)?;

    if preview {
        print!("{text}");
        return Ok(());
    }

    let default_name = PathBuf::from(format!("library.{}", delimiter.extension()));
    let out = output.map(Path::to_path_buf).unwrap_or(default_name);
    delimited::write_file(&out, &text, config.export.include_bom)?;
    println!(
        "Exported {} records to {}",
        session.visible_count(),
        out.display()
    );
    Ok(())
}

fn cmd_import(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    delimiter: Option<Delimiter>,
) -> anyhow::Result<()> {
    let delimiter = delimiter.unwrap_or(config.export.delimiter);
    let text = if input.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(input)?
    };

    let mut session = GridSession::new(Vec::new());
    let count = session.import(&text, delimiter)?;
    println!("Imported {count} records");

    let html = report::render(&session, &config.report.title);
    let out = output.unwrap_or(&config.report.output);
    report::write_report(out, &html)?;
    println!("Report written to {}", out.display());
    Ok(())
}

fn cmd_columns() -> anyhow::Result<()> {
    let catalog = crate::grid::ColumnCatalog::default();
    println!("{:<16} {:<18} {:<10} {}", "KEY", "LABEL", "TYPE", "DEFAULT");
    for key in ColumnKey::ALL {
        let visible = catalog.get(key).map(|c| c.visible).unwrap_or(false);
        println!(
            "{:<16} {:<18} {:<10} {}",
            key.as_str(),
            key.label(),
            type_name(key.value_type()),
            if visible { "shown" } else { "hidden" }
        );
    }
    Ok(())
}

// ============================================================================
// Session assembly and argument parsing
// ============================================================================

/// Load the library and apply the requested engine state to a fresh session.
fn build_session(
    config: &Config,
    path: &Path,
    filters: &[String],
    sort: Option<&str>,
    columns: Option<&str>,
) -> anyhow::Result<GridSession> {
    let records = library::load_library(path, &config.scan.extensions);
    let mut session = GridSession::new(records);

    for arg in filters {
        let (key, rule) = parse_rule(arg)?;
        session.push_rule(key, rule);
    }
    if let Some(arg) = sort {
        session.set_sort(parse_sort(arg)?);
    }
    if let Some(arg) = columns {
        let keys = parse_columns(arg)?;
        apply_column_selection(&mut session, &keys);
    }
    Ok(session)
}

/// Customize-dialog flow: edit a snapshot, then commit it atomically.
/// Listed columns become the visible set, in the listed order.
fn apply_column_selection(session: &mut GridSession, keys: &[ColumnKey]) {
    let mut draft = session.catalog().snapshot();
    draft.reorder(keys);
    let all: Vec<ColumnKey> = draft.columns().iter().map(|c| c.key).collect();
    for key in all {
        let want = keys.contains(&key);
        if draft.get(key).map(|c| c.visible) != Some(want) {
            draft.toggle_visibility(key);
        }
    }
    session.commit_columns(draft);
}

/// Parse one `KEY:OP[+FLAGS]:VALUE` filter argument.
///
/// `between` takes two values: `KEY:between:LOW:HIGH`. For every other
/// operator the remainder after the second colon is the value verbatim, so
/// values may contain colons.
fn parse_rule(arg: &str) -> Result<(ColumnKey, FilterRule), Error> {
    let mut parts = arg.splitn(3, ':');
    let key_part = parts.next().unwrap_or_default();
    let op_part = parts
        .next()
        .ok_or_else(|| Error::invalid_rule(key_part, "expected KEY:OP:VALUE"))?;
    let rest = parts.next().unwrap_or("");

    let key = ColumnKey::parse(key_part).ok_or_else(|| Error::unknown_column(key_part))?;
    if key.value_type() == ValueType::Image {
        return Err(Error::invalid_rule(
            key.as_str(),
            "image columns cannot be filtered",
        ));
    }

    let (op_name, flags) = op_part.split_once('+').unwrap_or((op_part, ""));
    let op = FilterOp::parse(op_name)
        .ok_or_else(|| Error::invalid_rule(key.as_str(), format!("unknown operator '{op_name}'")))?;
    if !op.valid_for(key.value_type()) {
        return Err(Error::invalid_rule(
            key.as_str(),
            format!("operator '{}' does not apply to this column", op.as_str()),
        ));
    }

    let mut rule = FilterRule::new(op, "");
    if op == FilterOp::Between {
        let (low, high) = rest
            .split_once(':')
            .ok_or_else(|| Error::invalid_rule(key.as_str(), "between needs LOW:HIGH"))?;
        rule.value = low.to_string();
        rule.value2 = Some(high.to_string());
    } else {
        rule.value = rest.to_string();
    }

    for flag in flags.chars() {
        match flag {
            'c' => rule.match_case = true,
            'w' => rule.whole_word = true,
            'r' => rule.use_regex = true,
            other => {
                return Err(Error::invalid_rule(
                    key.as_str(),
                    format!("unknown flag '{other}'"),
                ));
            }
        }
    }
    if (rule.match_case || rule.whole_word || rule.use_regex)
        && key.value_type() != ValueType::Text
    {
        return Err(Error::invalid_rule(
            key.as_str(),
            "text modifiers apply to text columns only",
        ));
    }

    Ok((key, rule))
}

/// Parse `KEY` or `KEY:asc` / `KEY:desc`.
fn parse_sort(arg: &str) -> Result<SortState, Error> {
    let (key_part, ascending) = match arg.split_once(':') {
        Some((k, "desc")) => (k, false),
        Some((k, "asc")) => (k, true),
        Some((_, other)) => {
            return Err(Error::config(format!(
                "sort direction must be asc or desc, got '{other}'"
            )));
        }
        None => (arg, true),
    };
    let key = ColumnKey::parse(key_part).ok_or_else(|| Error::unknown_column(key_part))?;
    Ok(SortState {
        key: Some(key),
        ascending,
    })
}

/// Parse a comma-separated column list.
fn parse_columns(arg: &str) -> Result<Vec<ColumnKey>, Error> {
    arg.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ColumnKey::parse(s).ok_or_else(|| Error::unknown_column(s)))
        .collect()
}

const fn type_name(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::Text => "text",
        ValueType::Number => "number",
        ValueType::Duration => "duration",
        ValueType::Image => "image",
    }
}
