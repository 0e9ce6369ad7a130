//! `udfkit` developer CLI: drive the builtin functions over JSON input.

mod json;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value as Json;
use std::{
    fs,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    process::ExitCode,
};
use thiserror::Error as ThisError;
use udfkit::{
    config::{ConfigError, FunctionsConfig},
    core::{fingerprint::RowFingerprint, obs},
    prelude::*,
};

use json::{JsonValueError, row_from_json, value_to_json};

/// udfkit - Hive-style UDF, UDTF and COUNT aggregate toolkit
#[derive(Debug, Parser)]
#[command(name = "udfkit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print the metrics report as JSON after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Count rows from a JSONL file (one JSON array or null per line)
    Count {
        /// count(*): every present line counts, values are ignored
        #[arg(long, conflicts_with = "distinct")]
        all: bool,

        /// count(DISTINCT ...)
        #[arg(long)]
        distinct: bool,

        /// Run as a windowed aggregate (no partial/merge protocol for DISTINCT)
        #[arg(long)]
        windowing: bool,

        /// Spread rows round-robin over N partitions and merge their partials
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        partitions: u32,

        /// Input file
        rows: PathBuf,
    },

    /// Evaluate double(x)
    Double {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// Evaluate split_name(full) and print the forwarded rows
    SplitName { full: String },

    /// List registered functions
    Functions {
        /// Function-registration TOML file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

///
/// CliError
///

#[derive(Debug, ThisError)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: JsonValueError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", .0.display_with_class())]
    Function(#[from] udfkit::Error),

    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct CountOutput {
    count: u64,
}

#[derive(Serialize)]
struct FunctionOutput {
    kind: String,
    name: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    obs::metrics_reset_all();

    match &cli.command {
        Command::Count {
            all,
            distinct,
            windowing,
            partitions,
            rows,
        } => {
            let rows = read_rows(rows)?;
            let mode = if *all {
                CountMode::star()
            } else if *distinct {
                CountMode::distinct()
            } else {
                CountMode::values()
            }
            .with_restricted_merge(*windowing);
            let count = run_count(&rows, mode, *partitions as usize)?;
            print_json(&CountOutput { count })?;
        }

        Command::Double { value } => {
            let mut func = FunctionRegistry::with_builtins().scalar("double")?;
            func.initialize(&[ValueKind::Int])?;
            let output = func.evaluate(&[Value::Int(*value)])?;
            println!("{}", value_to_json(&output));
        }

        Command::SplitName { full } => {
            let mut func = FunctionRegistry::with_builtins().table("split_name")?;
            let schema = func.initialize(&[ValueKind::Text])?;
            let mut rows: Vec<Vec<Value>> = Vec::new();
            func.process(&[Value::Text(full.clone())], &mut rows)?;
            func.close(&mut rows)?;

            for row in rows {
                let object = schema
                    .iter()
                    .zip(&row)
                    .map(|(field, value)| (field.name.to_string(), value_to_json(value)))
                    .collect::<serde_json::Map<_, _>>();
                println!("{}", Json::Object(object));
            }
        }

        Command::Functions { config } => {
            let registry = match config {
                Some(path) => FunctionRegistry::from_config(&FunctionsConfig::load(path)?)?,
                None => FunctionRegistry::with_builtins(),
            };
            for (kind, name) in registry.names() {
                print_json(&FunctionOutput {
                    kind: kind.to_string(),
                    name,
                })?;
            }
        }
    }

    if cli.metrics {
        print_json(&obs::metrics_report())?;
    }

    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<Option<Vec<Value>>>, CliError> {
    let io_err = |source: io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(fs::File::open(path).map_err(io_err)?);

    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let json: Json = serde_json::from_str(&line).map_err(|source| CliError::Json {
            line: number,
            source,
        })?;
        let row = row_from_json(&json).map_err(|source| CliError::Row {
            line: number,
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

fn run_count(
    rows: &[Option<Vec<Value>>],
    mode: CountMode,
    partitions: usize,
) -> Result<u64, CliError> {
    // count(*) sees empty rows; the line content only marks presence
    let rows: Vec<Option<Vec<Value>>> = if mode.count_all_rows {
        rows.iter()
            .map(|row| row.as_ref().map(|_| Vec::new()))
            .collect()
    } else {
        rows.to_vec()
    };
    let arguments = if mode.count_all_rows {
        Vec::new()
    } else {
        infer_kinds(&rows)
    };
    let func = FunctionRegistry::with_builtins().count("count", &arguments, mode)?;

    if partitions <= 1 {
        return Ok(fold_rows(&func, &rows)?);
    }

    // no more partitions than rows
    let partitions = partitions.min(rows.len().max(1));
    let mut split = vec![Vec::new(); partitions];
    for (index, row) in rows.into_iter().enumerate() {
        let slot = partition_slot(row.as_deref(), index, partitions, mode)?;
        split[slot].push(row);
    }

    Ok(fold_partitions(&func, &split)?)
}

// DISTINCT partials only sum exactly when equal rows share a partition, so
// distinct rows are routed by fingerprint; everything else is round-robin.
fn partition_slot(
    row: Option<&[Value]>,
    index: usize,
    partitions: usize,
    mode: CountMode,
) -> Result<usize, CliError> {
    match row {
        Some(values) if mode.distinct => {
            let hash = RowFingerprint::from_row(values)
                .map_err(udfkit::Error::from)?
                .hash();
            let slots = u64::try_from(partitions).unwrap_or(u64::MAX);

            Ok(usize::try_from(hash % slots).unwrap_or_default())
        }
        _ => Ok(index % partitions),
    }
}

// Column kinds come from the first non-null value in each column.
fn infer_kinds(rows: &[Option<Vec<Value>>]) -> Vec<ValueKind> {
    let width = rows.iter().flatten().map(Vec::len).next().unwrap_or(1);
    (0..width)
        .map(|column| {
            rows.iter()
                .flatten()
                .filter_map(|row| row.get(column))
                .find(|value| !value.is_null())
                .map_or(ValueKind::Null, Value::kind)
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string(value)?);

    Ok(())
}

///
/// TESTS
///
