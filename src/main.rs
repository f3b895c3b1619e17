use clap::{Parser, Subcommand};
use sheetbind::cli;
use sheetbind::error::SheetResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetbind")]
#[command(about = "Bind spreadsheet columns to record fields: validated import and export.")]
#[command(long_about = "sheetbind - typed spreadsheet ingestion and export

Reads the first sheet of a workbook (row 0 = header) against a YAML schema
and emits JSON, or writes JSON records to a single-sheet .xlsx file.

COMMANDS:
  read    - Spreadsheet to JSON
  write   - JSON records to Excel (.xlsx)
  schema  - Show the columns a schema file maps

SCHEMA FILE:
  sheet:
    empty_cells_allowed: true
    repeated_from_column: 1
  fields:
    - property: id
      column: Id
      required: true
    - property: tags
      column: Tags
      repeated: true

EXAMPLES:
  sheetbind read products.xlsx --schema products.yaml --records
  sheetbind write products.json --schema products.yaml -o products.xlsx

Logging is controlled by RUST_LOG (default: sheetbind=warn).")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Read a spreadsheet into JSON.

Only the first sheet is read. Row 0 holds the column names, matched
case-insensitively against the schema. Rows are numbered from 1 for the
first data row; entirely blank rows are skipped.

With --stop-on-error the first violation (blank header cell, blank cell
where not allowed, missing required value) aborts the read and nothing is
printed. Without it, violations are logged and reading continues.")]
    /// Read a spreadsheet into JSON
    Read {
        /// Spreadsheet file (.xlsx, .xlsm, .xls, .ods)
        input: PathBuf,

        /// YAML schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Abort on the first violation
        #[arg(long, env = "SHEETBIND_STOP_ON_ERROR")]
        stop_on_error: bool,

        /// Emit one JSON object per row instead of rows of cells
        #[arg(short, long)]
        records: bool,

        /// Write JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Write JSON records to an Excel file.

The input is a JSON array of objects keyed by property name. One header row
is written with each mapped column name, then one row per record. A
repeated field takes an array and spreads it over the trailing columns.

With --stop-on-error a missing required value (or a missing value when
empty cells are not allowed) aborts the write and no file is created.")]
    /// Write JSON records to Excel (.xlsx)
    Write {
        /// JSON file holding an array of records
        input: PathBuf,

        /// YAML schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Output Excel file
        #[arg(short, long)]
        output: PathBuf,

        /// Abort on the first violation
        #[arg(long, env = "SHEETBIND_STOP_ON_ERROR")]
        stop_on_error: bool,

        /// Worksheet name
        #[arg(long, env = "SHEETBIND_SHEET_NAME")]
        sheet_name: Option<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the columns a schema file maps
    Schema {
        /// YAML schema file
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sheetbind=debug" } else { "sheetbind=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> SheetResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Read {
            input,
            schema,
            stop_on_error,
            records,
            output,
            verbose,
        } => {
            init_logging(verbose);
            cli::read(input, schema, stop_on_error, records, output, verbose)
        }

        Commands::Write {
            input,
            schema,
            output,
            stop_on_error,
            sheet_name,
            verbose,
        } => {
            init_logging(verbose);
            cli::write(input, schema, output, stop_on_error, sheet_name, verbose)
        }

        Commands::Schema { file } => {
            init_logging(false);
            cli::schema(file)
        }
    }
}
