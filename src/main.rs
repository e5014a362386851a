use anyhow::Context;
use clap::{Parser, Subcommand};
use sheetmap::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetmap")]
#[command(about = "Typed records to styled spreadsheets and back.")]
#[command(long_about = "Sheetmap - typed records ⇄ styled spreadsheets

COMMANDS:
  sample   - Export the built-in book catalogue to .xlsx
  inspect  - Show the raw text rows of a sheet
  books    - Import a sheet as book records (JSON output)

ROW RANGES:
  --start is the first zero-based row read. --end-offset is added to the
  index of the last row: 0 reads through the last row, -1 skips the last.

EXAMPLES:
  sheetmap sample books.xlsx --title \"My Books\"
  sheetmap inspect books.xlsx --start 1
  sheetmap books books.xlsx --start 2 --end-offset 0

Set RUST_LOG=sheetmap=debug for per-row logging.")]
#[command(version)]
struct Cli {
    /// Log every scanned row and skipped field
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the built-in book catalogue to .xlsx
    Sample {
        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Text of the merged title row
        #[arg(short, long)]
        title: Option<String>,

        /// Date format for the "Stocked At" column
        #[arg(short, long, default_value = "yyyy-MM-dd HH:mm")]
        pattern: String,

        /// YAML theme overriding the title/header/data styles
        #[arg(long, env = "SHEETMAP_THEME")]
        theme: Option<PathBuf>,
    },

    /// Show the raw text rows of a sheet
    Inspect {
        /// Path to a workbook (.xls, .xlsx, .xlsb, .ods)
        file: PathBuf,

        /// First row to read (zero-based)
        #[arg(short, long, default_value_t = 0)]
        start: u32,

        /// Offset added to the last row index
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        end_offset: i64,

        /// Sheet name (defaults to the first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a sheet as book records and print them as JSON
    Books {
        /// Path to a workbook (.xls, .xlsx, .xlsb, .ods)
        file: PathBuf,

        /// First row to read (zero-based)
        #[arg(short, long, default_value_t = 2)]
        start: u32,

        /// Offset added to the last row index
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        end_offset: i64,

        /// Fail when a row's column count differs from the field count
        #[arg(long)]
        strict: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sheetmap=debug" } else { "sheetmap=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sample {
            output,
            title,
            pattern,
            theme,
        } => cli::sample(output.clone(), title, pattern, theme)
            .with_context(|| format!("exporting to {}", output.display())),

        Commands::Inspect {
            file,
            start,
            end_offset,
            sheet,
            json,
        } => cli::inspect(file.clone(), start, end_offset, sheet, json)
            .with_context(|| format!("inspecting {}", file.display())),

        Commands::Books {
            file,
            start,
            end_offset,
            strict,
        } => cli::books(file.clone(), start, end_offset, strict)
            .with_context(|| format!("importing {}", file.display())),
    }
}
