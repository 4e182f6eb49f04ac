//! gridcalc CLI - evaluate spreadsheet formulas stored in CSV files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridcalc::prelude::*;
use gridcalc::tokenize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(author, version, about = "Spreadsheet formula calculator for CSV workbooks")]
struct Cli {
    /// Enable logging (filter with RUST_LOG, default: info)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Field delimiter of the input files
    #[arg(short, long, global = true, default_value = ",")]
    delimiter: char,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the formula stored in one cell
    Eval {
        /// Input CSV files, one sheet each (sheet name = file stem)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Cell address, e.g. B4
        #[arg(short, long)]
        cell: String,

        /// Sheet holding the cell (default: first file)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Run a calculation pass first so referenced formulas have values
        #[arg(long)]
        calculate: bool,
    },

    /// Calculate every formula and print the sheet as CSV
    Calc {
        /// Input CSV files, one sheet each (sheet name = file stem)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Sheet to calculate and print (default: first file)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop at the first formula that fails
        #[arg(long)]
        strict: bool,
    },

    /// Print the token stream of a formula
    Tokens {
        /// Formula text, e.g. "=SUM(A1:A3)*2"
        formula: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(io::stderr)
            .init();
    }

    let read_options = CsvReadOptions {
        delimiter: delimiter_byte(cli.delimiter)?,
        ..Default::default()
    };

    match cli.command {
        Commands::Eval {
            files,
            cell,
            sheet,
            calculate,
        } => eval_cell(&files, &read_options, &cell, sheet.as_deref(), calculate),
        Commands::Calc {
            files,
            sheet,
            output,
            strict,
        } => calc_sheet(&files, &read_options, sheet.as_deref(), output.as_deref(), strict),
        Commands::Tokens { formula } => print_tokens(&formula),
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter '{}' is not a single ASCII character", delimiter))
}

fn load_workbook(files: &[PathBuf], options: &CsvReadOptions) -> Result<Workbook> {
    CsvReader::read_workbook(files, options).with_context(|| {
        let names: Vec<_> = files.iter().map(|f| f.display().to_string()).collect();
        format!("Failed to load '{}'", names.join("', '"))
    })
}

fn sheet_name(workbook: &Workbook, sheet: Option<&str>) -> Result<String> {
    match sheet {
        Some(name) => {
            workbook
                .worksheet_by_name(name)
                .with_context(|| format!("Sheet '{}' not found", name))?;
            Ok(name.to_string())
        }
        None => workbook
            .worksheet(0)
            .map(|ws| ws.name().to_string())
            .context("Workbook has no sheets"),
    }
}

fn eval_cell(
    files: &[PathBuf],
    options: &CsvReadOptions,
    cell: &str,
    sheet: Option<&str>,
    calculate: bool,
) -> Result<()> {
    let mut workbook = load_workbook(files, options)?;
    let sheet = sheet_name(&workbook, sheet)?;

    if calculate {
        let stats = workbook
            .calculate()
            .context("Failed to calculate formulas")?;
        eprintln!(
            "Calculated {} formulas ({} errors)",
            stats.cells_calculated, stats.errors
        );
    }

    let value = match workbook.calc_cell_value(&sheet, cell) {
        Ok(value) => value,
        Err(FormulaError::Core(e)) => {
            return Err(e).with_context(|| format!("Cannot read {}!{}", sheet, cell));
        }
        Err(e) => {
            warn!(sheet = %sheet, cell, error = %e, "formula calculated to an error");
            e.cell_error().to_string()
        }
    };

    println!("{}", value);
    Ok(())
}

fn calc_sheet(
    files: &[PathBuf],
    options: &CsvReadOptions,
    sheet: Option<&str>,
    output: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let mut workbook = load_workbook(files, options)?;
    let sheet = sheet_name(&workbook, sheet)?;

    let stats = workbook
        .calculate_with_options(&CalculationOptions {
            sheet: None,
            stop_on_error: strict,
        })
        .context("Failed to calculate formulas")?;

    eprintln!(
        "Calculated {} formulas ({} errors)",
        stats.cells_calculated, stats.errors
    );

    let worksheet = workbook
        .worksheet_by_name(&sheet)
        .with_context(|| format!("Sheet '{}' not found", sheet))?;
    let write_options = CsvWriteOptions {
        delimiter: options.delimiter,
        ..Default::default()
    };

    match output {
        Some(path) => CsvWriter::write_file(worksheet, path, &write_options)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            CsvWriter::write(worksheet, &mut handle, &write_options)
                .context("Failed to write CSV to stdout")?;
            handle.flush()?;
        }
    }

    Ok(())
}

fn print_tokens(formula: &str) -> Result<()> {
    let tokens = tokenize(formula);
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if tokens.is_empty() {
        writeln!(handle, "(no tokens)")?;
        return Ok(());
    }
    for token in &tokens {
        writeln!(handle, "{}", token)?;
    }
    Ok(())
}
