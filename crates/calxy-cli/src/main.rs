//! calxy CLI - evaluate formulas and run sheet scripts

use anyhow::{bail, Context, Result};
use calxy::prelude::*;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Largest grid printed when no explicit size is given
const DEFAULT_MAX_ROWS: u32 = 1000;
const DEFAULT_MAX_COLS: u32 = 100;

#[derive(Parser)]
#[command(name = "calxy")]
#[command(author, version, about = "Spreadsheet formula engine")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single formula against an empty sheet
    Eval {
        /// Formula text, e.g. "=SUM(1, 2) * 3"
        formula: String,
    },

    /// Apply a script of cell updates and print the resulting grid
    ///
    /// Each line is either `<A1> <raw text>` or `name <NAME> <A1:B2>`.
    /// Blank lines and lines starting with `#` are ignored.
    Run {
        /// Script file
        script: PathBuf,

        /// Number of rows to print (default: used range, at most 1000)
        #[arg(long)]
        rows: Option<u32>,

        /// Number of columns to print (default: used range, at most 100)
        #[arg(long)]
        cols: Option<u32>,
    },

    /// Print the bundled example sheet
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval { formula } => eval(&formula),
        Commands::Run { script, rows, cols } => run(&script, rows, cols),
        Commands::Demo => print_grid(&demo_sheet(), None, None),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn eval(formula: &str) -> Result<()> {
    let value = Sheet::new()
        .evaluate_text(formula)
        .with_context(|| format!("Failed to evaluate '{}'", formula))?;
    println!("{}", value);
    Ok(())
}

fn run(script: &Path, rows: Option<u32>, cols: Option<u32>) -> Result<()> {
    let sheet = load_script(script)?;
    print_grid(&sheet, rows, cols)
}

/// Build a sheet from a script file
fn load_script(script: &Path) -> Result<Sheet> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read '{}'", script.display()))?;

    let mut sheet = Sheet::new();
    apply_script(&mut sheet, &text)
        .with_context(|| format!("Failed to run '{}'", script.display()))?;
    Ok(sheet)
}

/// Apply script lines to a sheet, in order
fn apply_script(sheet: &mut Sheet, text: &str) -> Result<()> {
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        if head.eq_ignore_ascii_case("name") {
            let mut parts = rest.split_whitespace();
            let (Some(name), Some(range), None) = (parts.next(), parts.next(), parts.next()) else {
                bail!("line {}: expected `name <NAME> <A1:B2>`", line_no);
            };
            sheet
                .define_name(name, range)
                .with_context(|| format!("line {}", line_no))?;
            continue;
        }

        let addr = CellAddress::parse(head).with_context(|| format!("line {}", line_no))?;
        let stats = sheet.update_cell(addr, rest);
        log::debug!(
            "line {line_no}: {addr} {:?}, {} recalculated, {} changed",
            stats.outcome,
            stats.cells_recalculated,
            stats.cells_changed
        );
    }

    Ok(())
}

/// The example sheet: numbers, text, a formula chain and an error
fn demo_sheet() -> Sheet {
    let mut sheet = Sheet::new();
    for (row, col, raw) in [
        (0, 0, "10"),
        (0, 1, "20"),
        (0, 2, "=A1+B1"),
        (1, 0, "Hello"),
        (1, 1, "=(2+3)*A1"),
        (1, 2, "=A1/0"),
        (3, 3, "Another cell"),
    ] {
        sheet.update_cell(CellAddress::new(row, col), raw);
    }
    sheet
}

fn print_grid(sheet: &Sheet, rows: Option<u32>, cols: Option<u32>) -> Result<()> {
    let grid = render_grid(sheet, rows, cols);
    io::stdout()
        .write_all(grid.as_bytes())
        .context("Failed to write to stdout")?;
    Ok(())
}

/// Render computed values from A1 to the requested size
///
/// Without explicit sizes the grid extends to the bottom-right of the used
/// range, capped at `DEFAULT_MAX_ROWS` by `DEFAULT_MAX_COLS`.
fn render_grid(sheet: &Sheet, rows: Option<u32>, cols: Option<u32>) -> String {
    let extent = sheet.used_range().map(|range| range.bounds().1);
    let rows = rows.unwrap_or_else(|| {
        default_extent(extent.map(|br| br.row), DEFAULT_MAX_ROWS, "rows")
    });
    let cols = cols.unwrap_or_else(|| {
        default_extent(extent.map(|br| br.col), DEFAULT_MAX_COLS, "columns")
    });
    if rows == 0 || cols == 0 {
        return String::new();
    }

    let header: Vec<String> = (0..cols).map(CellAddress::column_to_letters).collect();
    let body: Vec<Vec<String>> = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| sheet.value(CellAddress::new(row, col)).to_string())
                .collect()
        })
        .collect();

    let label_width = rows.to_string().len();
    let widths: Vec<usize> = (0..cols as usize)
        .map(|c| {
            body.iter()
                .map(|r| r[c].chars().count())
                .chain(std::iter::once(header[c].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, "", label_width, &header, &widths);
    for (i, cells) in body.iter().enumerate() {
        push_row(&mut out, &(i + 1).to_string(), label_width, cells, &widths);
    }
    out
}

/// Number of rows or columns needed to reach `last`, limited to `max`
fn default_extent(last: Option<u32>, max: u32, what: &str) -> u32 {
    let Some(last) = last else {
        return 0;
    };
    let needed = u64::from(last) + 1;
    if needed > u64::from(max) {
        log::warn!("grid truncated to {max} of {needed} {what}; pass --rows/--cols to widen");
        return max;
    }
    last + 1
}

fn push_row(
    out: &mut String,
    label: &str,
    label_width: usize,
    cells: &[String],
    widths: &[usize],
) {
    let mut line = format!("{:>width$}", label, width = label_width);
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(" | ");
        line.push_str(&format!("{:<width$}", cell, width = *width));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
