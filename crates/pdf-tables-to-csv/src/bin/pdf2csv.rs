use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdf_tables_to_csv::{
    Conversion, ConvertOptions, CsvExport, DEFAULT_PAGE_NUMBER, Flavor, PageSpec, ReadOptions,
    convert_pdf_file, read_pdf, stage_upload, write_csv,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2csv",
    version,
    about = "Extract tables from text PDFs into CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract one table (or all pages combined) and write it as CSV.
    Extract(ExtractArgs),
    /// List the tables detected on the selected pages.
    List(ListArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path, or `-` to read the PDF from stdin.
    #[arg(short, long)]
    input: PathBuf,

    /// Convert all pages into one continuous CSV.
    #[arg(short, long)]
    continuous: bool,

    /// Page to extract from, e.g. 3. Ignored with --continuous.
    #[arg(short, long, default_value = DEFAULT_PAGE_NUMBER)]
    page: String,

    /// Zero-based index of the table to export from the page.
    #[arg(short, long, default_value_t = 0)]
    table: usize,

    /// Directory the CSV file is written to.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip printing the table preview.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Page selection like `all`, `1-3,5` or `2-end`.
    #[arg(long, default_value = "all")]
    pages: String,

    /// Detection strategy.
    #[arg(long, default_value_t = Flavor::Stream)]
    flavor: Flavor,
}

fn resolve_input(input: &Path) -> Result<PathBuf> {
    if input != Path::new("-") {
        return Ok(input.to_path_buf());
    }

    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("failed to read PDF from stdin")?;
    stage_upload(&std::env::temp_dir(), &bytes).context("failed to stage PDF from stdin")
}

fn render_preview(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0_usize; width];
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (row_index, row) in rows.iter().enumerate() {
        out.push_str(&format!("{row_index:>4} "));
        let cells = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

fn write_export(export: &CsvExport, output_dir: &Path, quiet: bool) -> Result<()> {
    let path = output_dir.join(&export.file_name);
    write_csv(&path, &export.rows)
        .with_context(|| format!("failed to write '{}'", path.display()))?;

    if !quiet {
        print!("{}", render_preview(&export.rows));
    }
    eprintln!("wrote {}", path.display());
    Ok(())
}

/// Returns `false` when no tables were found.
fn run_extract(args: &ExtractArgs) -> Result<bool> {
    let input = resolve_input(&args.input)?;
    let options = ConvertOptions {
        continuous: args.continuous,
        page_number: args.page.clone(),
        table_index: args.table,
    };

    let conversion = convert_pdf_file(&input, &options)
        .with_context(|| format!("failed to extract tables from '{}'", input.display()))?;

    match conversion {
        Conversion::NoTables { message } => {
            eprintln!("{message}");
            Ok(false)
        }
        Conversion::Continuous(continuous) => {
            eprintln!(
                "combined {} table(s) into {} row(s)",
                continuous.source_tables,
                continuous.export.rows.len()
            );
            write_export(&continuous.export, &args.output_dir, args.quiet)?;
            Ok(true)
        }
        Conversion::SinglePage(single) => {
            eprintln!("{}", single.summary());
            write_export(&single.export, &args.output_dir, args.quiet)?;
            Ok(true)
        }
    }
}

fn run_list(args: &ListArgs) -> Result<bool> {
    let pages = args
        .pages
        .parse::<PageSpec>()
        .context("failed to parse --pages")?;
    let options = ReadOptions {
        pages,
        flavor: args.flavor,
        ..ReadOptions::default()
    };

    let tables = read_pdf(&args.input, &options)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))?;

    println!("index  page  order  shape     accuracy  whitespace");
    for (index, table) in tables.iter().enumerate() {
        let (rows, cols) = table.shape();
        println!(
            "{index:<6} {:<5} {:<6} {:<9} {:<9.1} {:.1}",
            table.page,
            table.order,
            format!("{rows}x{cols}"),
            table.report.accuracy,
            table.report.whitespace
        );
    }
    Ok(!tables.is_empty())
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdf_tables_to_csv=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::List(args) => run_list(args),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(error) => {
            eprintln!("Error processing the PDF: {error:#}");
            ExitCode::from(1)
        }
    }
}
