use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{InputFormat, OutputFormat};
use crate::core::library::{Library, LibraryIssue};
use crate::parsing::{self, TableFormat};

#[derive(Args)]
pub struct ValidateArgs {
    /// Library table (TSV, XML, or xlsx/xls/ods workbook)
    #[arg(required = true)]
    pub table: PathBuf,

    /// Table format (detected from the file extension by default)
    #[arg(long)]
    pub input_format: Option<InputFormat>,

    /// Exit successfully even when some libraries fail validation
    #[arg(long)]
    pub allow_invalid: bool,
}

struct LibraryReport<'a> {
    library: &'a Library,
    issues: Vec<LibraryIssue>,
}

/// Execute validate subcommand
///
/// # Errors
///
/// Returns an error if the table cannot be loaded, the filesystem cannot be
/// queried, or any library is invalid and `--allow-invalid` was not given.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ValidateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let table_format = args
        .input_format
        .map_or_else(|| TableFormat::from_path(&args.table), TableFormat::from);
    let table = parsing::read_library_table_as(&args.table, table_format)
        .with_context(|| format!("Failed to load library table {}", args.table.display()))?;

    if verbose {
        eprintln!(
            "Loaded {} libraries from {} ({:?})",
            table.len(),
            args.table.display(),
            table_format
        );
    }

    let mut reports = Vec::with_capacity(table.len());
    for library in table.values() {
        let issues = library.validate()?;
        reports.push(LibraryReport { library, issues });
    }

    match format {
        OutputFormat::Text => print_text_report(&reports),
        OutputFormat::Json => print_json_report(&args, &reports)?,
        OutputFormat::Tsv => print_tsv_report(&reports),
    }

    let invalid = reports.iter().filter(|r| !r.issues.is_empty()).count();
    if invalid > 0 && !args.allow_invalid {
        anyhow::bail!("{invalid} of {} libraries failed validation", reports.len());
    }

    Ok(())
}

fn print_text_report(reports: &[LibraryReport<'_>]) {
    println!("Library Validation");
    println!("{}", "=".repeat(60));

    for report in reports {
        let library = report.library;
        let status = if report.issues.is_empty() { "OK" } else { "INVALID" };
        println!("\n{} [{status}]", library.library_id);
        println!("  Sample: {}", library.sample_id);
        println!("  Library type: {}", library.library_type);
        println!("  Fragment layout: {}", library.fragment_layout());
        println!(
            "  Read files: {} read 1, {} read 2",
            library.read1_files.len(),
            library.read2_files.len()
        );
        if !library.params.is_empty() {
            println!("  Parameters: {}", library.params.len());
        }
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }

    let valid = reports.iter().filter(|r| r.issues.is_empty()).count();
    println!("\n{valid} of {} libraries valid", reports.len());
}

fn print_json_report(args: &ValidateArgs, reports: &[LibraryReport<'_>]) -> anyhow::Result<()> {
    let libraries: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| {
            serde_json::json!({
                "library": report.library,
                "fragment_layout": report.library.fragment_layout(),
                "valid": report.issues.is_empty(),
                "issues": report.issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "table": args.table.display().to_string(),
        "library_count": reports.len(),
        "valid_count": reports.iter().filter(|r| r.issues.is_empty()).count(),
        "libraries": libraries,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(reports: &[LibraryReport<'_>]) {
    println!("library_id\tlibrary_type\tfragment_layout\tread1_count\tread2_count\tvalid\tissues");
    for report in reports {
        let library = report.library;
        let issues: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            library.library_id,
            library.library_type,
            library.fragment_layout(),
            library.read1_files.len(),
            library.read2_files.len(),
            report.issues.is_empty(),
            issues.join("; "),
        );
    }
}
