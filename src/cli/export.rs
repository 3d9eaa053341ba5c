use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{InputFormat, OutputFormat};
use crate::core::library::Library;
use crate::parsing::{self, tsv, xml, TableFormat};

/// Format of an exported library table
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Xml,
    Tsv,
    Json,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Library table (TSV, XML, or xlsx/xls/ods workbook)
    #[arg(required = true)]
    pub table: PathBuf,

    /// Table format (detected from the file extension by default)
    #[arg(long)]
    pub input_format: Option<InputFormat>,

    /// Format to write
    #[arg(long, value_enum, default_value = "xml")]
    pub to: ExportFormat,

    /// Output file (stdout if not given)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute export subcommand
///
/// # Errors
///
/// Returns an error if the table cannot be loaded, serialized, or written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExportArgs, _format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let table_format = args
        .input_format
        .map_or_else(|| TableFormat::from_path(&args.table), TableFormat::from);
    let table = parsing::read_library_table_as(&args.table, table_format)
        .with_context(|| format!("Failed to load library table {}", args.table.display()))?;

    let content = match args.to {
        ExportFormat::Xml => xml::write_library_table_xml(&table)?,
        ExportFormat::Tsv => tsv::write_library_table_tsv(&table),
        ExportFormat::Json => {
            let libraries = table
                .values()
                .map(Library::to_json)
                .collect::<Result<Vec<_>, _>>()?;
            let mut json = serde_json::to_string_pretty(&libraries)?;
            json.push('\n');
            json
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if verbose {
                eprintln!(
                    "Wrote {} libraries to {} ({:?})",
                    table.len(),
                    path.display(),
                    args.to
                );
            }
        }
        None => print!("{content}"),
    }

    Ok(())
}
