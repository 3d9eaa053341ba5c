//! Command-line interface for libtable.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **validate**: Load a library table and check every library
//! - **export**: Convert a library table to XML, TSV or JSON
//! - **chrom**: Convert chromosome names between UCSC and Ensembl conventions
//!
//! ## Usage
//!
//! ```text
//! # Check that strand protocols are known and read files exist
//! libtable validate libraries.xlsx
//!
//! # JSON report for scripting
//! libtable validate libraries.xml --format json
//!
//! # Convert a workbook to XML
//! libtable export libraries.xlsx --output libraries.xml
//!
//! # Chromosome names
//! libtable chrom 1 X MT --from ensembl --to ucsc
//! ```

use clap::{Parser, Subcommand};

use crate::parsing::TableFormat;

pub mod chrom;
pub mod export;
pub mod validate;

#[derive(Parser)]
#[command(name = "libtable")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Load and validate RNA-seq library tables")]
#[command(
    long_about = "libtable reads library tables describing RNA-seq sequencing libraries.\n\nTables may be tab-separated text, XML, or spreadsheet workbooks with 'libraries' and 'parameters' sheets. It can:\n- Check strand protocols and read file existence for every library\n- Convert tables between formats\n- Translate chromosome names between UCSC and Ensembl conventions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the libraries in a library table
    Validate(validate::ValidateArgs),

    /// Convert a library table to another format
    Export(export::ExportArgs),

    /// Convert chromosome names between naming conventions
    Chrom(chrom::ChromArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Library table format, overriding detection by file extension
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InputFormat {
    Tsv,
    Xml,
    Workbook,
}

impl From<InputFormat> for TableFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Tsv => TableFormat::Tsv,
            InputFormat::Xml => TableFormat::Xml,
            InputFormat::Workbook => TableFormat::Workbook,
        }
    }
}
