//! # libtable
//!
//! Configuration-table ingestion for RNA-seq pipelines.
//!
//! A library table lists the sequencing libraries of a study: study, patient
//! and sample identifiers, the strand protocol, read file paths, and free-form
//! per-library parameters. `libtable` loads such tables from tab-separated
//! text, XML, or spreadsheet workbooks and checks each library against the
//! filesystem before a pipeline run.
//!
//! It also translates chromosome names between the UCSC (`chr1`) and
//! Ensembl (`1`) conventions.
//!
//! ## Example
//!
//! ```rust,no_run
//! use libtable::parsing::read_library_table;
//! use libtable::core::naming::ensembl_to_ucsc;
//! use std::path::Path;
//!
//! let mut table = read_library_table(Path::new("libraries.xlsx")).unwrap();
//!
//! // Drop libraries with unknown strand protocols or missing read files
//! let excluded = table.retain_valid().unwrap();
//! println!("{} libraries ready, {} excluded", table.len(), excluded.len());
//!
//! assert_eq!(ensembl_to_ucsc("MT").unwrap(), "chrM");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Library records, tables, and chromosome naming
//! - [`parsing`]: Loaders for TSV, XML and workbook tables, and the XML writer
//! - [`utils`]: Read file resolution and cell helpers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::library::{Library, LibraryIssue, LibraryParams};
pub use core::naming::{convert, ChromNameError, ChromNaming};
pub use core::table::LibraryTable;
pub use core::types::*;
pub use parsing::{read_library_table, LibraryTableError};
