//! Loaders for library tables.
//!
//! A library table describes the sequencing libraries of a study: identifiers,
//! strand protocol, read file paths and free-form per-library parameters.
//! Three source formats are supported:
//!
//! - **Tab-separated text**: header line of field names, one library per line
//! - **XML**: `<library>` elements with one child element per field and
//!   optional `<param name="...">value</param>` children
//! - **Spreadsheet workbooks** (xlsx/xls/ods): a `libraries` sheet and a
//!   `parameters` sheet
//!
//! ## Example
//!
//! ```rust,no_run
//! use libtable::parsing::read_library_table;
//! use std::path::Path;
//!
//! let table = read_library_table(Path::new("libraries.xlsx")).unwrap();
//! for library in table.values() {
//!     println!("{}: {}", library.library_id, library.fragment_layout());
//! }
//! ```
//!
//! ## Library Fields
//!
//! | Field | Description |
//! |-------|-------------|
//! | `study_id`, `cohort_id`, `patient_id`, `sample_id` | Identifiers |
//! | `library_id` | Unique key within a table (required) |
//! | `description`, `species` | Free text |
//! | `library_type` | `fr-firststrand` or `fr-unstranded` |
//! | `read1_files`, `read2_files` | Comma-separated read file paths |
//! | `fragment_layout` | Derived from `read2_files`, ignored on input |

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::table::LibraryTable;

pub mod tsv;
pub mod xlsx;
pub mod xml;

#[derive(Error, Debug)]
pub enum LibraryTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File {} not found or not a regular file", .0.display())]
    FileNotFound(PathBuf),

    #[error("Workbook missing '{0}' sheet")]
    MissingSheet(String),

    #[error("Found duplicate library id {0}")]
    DuplicateLibraryId(String),

    #[error("Library record missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("Invalid XML: {0}")]
    Xml(String),

    #[error("Workbook error: {0}")]
    Workbook(String),
}

/// Source format of a library table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Tsv,
    Xml,
    Workbook,
}

impl TableFormat {
    /// Guess the format from a file extension; anything unrecognized is TSV.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("xls" | "xlsx" | "xlsm" | "xlsb" | "ods") => Self::Workbook,
            Some("xml") => Self::Xml,
            _ => Self::Tsv,
        }
    }
}

/// Load a library table, choosing the loader by file extension
///
/// # Errors
///
/// See [`read_library_table_as`].
pub fn read_library_table(path: &Path) -> Result<LibraryTable, LibraryTableError> {
    read_library_table_as(path, TableFormat::from_path(path))
}

/// Load a library table in the given format
///
/// # Errors
///
/// Returns the errors of the selected loader: `LibraryTableError::Io` or
/// `LibraryTableError::FileNotFound` if the file cannot be read,
/// `LibraryTableError::DuplicateLibraryId` if an id repeats, and format-specific
/// errors for malformed content.
pub fn read_library_table_as(
    path: &Path,
    format: TableFormat,
) -> Result<LibraryTable, LibraryTableError> {
    debug!(path = %path.display(), ?format, "Reading library table");
    match format {
        TableFormat::Tsv => tsv::read_library_table_tsv(path),
        TableFormat::Xml => xml::read_library_table_xml(path),
        TableFormat::Workbook => xlsx::read_library_table_workbook(path),
    }
}
