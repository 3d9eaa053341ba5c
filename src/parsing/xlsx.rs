//! Spreadsheet workbook library tables (xlsx, xls, ods).
//!
//! A workbook must contain two sheets:
//!
//! - `libraries`: one library per row
//! - `parameters`: one free-form parameter per row, with columns
//!   `library_id`, `parameter_name` and `parameter_value`
//!
//! In both sheets the first row holds field names and the second row holds
//! human-readable descriptions, which are skipped. Data starts on the third row.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Reader, Sheets};
use tracing::{debug, warn};

use crate::core::library::{Library, LibraryParams};
use crate::core::table::LibraryTable;
use crate::parsing::LibraryTableError;
use crate::utils::validation::collapse_newlines;

pub const LIBRARIES_SHEET: &str = "libraries";
pub const PARAMETERS_SHEET: &str = "parameters";

/// Rows before the first data row: field names, then descriptions
const HEADER_ROWS: usize = 2;

const PARAM_LIBRARY_ID: &str = "library_id";
const PARAM_NAME: &str = "parameter_name";
const PARAM_VALUE: &str = "parameter_value";

/// Cell text of a sheet, row by row
pub type SheetRows = Vec<Vec<String>>;

fn workbook_error(e: impl std::fmt::Display) -> LibraryTableError {
    LibraryTableError::Workbook(e.to_string())
}

/// Load a library table from a spreadsheet workbook
///
/// # Errors
///
/// Returns `LibraryTableError::FileNotFound` if `path` is not a regular file,
/// `LibraryTableError::Workbook` if the workbook cannot be read,
/// `LibraryTableError::MissingSheet` if either required sheet is absent, or the
/// errors of [`libraries_from_sheets`].
pub fn read_library_table_workbook(path: &Path) -> Result<LibraryTable, LibraryTableError> {
    if !path.is_file() {
        return Err(LibraryTableError::FileNotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;

    let sheet_names = workbook.sheet_names();
    for required in [LIBRARIES_SHEET, PARAMETERS_SHEET] {
        if !sheet_names.iter().any(|name| name == required) {
            return Err(LibraryTableError::MissingSheet(required.to_string()));
        }
    }

    let parameters = sheet_rows(&mut workbook, PARAMETERS_SHEET)?;
    let libraries = sheet_rows(&mut workbook, LIBRARIES_SHEET)?;

    libraries_from_sheets(&libraries, &parameters)
}

fn sheet_rows(
    workbook: &mut Sheets<BufReader<File>>,
    name: &str,
) -> Result<SheetRows, LibraryTableError> {
    let range = workbook.worksheet_range(name).map_err(workbook_error)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect())
}

/// A data row of a sheet as field name to value, with its 1-based row number
fn sheet_records(rows: &[Vec<String>]) -> impl Iterator<Item = (usize, HashMap<String, String>)> + '_ {
    let field_names: &[String] = rows.first().map(Vec::as_slice).unwrap_or_default();

    rows.iter()
        .enumerate()
        .skip(HEADER_ROWS)
        .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(move |(i, row)| {
            let record = field_names
                .iter()
                .zip(row.iter())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name.trim().to_string(), collapse_newlines(value)))
                .collect();
            (i + 1, record)
        })
}

/// Collect the `parameters` sheet into per-library parameter maps
///
/// # Errors
///
/// Returns `LibraryTableError::Workbook` if a required column is missing.
pub fn params_from_sheet(
    rows: &[Vec<String>],
) -> Result<HashMap<String, LibraryParams>, LibraryTableError> {
    let field_names = rows.first().map(Vec::as_slice).unwrap_or_default();
    if !rows.is_empty() {
        for column in [PARAM_LIBRARY_ID, PARAM_NAME, PARAM_VALUE] {
            if !field_names.iter().any(|name| name.trim() == column) {
                return Err(LibraryTableError::Workbook(format!(
                    "'{PARAMETERS_SHEET}' sheet missing '{column}' column"
                )));
            }
        }
    }

    let mut params: HashMap<String, LibraryParams> = HashMap::new();
    for (_, mut record) in sheet_records(rows) {
        let library_id = record.remove(PARAM_LIBRARY_ID).unwrap_or_default();
        let name = record.remove(PARAM_NAME).unwrap_or_default();
        let value = record.remove(PARAM_VALUE).unwrap_or_default();
        params
            .entry(library_id.trim().to_string())
            .or_default()
            .insert(name.trim().to_string(), value);
    }
    Ok(params)
}

/// Build a library table from the cell text of the `libraries` and
/// `parameters` sheets.
///
/// Rows with every cell empty are skipped. Newlines inside cells are
/// collapsed to single spaces.
///
/// # Errors
///
/// Returns `LibraryTableError::InvalidRecord` for a row without a library id,
/// `LibraryTableError::DuplicateLibraryId` if an id repeats, or the errors of
/// [`params_from_sheet`].
pub fn libraries_from_sheets(
    libraries: &[Vec<String>],
    parameters: &[Vec<String>],
) -> Result<LibraryTable, LibraryTableError> {
    let mut params = params_from_sheet(parameters)?;

    let mut table = LibraryTable::new();
    for (row_num, record) in sheet_records(libraries) {
        let library_params = record
            .get("library_id")
            .and_then(|id| params.remove(id.trim()))
            .unwrap_or_default();

        let library = Library::from_fields(&record, library_params).map_err(|e| match e {
            LibraryTableError::MissingField(field) => LibraryTableError::InvalidRecord {
                line: row_num,
                message: format!("'{LIBRARIES_SHEET}' sheet row missing required field '{field}'"),
            },
            other => other,
        })?;
        table.insert(library)?;
    }

    for library_id in params.keys() {
        warn!(library = %library_id, "Parameters given for unknown library");
    }

    debug!(libraries = table.len(), "Loaded workbook library table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FragmentLayout, LibraryType};

    fn sheet(rows: &[&[&str]]) -> SheetRows {
        rows.iter()
            .map(|row| row.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    fn libraries_sheet() -> SheetRows {
        sheet(&[
            &["library_id", "sample_id", "library_type", "read1_files", "read2_files", "description"],
            &["Library ID", "Sample ID", "Strand protocol", "Read 1", "Read 2", "Notes"],
            &["L1", "S1", "fr-firststrand", "a_1.fq", "a_2.fq", "first\nlibrary"],
            &["", "", "", "", "", ""],
            &["L2", "S2", "fr-unstranded", "b.fq", "", ""],
        ])
    }

    fn parameters_sheet() -> SheetRows {
        sheet(&[
            &["library_id", "parameter_name", "parameter_value"],
            &["Library ID", "Name", "Value"],
            &["L1", "adapter", "AGATCGGAAGAGC"],
            &["L1", "min_length", "25"],
            &["L2", "note", "multi\nline"],
        ])
    }

    #[test]
    fn test_libraries_from_sheets() {
        let table = libraries_from_sheets(&libraries_sheet(), &parameters_sheet()).unwrap();
        assert_eq!(table.len(), 2);

        let l1 = table.get("L1").unwrap();
        assert_eq!(l1.sample_id, "S1");
        assert_eq!(l1.library_type, LibraryType::FrFirststrand);
        assert_eq!(l1.fragment_layout(), FragmentLayout::Paired);
        assert_eq!(l1.description, "first library");
        assert_eq!(l1.params.len(), 2);
        assert_eq!(l1.params.get("min_length").unwrap(), "25");

        let l2 = table.get("L2").unwrap();
        assert_eq!(l2.fragment_layout(), FragmentLayout::Single);
        assert_eq!(l2.params.get("note").unwrap(), "multi line");
    }

    #[test]
    fn test_description_row_is_skipped() {
        let libraries = sheet(&[
            &["library_id", "read1_files"],
            &["library_id", "read1_files"],
        ]);
        let table = libraries_from_sheets(&libraries, &parameters_sheet()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_library_id() {
        let libraries = sheet(&[
            &["library_id", "read1_files"],
            &["", ""],
            &["L1", "a.fq"],
            &["L1", "b.fq"],
        ]);
        let err = libraries_from_sheets(&libraries, &[]).unwrap_err();
        assert!(matches!(err, LibraryTableError::DuplicateLibraryId(id) if id == "L1"));
    }

    #[test]
    fn test_missing_library_id_reports_row() {
        let libraries = sheet(&[
            &["library_id", "read1_files"],
            &["", ""],
            &["", "a.fq"],
        ]);
        let err = libraries_from_sheets(&libraries, &[]).unwrap_err();
        assert!(matches!(err, LibraryTableError::InvalidRecord { line: 3, .. }));
    }

    #[test]
    fn test_parameters_sheet_missing_column() {
        let parameters = sheet(&[&["library_id", "parameter_name"], &["", ""]]);
        let err = params_from_sheet(&parameters).unwrap_err();
        assert!(matches!(err, LibraryTableError::Workbook(_)));
    }

    #[test]
    fn test_missing_workbook_file() {
        let err = read_library_table_workbook(Path::new("/no/such/libraries.xlsx")).unwrap_err();
        assert!(matches!(err, LibraryTableError::FileNotFound(_)));
    }
}
