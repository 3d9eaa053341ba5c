use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::core::library::{Library, LibraryParams};
use crate::core::table::LibraryTable;
use crate::parsing::LibraryTableError;

/// Forward-only reader over a tab-separated library table.
///
/// The first line names the fields; each later line is one library. Columns
/// whose name is not a library field are ignored. Tab-separated tables carry
/// no free-form parameters.
///
/// The reader is consumed by iteration; reopen the source to read it again.
pub struct LibraryTsvReader<R> {
    lines: std::io::Lines<R>,
    header: Option<Vec<String>>,
    line_num: usize,
}

impl<R: BufRead> LibraryTsvReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            header: None,
            line_num: 0,
        }
    }

    /// Field names from the header line, once it has been read
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    fn next_line(&mut self) -> Option<Result<String, LibraryTableError>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_num += 1;
            let line = line.trim_end_matches('\r');
            if !line.trim().is_empty() {
                return Some(Ok(line.to_string()));
            }
        }
    }
}

impl LibraryTsvReader<BufReader<File>> {
    /// Open a table file for reading.
    ///
    /// # Errors
    ///
    /// Returns `LibraryTableError::Io` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, LibraryTableError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for LibraryTsvReader<R> {
    type Item = Result<Library, LibraryTableError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.header.is_none() {
            let header = match self.next_line()? {
                Ok(line) => line.split('\t').map(|s| s.trim().to_string()).collect(),
                Err(e) => return Some(Err(e)),
            };
            self.header = Some(header);
        }

        let line = match self.next_line()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };

        let header = self.header.as_deref().unwrap_or_default();
        let values: Vec<&str> = line.split('\t').collect();

        // Short rows are padded with empty values so trailing empty columns survive
        let record: HashMap<String, String> = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = values.get(i).copied().unwrap_or_default();
                (name.clone(), value.to_string())
            })
            .collect();

        let line_num = self.line_num;
        Some(
            Library::from_fields(&record, LibraryParams::new()).map_err(|e| match e {
                LibraryTableError::MissingField(field) => LibraryTableError::InvalidRecord {
                    line: line_num,
                    message: format!("missing required field '{field}'"),
                },
                other => other,
            }),
        )
    }
}

/// Load a tab-separated library table from a file
///
/// # Errors
///
/// Returns `LibraryTableError::Io` if the file cannot be read,
/// `LibraryTableError::InvalidRecord` for a row without a library id, or
/// `LibraryTableError::DuplicateLibraryId` if an id repeats.
pub fn read_library_table_tsv(path: &Path) -> Result<LibraryTable, LibraryTableError> {
    LibraryTable::try_from_libraries(LibraryTsvReader::open(path)?)
}

/// Load a tab-separated library table from text
///
/// # Errors
///
/// See [`read_library_table_tsv`].
pub fn parse_library_table_tsv_text(text: &str) -> Result<LibraryTable, LibraryTableError> {
    LibraryTable::try_from_libraries(LibraryTsvReader::new(text.as_bytes()))
}

/// Serialize a table as tab-separated text with a header of all library fields.
///
/// Tab-separated tables cannot hold free-form parameters; they are dropped with
/// a warning. Tabs and newlines inside values are replaced by spaces.
#[must_use]
pub fn write_library_table_tsv(table: &LibraryTable) -> String {
    let mut out = Library::FIELDS.join("\t");
    out.push('\n');

    for library in table.values() {
        if !library.params.is_empty() {
            warn!(
                library = %library.library_id,
                params = library.params.len(),
                "Parameters cannot be written to a tab-separated table, dropping"
            );
        }
        let row: Vec<String> = Library::FIELDS
            .iter()
            .map(|field| {
                library
                    .field_value(field)
                    .unwrap_or_default()
                    .replace(['\t', '\n', '\r'], " ")
            })
            .collect();
        out.push_str(&row.join("\t"));
        out.push('\n');
    }

    out
}
