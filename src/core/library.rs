use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::core::types::{FragmentLayout, LibraryType, ReadEnd};
use crate::parsing::LibraryTableError;
use crate::utils::validation::{find_sequence_file, split_file_list};

/// Per-library free-form parameters, keyed by parameter name
pub type LibraryParams = BTreeMap<String, String>;

/// A problem found while validating a library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryIssue {
    #[error("Invalid library type '{0}'")]
    UnknownLibraryType(String),

    #[error("No read 1 files listed")]
    NoRead1Files,

    #[error("{read} file {path} not found")]
    MissingReadFile { read: ReadEnd, path: String },

    #[error("Unequal number of read 1 ({read1}) and read 2 ({read2}) files")]
    UnequalReadCounts { read1: usize, read2: usize },
}

/// One sequencing library from a library table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Library {
    pub study_id: String,
    pub cohort_id: String,
    pub patient_id: String,
    pub sample_id: String,

    /// Unique key within a table
    pub library_id: String,

    pub description: String,
    pub species: String,

    /// Strand protocol
    pub library_type: LibraryType,

    /// Read 1 file paths, in order
    pub read1_files: Vec<String>,

    /// Read 2 file paths, in order. Empty for single-end libraries.
    pub read2_files: Vec<String>,

    /// Free-form parameters scoped to this library
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: LibraryParams,
}

impl Library {
    /// Field names of a library record, in table order
    pub const FIELDS: [&'static str; 11] = [
        "study_id",
        "cohort_id",
        "patient_id",
        "sample_id",
        "library_id",
        "description",
        "species",
        "library_type",
        "read1_files",
        "read2_files",
        "fragment_layout",
    ];

    pub fn new(library_id: impl Into<String>) -> Self {
        Self {
            library_id: library_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_library_type(mut self, library_type: LibraryType) -> Self {
        self.library_type = library_type;
        self
    }

    #[must_use]
    pub fn with_read_files<S: Into<String>>(
        mut self,
        read1: impl IntoIterator<Item = S>,
        read2: impl IntoIterator<Item = S>,
    ) -> Self {
        self.read1_files = read1.into_iter().map(Into::into).collect();
        self.read2_files = read2.into_iter().map(Into::into).collect();
        self
    }

    /// Build a library from a raw record of field name to value.
    ///
    /// Names not in [`Library::FIELDS`] are ignored, as is `fragment_layout`,
    /// which is always derived from the read 2 files. Read file fields are
    /// comma-separated lists.
    ///
    /// # Errors
    ///
    /// Returns `LibraryTableError::MissingField` if `library_id` is absent or empty.
    pub fn from_fields(
        fields: &HashMap<String, String>,
        params: LibraryParams,
    ) -> Result<Self, LibraryTableError> {
        let get = |name: &str| fields.get(name).map(|v| v.trim().to_string()).unwrap_or_default();

        let library_id = get("library_id");
        if library_id.is_empty() {
            return Err(LibraryTableError::MissingField("library_id"));
        }

        Ok(Self {
            study_id: get("study_id"),
            cohort_id: get("cohort_id"),
            patient_id: get("patient_id"),
            sample_id: get("sample_id"),
            library_id,
            description: get("description"),
            species: get("species"),
            library_type: LibraryType::parse(&get("library_type")),
            read1_files: split_file_list(&get("read1_files")),
            read2_files: split_file_list(&get("read2_files")),
            params,
        })
    }

    /// Build a library from values in [`Library::FIELDS`] order, for rows
    /// without a header. Missing trailing values are empty.
    ///
    /// # Errors
    ///
    /// See [`Library::from_fields`].
    pub fn from_values<S: AsRef<str>>(
        values: &[S],
        params: LibraryParams,
    ) -> Result<Self, LibraryTableError> {
        let fields: HashMap<String, String> = Library::FIELDS
            .iter()
            .zip(values)
            .map(|(name, value)| ((*name).to_string(), value.as_ref().to_string()))
            .collect();
        Self::from_fields(&fields, params)
    }

    /// JSON object of every field, including the derived `fragment_layout`
    ///
    /// # Errors
    ///
    /// Returns an error if a field fails to serialize.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "fragment_layout".to_string(),
                serde_json::to_value(self.fragment_layout())?,
            );
        }
        Ok(value)
    }

    /// Paired if and only if read 2 files are listed
    #[must_use]
    pub fn fragment_layout(&self) -> FragmentLayout {
        if self.read2_files.is_empty() {
            FragmentLayout::Single
        } else {
            FragmentLayout::Paired
        }
    }

    /// Text value of a field as it appears in a table.
    ///
    /// Read file lists are joined with commas. Returns `None` for unknown names.
    pub fn field_value(&self, name: &str) -> Option<String> {
        let value = match name {
            "study_id" => self.study_id.clone(),
            "cohort_id" => self.cohort_id.clone(),
            "patient_id" => self.patient_id.clone(),
            "sample_id" => self.sample_id.clone(),
            "library_id" => self.library_id.clone(),
            "description" => self.description.clone(),
            "species" => self.species.clone(),
            "library_type" => self.library_type.to_string(),
            "read1_files" => self.read1_files.join(","),
            "read2_files" => self.read2_files.join(","),
            "fragment_layout" => self.fragment_layout().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Check the library against the recognized strand protocols and the filesystem.
    ///
    /// All problems are collected; checking does not stop at the first one.
    ///
    /// # Errors
    ///
    /// Returns `LibraryTableError::Io` if a read file cannot be checked for a
    /// reason other than it not existing.
    pub fn validate(&self) -> Result<Vec<LibraryIssue>, LibraryTableError> {
        let mut issues = Vec::new();

        if !self.library_type.is_recognized() {
            issues.push(LibraryIssue::UnknownLibraryType(
                self.library_type.to_string(),
            ));
        }

        if self.read1_files.is_empty() {
            issues.push(LibraryIssue::NoRead1Files);
        }
        check_read_files(ReadEnd::Read1, &self.read1_files, &mut issues)?;

        if self.fragment_layout() == FragmentLayout::Paired {
            check_read_files(ReadEnd::Read2, &self.read2_files, &mut issues)?;

            if self.read1_files.len() != self.read2_files.len() {
                issues.push(LibraryIssue::UnequalReadCounts {
                    read1: self.read1_files.len(),
                    read2: self.read2_files.len(),
                });
            }
        }

        Ok(issues)
    }

    /// Validate and log every problem found.
    ///
    /// # Errors
    ///
    /// See [`Library::validate`].
    pub fn is_valid(&self) -> Result<bool, LibraryTableError> {
        let issues = self.validate()?;
        for issue in &issues {
            error!(library = %self.library_id, "{issue}");
        }
        Ok(issues.is_empty())
    }
}

fn check_read_files(
    read: ReadEnd,
    files: &[String],
    issues: &mut Vec<LibraryIssue>,
) -> Result<(), LibraryTableError> {
    for path in files {
        if find_sequence_file(Path::new(path))?.is_none() {
            issues.push(LibraryIssue::MissingReadFile {
                read,
                path: path.clone(),
            });
        }
    }
    Ok(())
}
