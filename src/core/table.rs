use std::collections::btree_map::{self, BTreeMap};

use tracing::{debug, warn};

use crate::core::library::Library;
use crate::parsing::LibraryTableError;

/// Libraries of one loaded table, keyed by library id
///
/// Tables are built once per load and never updated in place; reload the
/// source to pick up changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryTable {
    libraries: BTreeMap<String, Library>,
}

impl LibraryTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a sequence of libraries, failing on the first repeated id.
    ///
    /// # Errors
    ///
    /// Returns `LibraryTableError::DuplicateLibraryId` for a repeated id, or the
    /// first error yielded by `libraries`.
    pub fn try_from_libraries<I>(libraries: I) -> Result<Self, LibraryTableError>
    where
        I: IntoIterator<Item = Result<Library, LibraryTableError>>,
    {
        let mut table = Self::new();
        for library in libraries {
            table.insert(library?)?;
        }
        debug!(libraries = table.len(), "Loaded library table");
        Ok(table)
    }

    /// Add a library.
    ///
    /// # Errors
    ///
    /// Returns `LibraryTableError::DuplicateLibraryId` if the id is already present.
    pub fn insert(&mut self, library: Library) -> Result<(), LibraryTableError> {
        match self.libraries.entry(library.library_id.clone()) {
            btree_map::Entry::Occupied(entry) => {
                Err(LibraryTableError::DuplicateLibraryId(entry.key().clone()))
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(library);
                Ok(())
            }
        }
    }

    pub fn get(&self, library_id: &str) -> Option<&Library> {
        self.libraries.get(library_id)
    }

    pub fn contains(&self, library_id: &str) -> bool {
        self.libraries.contains_key(library_id)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Iterate over (library id, library) in id order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Library> {
        self.libraries.iter()
    }

    pub fn values(&self) -> btree_map::Values<'_, String, Library> {
        self.libraries.values()
    }

    /// Validate every library, logging each problem.
    ///
    /// Returns the ids of the libraries that failed validation.
    ///
    /// # Errors
    ///
    /// Returns `LibraryTableError::Io` if the filesystem cannot be queried.
    pub fn validate_all(&self) -> Result<Vec<String>, LibraryTableError> {
        let mut invalid = Vec::new();
        for library in self.values() {
            if !library.is_valid()? {
                invalid.push(library.library_id.clone());
            }
        }
        Ok(invalid)
    }

    /// Drop every library that fails validation and return their ids.
    ///
    /// # Errors
    ///
    /// Returns `LibraryTableError::Io` if the filesystem cannot be queried; the
    /// table is left unchanged in that case.
    pub fn retain_valid(&mut self) -> Result<Vec<String>, LibraryTableError> {
        let invalid = self.validate_all()?;
        for library_id in &invalid {
            warn!(library = %library_id, "Excluding invalid library");
            self.libraries.remove(library_id);
        }
        Ok(invalid)
    }
}

impl IntoIterator for LibraryTable {
    type Item = (String, Library);
    type IntoIter = btree_map::IntoIter<String, Library>;

    fn into_iter(self) -> Self::IntoIter {
        self.libraries.into_iter()
    }
}

impl<'a> IntoIterator for &'a LibraryTable {
    type Item = (&'a String, &'a Library);
    type IntoIter = btree_map::Iter<'a, String, Library>;

    fn into_iter(self) -> Self::IntoIter {
        self.libraries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LibraryType;

    #[test]
    fn test_insert_and_get() {
        let mut table = LibraryTable::new();
        table.insert(Library::new("L2")).unwrap();
        table.insert(Library::new("L1")).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.contains("L1"));
        assert_eq!(table.get("L2").unwrap().library_id, "L2");
        assert!(table.get("L3").is_none());

        let ids: Vec<&String> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["L1", "L2"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut table = LibraryTable::new();
        table.insert(Library::new("L1")).unwrap();
        let err = table.insert(Library::new("L1")).unwrap_err();
        assert!(matches!(err, LibraryTableError::DuplicateLibraryId(id) if id == "L1"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_try_from_libraries_aborts_on_duplicate() {
        let libraries = vec![
            Ok(Library::new("L1")),
            Ok(Library::new("L2")),
            Ok(Library::new("L1")),
        ];
        let result = LibraryTable::try_from_libraries(libraries);
        assert!(matches!(
            result,
            Err(LibraryTableError::DuplicateLibraryId(_))
        ));
    }

    #[test]
    fn test_retain_valid() {
        let mut table = LibraryTable::new();
        table
            .insert(
                Library::new("L1")
                    .with_library_type(LibraryType::FrFirststrand)
                    .with_read_files(["/no/such/file.fq"], []),
            )
            .unwrap();

        let dropped = table.retain_valid().unwrap();
        assert_eq!(dropped, vec!["L1"]);
        assert!(table.is_empty());
    }
}
