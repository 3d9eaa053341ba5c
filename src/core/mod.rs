//! Core data types for library tables and chromosome naming.
//!
//! - [`Library`](library::Library): one sequencing library with identifiers,
//!   strand protocol, read files and free-form parameters
//! - [`LibraryTable`](table::LibraryTable): libraries of one table keyed by id
//! - [`LibraryType`](types::LibraryType), [`FragmentLayout`](types::FragmentLayout):
//!   protocol classification
//! - [`naming`]: conversion between chromosome naming conventions
//!
//! ## Chromosome Naming
//!
//! | Convention | Chromosome 1 | Mitochondrial |
//! |------------|--------------|---------------|
//! | UCSC       | chr1         | chrM          |
//! | Ensembl    | 1            | MT            |

pub mod library;
pub mod naming;
pub mod table;
pub mod types;
