//! Centralized helpers for checking library metadata against the filesystem.

use std::io;
use std::path::{Path, PathBuf};

/// Suffix tried when a read file is listed without its compression extension
pub const GZIP_SUFFIX: &str = ".gz";

/// Resolve a read file path to an existing regular file.
///
/// Candidates are tried in order:
/// 1. the path as given
/// 2. the path with `.gz` appended
/// 3. the path with its last extension removed
///
/// Returns `Ok(None)` if none of them exist.
///
/// # Examples
///
/// ```no_run
/// use libtable::utils::validation::find_sequence_file;
/// use std::path::Path;
///
/// // Finds "reads_1.fq.gz" when only the compressed file is on disk
/// let found = find_sequence_file(Path::new("reads_1.fq")).unwrap();
/// ```
///
/// # Errors
///
/// Returns the underlying I/O error for failures other than "not found"
/// (e.g. permission denied on a parent directory).
pub fn find_sequence_file(path: &Path) -> io::Result<Option<PathBuf>> {
    for candidate in sequence_file_candidates(path) {
        if is_regular_file(&candidate)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

fn sequence_file_candidates(path: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![path.to_path_buf()];

    let mut gz = path.as_os_str().to_owned();
    gz.push(GZIP_SUFFIX);
    candidates.push(PathBuf::from(gz));

    if path.extension().is_some() {
        candidates.push(path.with_extension(""));
    }

    candidates
}

fn is_regular_file(path: &Path) -> io::Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Split a comma-separated list of file paths.
///
/// Items are trimmed and empty items dropped, so `""` yields an empty list.
#[must_use]
pub fn split_file_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Collapse embedded newlines in a spreadsheet cell to single spaces.
#[must_use]
pub fn collapse_newlines(s: &str) -> String {
    s.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_list() {
        assert_eq!(split_file_list("a.fq,b.fq"), vec!["a.fq", "b.fq"]);
        assert_eq!(split_file_list(" a.fq , b.fq "), vec!["a.fq", "b.fq"]);
        assert!(split_file_list("").is_empty());
        assert_eq!(split_file_list("a.fq,,"), vec!["a.fq"]);
    }

    #[test]
    fn test_collapse_newlines() {
        assert_eq!(collapse_newlines("line one\nline two"), "line one line two");
        assert_eq!(collapse_newlines("no newline"), "no newline");
        assert_eq!(collapse_newlines("a\n\nb"), "a  b");
    }

    #[test]
    fn test_sequence_file_candidates() {
        let candidates = sequence_file_candidates(Path::new("/data/reads.txt"));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/data/reads.txt"),
                PathBuf::from("/data/reads.txt.gz"),
                PathBuf::from("/data/reads"),
            ]
        );

        let candidates = sequence_file_candidates(Path::new("/data/reads"));
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_find_sequence_file_missing() {
        let found = find_sequence_file(Path::new("/definitely/not/a/real/file.fq")).unwrap();
        assert!(found.is_none());
    }
}
