//! Translation between UCSC (`chr1`, `chrM`) and Ensembl (`1`, `MT`) chromosome names.
//!
//! Only the 25 primary human chromosomes are covered. Anything else is a lookup
//! error; there is no fallback to the input name.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chromosome naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromNaming {
    /// UCSC style: chr1, chr2, ..., chrX, chrY, chrM
    Ucsc,
    /// Ensembl style: 1, 2, ..., X, Y, MT
    Ensembl,
}

impl fmt::Display for ChromNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ucsc => write!(f, "ucsc"),
            Self::Ensembl => write!(f, "ensembl"),
        }
    }
}

impl FromStr for ChromNaming {
    type Err = ChromNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ucsc" => Ok(Self::Ucsc),
            "ensembl" => Ok(Self::Ensembl),
            _ => Err(ChromNameError::UnknownConvention(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChromNameError {
    #[error("Unknown {convention} chromosome name: '{name}'")]
    UnknownChromosome {
        name: String,
        convention: ChromNaming,
    },

    #[error("Unsupported chromosome name conversion: {from} -> {to}")]
    UnsupportedConversion { from: ChromNaming, to: ChromNaming },

    #[error("Unknown chromosome naming convention: '{0}'")]
    UnknownConvention(String),
}

/// (UCSC, Ensembl) name pairs
pub const CHROM_NAME_PAIRS: [(&str, &str); 25] = [
    ("chr1", "1"),
    ("chr2", "2"),
    ("chr3", "3"),
    ("chr4", "4"),
    ("chr5", "5"),
    ("chr6", "6"),
    ("chr7", "7"),
    ("chr8", "8"),
    ("chr9", "9"),
    ("chr10", "10"),
    ("chr11", "11"),
    ("chr12", "12"),
    ("chr13", "13"),
    ("chr14", "14"),
    ("chr15", "15"),
    ("chr16", "16"),
    ("chr17", "17"),
    ("chr18", "18"),
    ("chr19", "19"),
    ("chr20", "20"),
    ("chr21", "21"),
    ("chr22", "22"),
    ("chrX", "X"),
    ("chrY", "Y"),
    ("chrM", "MT"),
];

struct ChromNameTable {
    ucsc_to_ensembl: HashMap<&'static str, &'static str>,
    ensembl_to_ucsc: HashMap<&'static str, &'static str>,
}

static CHROM_NAMES: Lazy<ChromNameTable> = Lazy::new(|| ChromNameTable {
    ucsc_to_ensembl: CHROM_NAME_PAIRS.iter().copied().collect(),
    ensembl_to_ucsc: CHROM_NAME_PAIRS.iter().map(|&(u, e)| (e, u)).collect(),
});

/// Convert a chromosome name from one naming convention to another.
///
/// # Errors
///
/// Returns `ChromNameError::UnsupportedConversion` when `from == to`, or
/// `ChromNameError::UnknownChromosome` if `chrom` is not a known name under `from`.
pub fn convert(
    chrom: &str,
    from: ChromNaming,
    to: ChromNaming,
) -> Result<&'static str, ChromNameError> {
    let table = match (from, to) {
        (ChromNaming::Ucsc, ChromNaming::Ensembl) => &CHROM_NAMES.ucsc_to_ensembl,
        (ChromNaming::Ensembl, ChromNaming::Ucsc) => &CHROM_NAMES.ensembl_to_ucsc,
        _ => return Err(ChromNameError::UnsupportedConversion { from, to }),
    };

    table
        .get(chrom)
        .copied()
        .ok_or_else(|| ChromNameError::UnknownChromosome {
            name: chrom.to_string(),
            convention: from,
        })
}

/// Same as [`convert`], with the conventions given by name (`"ucsc"`, `"ensembl"`).
///
/// # Errors
///
/// Returns `ChromNameError::UnknownConvention` for an unrecognized convention name,
/// otherwise the errors of [`convert`].
pub fn convert_named(chrom: &str, from: &str, to: &str) -> Result<&'static str, ChromNameError> {
    convert(chrom, from.parse()?, to.parse()?)
}

/// Convert a UCSC name (`chr1`) to its Ensembl equivalent (`1`).
///
/// # Errors
///
/// Returns `ChromNameError::UnknownChromosome` for names outside the table.
pub fn ucsc_to_ensembl(chrom: &str) -> Result<&'static str, ChromNameError> {
    convert(chrom, ChromNaming::Ucsc, ChromNaming::Ensembl)
}

/// Convert an Ensembl name (`MT`) to its UCSC equivalent (`chrM`).
///
/// # Errors
///
/// Returns `ChromNameError::UnknownChromosome` for names outside the table.
pub fn ensembl_to_ucsc(chrom: &str) -> Result<&'static str, ChromNameError> {
    convert(chrom, ChromNaming::Ensembl, ChromNaming::Ucsc)
}
