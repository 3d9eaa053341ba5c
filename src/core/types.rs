use serde::{Deserialize, Serialize};

/// Strand protocol used to prepare a library
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LibraryType {
    /// dUTP / first-strand directional (`fr-firststrand`)
    FrFirststrand,
    /// Unstranded (`fr-unstranded`)
    FrUnstranded,
    /// Anything else found in a table; kept so validation can report it
    Other(String),
    /// Not given
    #[default]
    Unspecified,
}

impl LibraryType {
    pub const FR_FIRSTSTRAND: &'static str = "fr-firststrand";
    pub const FR_UNSTRANDED: &'static str = "fr-unstranded";

    /// Parse a library type from a table value. Unrecognized values are retained.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" => Self::Unspecified,
            Self::FR_FIRSTSTRAND => Self::FrFirststrand,
            Self::FR_UNSTRANDED => Self::FrUnstranded,
            other => Self::Other(other.to_string()),
        }
    }

    /// True for the strand protocols the pipeline knows how to handle
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::FrFirststrand | Self::FrUnstranded)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::FrFirststrand => Self::FR_FIRSTSTRAND,
            Self::FrUnstranded => Self::FR_UNSTRANDED,
            Self::Other(s) => s,
            Self::Unspecified => "",
        }
    }
}

impl std::fmt::Display for LibraryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for LibraryType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LibraryType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Whether a library was sequenced single-end or paired-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentLayout {
    Single,
    Paired,
}

impl FragmentLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Paired => "paired",
        }
    }
}

impl std::fmt::Display for FragmentLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read end of a paired-end fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadEnd {
    Read1,
    Read2,
}

impl std::fmt::Display for ReadEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read1 => write!(f, "read 1"),
            Self::Read2 => write!(f, "read 2"),
        }
    }
}
