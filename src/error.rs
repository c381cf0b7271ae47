//! Crate-level error types.

use std::fmt;

/// Errors produced by the cartovis crate.
#[derive(Debug)]
pub enum CartovisError {
    /// GeoJSON document parsing or shape failure.
    GeoJson(String),
    /// A geometry type the engine does not model.
    UnsupportedGeometry(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for CartovisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeoJson(msg) => write!(f, "geojson error: {msg}"),
            Self::UnsupportedGeometry(kind) => {
                write!(f, "unsupported geometry type: {kind}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for CartovisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CartovisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
