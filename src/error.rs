//! # Error Types
//!
//! This module defines error types used throughout the comicgen library.
//!
//! Only some of these are fatal. `Corpus`, `Geometry`, `Input`, `Image` and
//! `Output` abort the run; `FontUnavailable` and `RegionMeasurement` are
//! produced by collaborators and recovered from (fallback font, neutral
//! text color) by the pipeline.

use thiserror::Error;

/// Main error type for comicgen operations
#[derive(Debug, Error)]
pub enum ComicError {
    /// No usable chain could be built (or walked) for a character
    #[error("Corpus error for '{character}': {reason}")]
    Corpus { character: String, reason: String },

    /// Malformed word-bubble script
    #[error("Bubble geometry error: {0}")]
    Geometry(String),

    /// A font could not be loaded at the requested size
    #[error("Font unavailable: {0}")]
    FontUnavailable(String),

    /// Mean color of a region could not be computed
    #[error("Region measurement error: {0}")]
    RegionMeasurement(String),

    /// Missing or unreadable input (directories, scripts, page images)
    #[error("Input error: {0}")]
    Input(String),

    /// Image decoding/encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// An output path can't be written (e.g. it names a directory)
    #[error("Output error: {0}")]
    Output(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ComicError {
    pub(crate) fn corpus(character: &str, reason: impl Into<String>) -> Self {
        ComicError::Corpus {
            character: character.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error, following `sysexits.h`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ComicError::Corpus { .. } | ComicError::Geometry(_) => EX_DATAERR,
            ComicError::Input(_) => EX_NOINPUT,
            ComicError::Image(_) | ComicError::Output(_) | ComicError::Io(_) => EX_CANTCREAT,
            ComicError::FontUnavailable(_) | ComicError::RegionMeasurement(_) => EX_SOFTWARE,
        }
    }
}

/// Command line usage error
pub const EX_USAGE: i32 = 64;
/// Data format error
pub const EX_DATAERR: i32 = 65;
/// Input not openable
pub const EX_NOINPUT: i32 = 66;
/// Internal software error
pub const EX_SOFTWARE: i32 = 70;
/// Can't create output file
pub const EX_CANTCREAT: i32 = 73;

pub type Result<T, E = ComicError> = std::result::Result<T, E>;
