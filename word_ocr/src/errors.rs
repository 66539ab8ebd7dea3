//! Error and warning types for this crate.

use serde::Serialize;
use std::path::PathBuf;
use std::result;
use std::time::Duration;
use thiserror::Error;

/// Our standard result type.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors which can be returned by this crate. Every one of these rejects
/// the request that produced it. Problems which still allow a best-effort
/// answer are reported as a [`Warning`] instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input image cannot be processed.
    #[error("invalid image: {reason}")]
    #[non_exhaustive]
    InvalidImage {
        /// What was wrong with the image.
        reason: String,
    },

    /// We have no alphabet (or no classifier) for this language tag.
    #[error("unsupported alphabet {tag:?}")]
    #[non_exhaustive]
    UnsupportedAlphabet {
        /// The language tag we were given.
        tag: String,
    },

    /// The caller asked for zero candidates per glyph.
    #[error("candidate depth must be at least 1, not {depth}")]
    #[non_exhaustive]
    InvalidCandidateDepth {
        /// The requested depth.
        depth: usize,
    },

    /// The classifier did not answer in time.
    #[error("classifier timed out after {timeout:?} on glyph {glyph}")]
    #[non_exhaustive]
    ClassifierTimeout {
        /// Position of the glyph in the word.
        glyph: usize,
        /// How long we waited.
        timeout: Duration,
    },

    /// The classifier failed or returned something we can't use.
    #[error("classifier failed on glyph {glyph}")]
    #[non_exhaustive]
    Classifier {
        /// Position of the glyph in the word.
        glyph: usize,
        /// The underlying error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A reference glyph could not be used to build a classifier.
    #[error("invalid template {path:?}: {reason}")]
    #[non_exhaustive]
    InvalidTemplate {
        /// The template file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// We could not parse a configuration file.
    #[error("could not parse configuration {path:?}")]
    #[non_exhaustive]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// An I/O error occurred while accessing `path`.
    #[error("could not access {path:?}")]
    #[non_exhaustive]
    Io {
        /// The path we were trying to access.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The `image` library could not decode or encode an image.
    #[error("could not process image {path:?}")]
    #[non_exhaustive]
    Image {
        /// The image file.
        path: PathBuf,
        /// The underlying error.
        source: image::ImageError,
    },
}

impl Error {
    /// Wrap an arbitrary classifier failure. Classifiers don't know where
    /// their glyph sits in the word, so the position is filled in later.
    pub fn classifier<E>(source: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Error::Classifier {
            glyph: 0,
            source: source.into(),
        }
    }

    /// Record which glyph a classifier error belongs to.
    pub(crate) fn at_glyph(self, position: usize) -> Error {
        match self {
            Error::ClassifierTimeout { timeout, .. } => Error::ClassifierTimeout {
                glyph: position,
                timeout,
            },
            Error::Classifier { source, .. } => Error::Classifier {
                glyph: position,
                source,
            },
            other => other,
        }
    }

    pub(crate) fn invalid_image<S: Into<String>>(reason: S) -> Error {
        Error::InvalidImage {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_template<S: Into<String>>(path: PathBuf, reason: S) -> Error {
        Error::InvalidTemplate {
            path,
            reason: reason.into(),
        }
    }
}

/// Conditions which don't stop recognition, but which the caller should
/// know about.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Warning {
    /// The image contained more ink runs than we were willing to treat as
    /// glyphs, so the word was cut short.
    SegmentationTruncated {
        /// The glyph cap that was reached.
        max_glyphs: usize,
    },
}
