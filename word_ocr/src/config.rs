//! Tunable settings for the recognition pipeline.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::errors::{Error, Result};
use crate::normalize::{ResizeFilter, DEFAULT_GLYPH_SIZE};
use crate::segmentation::DEFAULT_MAX_GLYPHS;

/// Pipeline settings. Every field has a default, so a configuration file
/// only needs to mention what it changes.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The most glyphs we'll look for in one image.
    pub max_glyphs: usize,
    /// The side of the square glyph images we hand to the classifier, or 0
    /// to leave glyphs at their natural size.
    pub glyph_size: u32,
    /// How we resample glyphs to `glyph_size`.
    pub resize_filter: ResizeFilter,
    /// Binarize input images using Otsu's threshold.
    pub binarize: bool,
    /// Give up on any glyph the classifier spends longer than this on.
    pub classifier_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_glyphs: DEFAULT_MAX_GLYPHS,
            glyph_size: DEFAULT_GLYPH_SIZE,
            resize_filter: ResizeFilter::default(),
            binarize: false,
            classifier_timeout_ms: None,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })
    }

    /// The per-glyph classifier timeout, if any.
    pub fn classifier_timeout(&self) -> Option<Duration> {
        self.classifier_timeout_ms.map(Duration::from_millis)
    }
}
