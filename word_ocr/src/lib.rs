//! This crate reads single words from images of block capitals, and checks
//! them against the word we expected to see. It's intended for marking
//! handwriting exercises, where we want to show a student exactly which
//! letters were misread and where letters were left out.
//!
//! ## Example code
//!
//! ```
//! use std::sync::Arc;
//! use word_ocr::{
//!     Alphabet, Classifier, ClassifierRegistry, Config, Pixmap, Recognizer, Request, Result,
//! };
//!
//! // Any function from a glyph to ranked labels can be a classifier.
//! let classifier: Arc<dyn Classifier> =
//!     Arc::new(|_: &Pixmap, k: usize| -> Result<Vec<char>> { Ok(vec!['I'; k]) });
//! let registry = ClassifierRegistry::new().with_classifier(Alphabet::Latin, classifier);
//! let recognizer = Recognizer::new(registry, Config::default());
//!
//! // Two vertical bars.
//! let image = Pixmap::from_fn(12, 8, |x, y| {
//!     if (2..6).contains(&y) && (x == 3 || x == 7) { 0 } else { 255 }
//! });
//! let request = Request::new(image, Alphabet::Latin).with_expected("IT");
//! let response = recognizer.recognize(&request).unwrap();
//! assert_eq!(response.word, "II");
//!
//! let score = response.score.unwrap();
//! assert!(!score.correct);
//! assert_eq!(score.alignment.wrong_glyphs(), vec![1]);
//! ```
//!
//! ## How it works
//!
//! 1. [`prepare`] converts a decoded image to dark-on-white grayscale.
//! 2. [`segment`] splits it into glyph boxes and the spaces between them,
//!    using column and row intensity profiles.
//! 3. [`normalize_glyph`] crops each glyph to its ink and centres it on a
//!    fixed-size square.
//! 4. A [`Classifier`] ranks candidate labels for each glyph, and the
//!    alphabet's [`Corrector`] fixes up known confusions. [`compose`] runs
//!    steps 2 to 4 and builds a [`CandidateLattice`].
//! 5. [`score`] compares the lattice to the expected word, and [`annotate`]
//!    marks up the image.
//!
//! [`Recognizer`] wraps all of this up for a single request.
//!
//! ## Debugging
//!
//! If `RUST_LOG_IMAGE_DIR` is set, intermediate images are written to that
//! directory whenever the corresponding log level is enabled: input words
//! and annotations at `debug`, individual glyphs at `trace`.

#![warn(missing_docs)]

#[macro_use]
mod logimg;

mod align;
mod alphabet;
mod annotate;
mod classifier;
mod compose;
mod config;
mod errors;
mod geom;
mod normalize;
mod pixmap;
mod preprocess;
mod profile;
mod recognizer;
mod segmentation;
#[cfg(test)]
mod test_util;

pub use self::align::{align_words, matching_blocks, score, Alignment, MatchingBlock};
pub use self::alphabet::{Alphabet, Correction, Corrector};
pub use self::annotate::{annotate, gray_out, outline};
pub use self::classifier::{
    Classifier, ClassifierRegistry, TemplateClassifier, TimedClassifier, UNKNOWN_LABEL,
};
pub use self::compose::{compose, CandidateLattice, Recognition};
pub use self::config::Config;
pub use self::errors::{Error, Result, Warning};
pub use self::geom::Rect;
pub use self::normalize::{
    crop_to_ink, normalize_glyph, pad_to_square, ResizeFilter, DEFAULT_GLYPH_SIZE,
};
pub use self::pixmap::{Pixmap, BLACK, WHITE};
pub use self::preprocess::prepare;
pub use self::profile::{last_transition, next_transition, profile, Axis};
pub use self::recognizer::{Recognizer, Request, Response, Score};
pub use self::segmentation::{segment, spaces_for, Segmentation, DEFAULT_MAX_GLYPHS};
