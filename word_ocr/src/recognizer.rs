//! Reading a single word, and optionally checking it against the word we
//! expected.

use log::debug;
use std::sync::Arc;

use crate::align::{score, Alignment};
use crate::alphabet::Alphabet;
use crate::annotate::annotate;
use crate::classifier::{Classifier, ClassifierRegistry, TimedClassifier};
use crate::compose::{compose, CandidateLattice};
use crate::config::Config;
use crate::errors::{Result, Warning};
use crate::geom::Rect;
use crate::logimg::next_image_id;
use crate::pixmap::Pixmap;

/// A word to read.
#[derive(Clone, Debug)]
pub struct Request {
    /// The prepared word image.
    pub image: Pixmap,
    /// The alphabet the word is written in.
    pub alphabet: Alphabet,
    /// The word we expect to find, if known. An empty word is treated as
    /// unknown.
    pub expected: Option<String>,
    /// How many ranked candidates to ask for per glyph.
    pub candidate_depth: usize,
}

impl Request {
    /// Read `image` in `alphabet`, asking for one candidate per glyph and
    /// without scoring.
    pub fn new(image: Pixmap, alphabet: Alphabet) -> Request {
        Request {
            image,
            alphabet,
            expected: None,
            candidate_depth: 1,
        }
    }

    /// Score the result against `expected`.
    pub fn with_expected<S: Into<String>>(mut self, expected: S) -> Request {
        self.expected = Some(expected.into());
        self
    }

    /// Ask for `depth` candidates per glyph.
    pub fn with_candidate_depth(mut self, depth: usize) -> Request {
        self.candidate_depth = depth;
        self
    }
}

/// How the recognized word compared to the expected one.
#[derive(Clone, Debug)]
pub struct Score {
    /// Did we read the expected word?
    pub correct: bool,
    /// The details of the comparison.
    pub alignment: Alignment,
    /// The input image with wrong glyphs grayed out and missing letters
    /// outlined. Identical to the input when `correct` is set.
    pub annotated: Pixmap,
}

/// The result of reading a word.
#[derive(Clone, Debug)]
pub struct Response {
    /// The top-ranked reading.
    pub word: String,
    /// Every candidate for every glyph.
    pub lattice: CandidateLattice,
    /// Glyph boxes, one per lattice position.
    pub glyphs: Vec<Rect>,
    /// Space boxes around the glyphs.
    pub spaces: Vec<Rect>,
    /// Anything that went wrong without stopping us.
    pub warnings: Vec<Warning>,
    /// Present when an expected word was supplied.
    pub score: Option<Score>,
}

/// Reads words using a fixed set of classifiers. Shared between requests,
/// and never modified once built.
#[derive(Clone, Debug)]
pub struct Recognizer {
    registry: ClassifierRegistry,
    config: Config,
}

impl Recognizer {
    /// Create a recognizer using the classifiers in `registry`.
    pub fn new(registry: ClassifierRegistry, config: Config) -> Recognizer {
        Recognizer { registry, config }
    }

    /// Read the word in `request`.
    pub fn recognize(&self, request: &Request) -> Result<Response> {
        let classifier = self.classifier_for(request.alphabet)?;
        let recognition = compose(
            &request.image,
            classifier.as_ref(),
            request.alphabet.corrector(),
            request.candidate_depth,
            &self.config,
        )?;

        let mut warnings = vec![];
        if recognition.truncated {
            warnings.push(Warning::SegmentationTruncated {
                max_glyphs: self.config.max_glyphs,
            });
        }

        let word = recognition.lattice.best_word();
        let scored = match request.expected.as_deref() {
            Some(expected) if !expected.is_empty() => {
                let alignment = score(expected, &recognition.lattice);
                let annotated = annotate(
                    &request.image,
                    &recognition.glyphs,
                    &recognition.spaces,
                    &alignment,
                );
                debug!(
                    "expected {:?}, read {:?}, correct: {}",
                    expected, word, alignment.correct
                );
                if !alignment.correct {
                    debug_pixmap!(&annotated, "annotated_{:04}.png", next_image_id());
                }
                Some(Score {
                    correct: alignment.correct,
                    alignment,
                    annotated,
                })
            }
            _ => None,
        };

        Ok(Response {
            word,
            lattice: recognition.lattice,
            glyphs: recognition.glyphs,
            spaces: recognition.spaces,
            warnings,
            score: scored,
        })
    }

    /// Look up the classifier for `alphabet`, adding a timeout if we have
    /// one configured.
    fn classifier_for(&self, alphabet: Alphabet) -> Result<Arc<dyn Classifier>> {
        let classifier = self.registry.get(alphabet)?;
        Ok(match self.config.classifier_timeout() {
            Some(timeout) => Arc::new(TimedClassifier::new(Arc::clone(classifier), timeout)),
            None => Arc::clone(classifier),
        })
    }
}
