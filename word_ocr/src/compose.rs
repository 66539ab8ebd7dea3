//! Turning a word image into ranked guesses for each of its letters.

use log::{debug, trace};
use serde::Serialize;

use crate::alphabet::Corrector;
use crate::classifier::Classifier;
use crate::config::Config;
use crate::errors::{Error, Result};
use crate::geom::Rect;
use crate::logimg::next_image_id;
use crate::normalize::normalize_glyph;
use crate::pixmap::Pixmap;
use crate::segmentation::{segment, spaces_for};

/// Ranked candidate labels for each glyph position in a word. Every
/// position has the same number of candidates, best first.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CandidateLattice {
    positions: Vec<Vec<char>>,
}

impl CandidateLattice {
    /// Build a lattice from per-position candidate lists. Panics if the
    /// lists don't all have the same non-zero length.
    pub fn new(positions: Vec<Vec<char>>) -> CandidateLattice {
        if let Some(first) = positions.first() {
            assert!(!first.is_empty(), "lattice positions must not be empty");
            assert!(
                positions.iter().all(|p| p.len() == first.len()),
                "lattice positions must have equal depth"
            );
        }
        CandidateLattice { positions }
    }

    /// The number of glyph positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Did we find no glyphs at all?
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The number of candidates at each position, or 0 for an empty lattice.
    pub fn depth(&self) -> usize {
        self.positions.first().map_or(0, Vec::len)
    }

    /// The ranked candidates for position `i`.
    pub fn get(&self, i: usize) -> Option<&[char]> {
        self.positions.get(i).map(Vec::as_slice)
    }

    /// Iterate over the ranked candidates for each position.
    pub fn positions(&self) -> impl Iterator<Item = &[char]> + '_ {
        self.positions.iter().map(Vec::as_slice)
    }

    /// The top-ranked label at each position.
    pub fn best(&self) -> Vec<char> {
        self.positions.iter().map(|p| p[0]).collect()
    }

    /// The word formed by the top-ranked labels.
    pub fn best_word(&self) -> String {
        self.best().into_iter().collect()
    }
}

/// Everything we learned while reading a word.
#[derive(Clone, Debug, PartialEq)]
pub struct Recognition {
    /// Candidate labels for each glyph.
    pub lattice: CandidateLattice,
    /// Glyph boxes, one per lattice position.
    pub glyphs: Vec<Rect>,
    /// Space boxes around the glyphs.
    pub spaces: Vec<Rect>,
    /// Did segmentation stop at the glyph cap?
    pub truncated: bool,
}

/// Segment `image`, normalize each glyph, and ask `classifier` for
/// `candidate_depth` ranked labels per glyph, fixing up the results with
/// `corrector`.
///
/// Any classifier failure abandons the whole word.
pub fn compose(
    image: &Pixmap,
    classifier: &dyn Classifier,
    corrector: Corrector,
    candidate_depth: usize,
    config: &Config,
) -> Result<Recognition> {
    if candidate_depth == 0 {
        return Err(Error::InvalidCandidateDepth {
            depth: candidate_depth,
        });
    }

    let segmentation = segment(image, config.max_glyphs)?;
    let image_id = next_image_id();
    debug_pixmap!(image, "word_{:04}.png", image_id);

    let mut positions: Vec<Vec<char>> = Vec::with_capacity(segmentation.glyphs.len());
    let mut glyphs: Vec<Rect> = Vec::with_capacity(segmentation.glyphs.len());
    for (i, rect) in segmentation.glyphs.iter().enumerate() {
        let glyph = normalize_glyph(&image.crop(rect), config.glyph_size, config.resize_filter);
        trace_pixmap!(&glyph, "word_{:04}_glyph_{:03}.png", image_id, i);

        let ranked = classifier
            .classify(&glyph, candidate_depth)
            .map_err(|err| err.at_glyph(i))?;
        if ranked.len() != candidate_depth {
            return Err(Error::classifier(format!(
                "classifier returned {} labels, expected {}",
                ranked.len(),
                candidate_depth
            ))
            .at_glyph(i));
        }
        trace!("glyph {} at {:?}: {:?}", i, rect, ranked);

        let previous = positions.last().map(|p| p[0]);
        let correction = corrector.correct(ranked, previous);
        if correction.merge_with_previous && !positions.is_empty() {
            trace!("merging glyph {} into the one before it", i);
            let last = positions.len() - 1;
            positions[last] = correction.ranked;
            glyphs[last] = glyphs[last].union(rect);
        } else {
            positions.push(correction.ranked);
            glyphs.push(*rect);
        }
    }

    let spaces = if glyphs.len() == segmentation.glyphs.len() {
        segmentation.spaces
    } else {
        spaces_for(&glyphs, image.width(), image.height())
    };
    let lattice = CandidateLattice::new(positions);
    debug!(
        "read {:?} from {} glyphs",
        lattice.best_word(),
        lattice.len()
    );
    Ok(Recognition {
        lattice,
        glyphs,
        spaces,
        truncated: segmentation.truncated,
    })
}
