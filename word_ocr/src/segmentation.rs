//! Segmentation of a single line of text into glyph boxes and the spaces
//! between them.
//!
//! We make two passes. The horizontal pass walks the column profile,
//! turning each run of inked columns into a glyph. The vertical pass then
//! looks at just those columns and trims each glyph to the rows containing
//! ink. This assumes that glyphs never overlap horizontally, which holds for
//! block capitals on a clean background but not for joined-up handwriting.

use log::{debug, trace, warn};
use serde::Serialize;
use std::ops::Range;

use crate::errors::Result;
use crate::geom::Rect;
use crate::pixmap::Pixmap;
use crate::profile::{last_transition, next_transition, profile, Axis};

/// The default maximum number of glyphs we'll find in a single image. Noisy
/// input can produce huge numbers of tiny ink runs, and there's no point in
/// classifying them all.
pub const DEFAULT_MAX_GLYPHS: usize = 150;

/// The glyphs and spaces found in an image.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Segmentation {
    /// Glyph boxes in reading order.
    pub glyphs: Vec<Rect>,
    /// Space boxes. There is always exactly one more space than glyphs,
    /// including the margins before the first glyph and after the last.
    pub spaces: Vec<Rect>,
    /// Did we stop early because we hit the glyph cap?
    pub truncated: bool,
}

/// Split `image` into glyphs and spaces, finding at most `max_glyphs`
/// glyphs.
pub fn segment(image: &Pixmap, max_glyphs: usize) -> Result<Segmentation> {
    let profile_h = profile(image, Axis::Horizontal)?;
    let (columns, truncated) = horizontal_runs(&profile_h, max_glyphs);
    if truncated {
        warn!(
            "image contains more than {} glyphs, ignoring the rest",
            max_glyphs
        );
    }

    let glyphs = columns
        .into_iter()
        .map(|cols| vertical_extent(image, cols))
        .collect::<Result<Vec<_>>>()?;
    trace!("glyph boxes: {:?}", glyphs);

    let spaces = spaces_for(&glyphs, image.width(), image.height());
    debug!(
        "segmented {}x{} image into {} glyphs",
        image.width(),
        image.height(),
        glyphs.len()
    );
    Ok(Segmentation {
        glyphs,
        spaces,
        truncated,
    })
}

/// Find runs of inked columns. Returns the runs, and whether we stopped
/// because we reached `max_glyphs` with ink still remaining.
fn horizontal_runs(profile_h: &[f64], max_glyphs: usize) -> (Vec<Range<usize>>, bool) {
    let width = profile_h.len();
    let mut runs = vec![];
    let mut cursor = 0;
    while cursor < width && runs.len() < max_glyphs {
        let ink_start = match next_transition(profile_h, cursor, false) {
            Some(i) => i,
            None => break,
        };
        // Ink running off the right edge of the image ends there.
        let blank_start = next_transition(profile_h, ink_start, true).unwrap_or(width);
        runs.push(ink_start..blank_start);
        cursor = blank_start + 1;
    }
    let truncated = runs.len() >= max_glyphs
        && cursor < width
        && next_transition(profile_h, cursor, false).is_some();
    (runs, truncated)
}

/// Build a glyph box for `columns`, trimmed vertically to the inked rows.
fn vertical_extent(image: &Pixmap, columns: Range<usize>) -> Result<Rect> {
    let height = image.height();
    let strip = image.crop(&Rect::ltrb(columns.start, 0, columns.end, height));
    let profile_v = profile(&strip, Axis::Vertical)?;
    let low = next_transition(&profile_v, 0, false).unwrap_or(0);
    // Ink touching the bottom edge ends there.
    let high = last_transition(&profile_v, low, false)
        .filter(|&high| high != low)
        .unwrap_or(height);
    Ok(Rect::ltrb(columns.start, low, columns.end, high))
}

/// Derive the space boxes surrounding `glyphs` in an image of the given
/// size.
///
/// Space `i` runs from the right edge of glyph `i - 1` (or the left edge of
/// the image) to the left edge of glyph `i` (or the right edge of the
/// image), and uses the vertical extent of glyph `i` (or of the last glyph,
/// for the trailing space). Each space overlaps its neighbouring glyphs by
/// one pixel, so markers drawn around a space don't clip anti-aliased glyph
/// edges. With no glyphs, the single space covers the whole image.
pub fn spaces_for(glyphs: &[Rect], width: usize, height: usize) -> Vec<Rect> {
    let last = match glyphs.last() {
        Some(last) => last,
        None => return vec![Rect::ltrb(0, 0, width, height)],
    };
    let mut spaces = Vec::with_capacity(glyphs.len() + 1);
    let mut left = 0;
    for glyph in glyphs {
        spaces.push(Rect::ltrb(left, glyph.top(), glyph.left() + 1, glyph.bottom()));
        left = glyph.right() - 1;
    }
    spaces.push(Rect::ltrb(left, last.top(), width, last.bottom()));
    spaces
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::{bars_image, pixmap_from_rows};
    use quickcheck::{quickcheck, Arbitrary, Gen};

    #[test]
    fn blank_image_has_one_space() {
        let seg = segment(&Pixmap::blank(20, 8), DEFAULT_MAX_GLYPHS).unwrap();
        assert!(seg.glyphs.is_empty());
        assert_eq!(seg.spaces, vec![Rect::ltrb(0, 0, 20, 8)]);
        assert!(!seg.truncated);
    }

    #[test]
    fn finds_glyph_boxes_and_spaces() {
        let image = pixmap_from_rows(&[
            "..........",
            ".##...#...",
            ".##..###..",
            "......#...",
            "..........",
        ]);
        let seg = segment(&image, DEFAULT_MAX_GLYPHS).unwrap();
        assert_eq!(
            seg.glyphs,
            vec![Rect::ltrb(1, 1, 3, 3), Rect::ltrb(5, 1, 8, 4)]
        );
        assert_eq!(
            seg.spaces,
            vec![
                Rect::ltrb(0, 1, 2, 3),
                Rect::ltrb(2, 1, 6, 4),
                Rect::ltrb(7, 1, 10, 4),
            ]
        );
    }

    #[test]
    fn glyph_touching_edges_is_clamped() {
        let image = pixmap_from_rows(&["...#", "..##", "..##"]);
        let seg = segment(&image, DEFAULT_MAX_GLYPHS).unwrap();
        assert_eq!(seg.glyphs, vec![Rect::ltrb(2, 0, 4, 3)]);
        assert_eq!(seg.spaces.len(), 2);
        assert_eq!(seg.spaces[1], Rect::ltrb(3, 0, 4, 3));
    }

    #[test]
    fn ink_in_first_column_is_a_glyph() {
        let image = pixmap_from_rows(&["#..#", "#..#"]);
        let seg = segment(&image, DEFAULT_MAX_GLYPHS).unwrap();
        assert_eq!(
            seg.glyphs,
            vec![Rect::ltrb(0, 0, 1, 2), Rect::ltrb(3, 0, 4, 2)]
        );
    }

    #[test]
    fn single_blank_column_separates_glyphs() {
        let image = pixmap_from_rows(&["#.#.#"]);
        let seg = segment(&image, DEFAULT_MAX_GLYPHS).unwrap();
        assert_eq!(seg.glyphs.len(), 3);
    }

    #[test]
    fn glyph_cap_truncates() {
        let bars = (0..10).map(|i| (1 + 3 * i, 2)).collect::<Vec<_>>();
        let image = bars_image(32, 6, &bars);
        let seg = segment(&image, 4).unwrap();
        assert_eq!(seg.glyphs.len(), 4);
        assert_eq!(seg.spaces.len(), 5);
        assert!(seg.truncated);

        let seg = segment(&image, 10).unwrap();
        assert_eq!(seg.glyphs.len(), 10);
        assert!(!seg.truncated);
    }

    /// A random image made of vertical bars, which is enough to exercise the
    /// horizontal pass.
    #[derive(Clone, Debug)]
    struct BarsImage(Pixmap);

    impl Arbitrary for BarsImage {
        fn arbitrary(g: &mut Gen) -> Self {
            let width = 1 + usize::arbitrary(g) % 40;
            let height = 1 + usize::arbitrary(g) % 8;
            let inked = (0..width).map(|_| bool::arbitrary(g)).collect::<Vec<_>>();
            BarsImage(Pixmap::from_fn(width, height, |x, _| {
                if inked[x] {
                    0
                } else {
                    0xff
                }
            }))
        }
    }

    quickcheck! {
        fn one_more_space_than_glyphs(image: BarsImage) -> bool {
            let seg = segment(&image.0, DEFAULT_MAX_GLYPHS).unwrap();
            seg.spaces.len() == seg.glyphs.len() + 1
        }

        fn glyphs_are_ordered_and_disjoint(image: BarsImage) -> bool {
            let seg = segment(&image.0, DEFAULT_MAX_GLYPHS).unwrap();
            seg.glyphs.windows(2).all(|w| w[0].right() < w[1].left())
                && seg.glyphs.iter().all(|g| {
                    !g.is_empty() && g.right() <= image.0.width()
                        && g.bottom() <= image.0.height()
                })
        }

        fn never_more_glyphs_than_cap(image: BarsImage, cap: u8) -> bool {
            let cap = usize::from(cap % 8);
            let seg = segment(&image.0, cap).unwrap();
            seg.glyphs.len() <= cap
        }
    }
}
