//! Comparing a recognized word against the word we expected to see.
//!
//! When the lengths agree we compare position by position, accepting any
//! candidate in a position's ranked list. When they differ we line the two
//! words up using the same block-matching algorithm as Python's `difflib`
//! (without its junk heuristics), which tells us both which glyphs are wrong
//! and where letters appear to be missing.

use serde::Serialize;

use crate::compose::CandidateLattice;

/// A run of `size` equal items, starting at `a` in the first sequence and
/// `b` in the second.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct MatchingBlock {
    /// Start in the first sequence.
    pub a: usize,
    /// Start in the second sequence.
    pub b: usize,
    /// Number of matching items.
    pub size: usize,
}

/// Find the longest run common to `a[alo..ahi]` and `b[blo..bhi]`. Of the
/// longest runs, we return the one starting earliest in `a`, and then the
/// one starting earliest in `b`.
fn longest_match<T: Eq>(
    a: &[T],
    b: &[T],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> MatchingBlock {
    let mut best = MatchingBlock {
        a: alo,
        b: blo,
        size: 0,
    };
    // `prev[j - blo + 1]` is the length of the run ending at `a[i - 1]` and
    // `b[j]`. Slot 0 is always zero.
    let mut prev = vec![0; bhi - blo + 1];
    let mut cur = vec![0; bhi - blo + 1];
    for i in alo..ahi {
        for j in blo..bhi {
            let k = if a[i] == b[j] { prev[j - blo] + 1 } else { 0 };
            cur[j - blo + 1] = k;
            if k > best.size {
                best = MatchingBlock {
                    a: i + 1 - k,
                    b: j + 1 - k,
                    size: k,
                };
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

/// Find the blocks of items which `a` and `b` have in common, by taking the
/// longest common run and then recursing on either side of it.
///
/// Blocks are returned in increasing order, adjacent blocks are merged, and
/// the list always ends with a zero-sized block at `(a.len(), b.len())`.
pub fn matching_blocks<T: Eq>(a: &[T], b: &[T]) -> Vec<MatchingBlock> {
    let mut queue = vec![((0, a.len()), (0, b.len()))];
    let mut found = vec![];
    while let Some(((alo, ahi), (blo, bhi))) = queue.pop() {
        let m = longest_match(a, b, (alo, ahi), (blo, bhi));
        if m.size == 0 {
            continue;
        }
        found.push(m);
        if alo < m.a && blo < m.b {
            queue.push(((alo, m.a), (blo, m.b)));
        }
        if m.a + m.size < ahi && m.b + m.size < bhi {
            queue.push(((m.a + m.size, ahi), (m.b + m.size, bhi)));
        }
    }
    found.sort_by_key(|m| (m.a, m.b));

    let mut blocks: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
    for m in found {
        match blocks.last_mut() {
            Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => {
                last.size += m.size;
            }
            _ => blocks.push(m),
        }
    }
    blocks.push(MatchingBlock {
        a: a.len(),
        b: b.len(),
        size: 0,
    });
    blocks
}

/// How a recognized word lines up with the expected one.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Alignment {
    /// Did we read the expected word? Only possible when the lengths agree.
    pub correct: bool,
    /// One flag per recognized glyph, set if that glyph is wrong.
    pub predicted_mismatch: Vec<bool>,
    /// One flag per expected letter, set if no recognized glyph accounts
    /// for it.
    pub expected_unmatched: Vec<bool>,
    /// Indices into the space sequence where letters appear to be missing.
    pub missing_gaps: Vec<usize>,
}

impl Alignment {
    /// The positions of the glyphs we got wrong.
    pub fn wrong_glyphs(&self) -> Vec<usize> {
        self.predicted_mismatch
            .iter()
            .enumerate()
            .filter(|&(_, &wrong)| wrong)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Score `lattice` against `expected`.
pub fn score(expected: &str, lattice: &CandidateLattice) -> Alignment {
    let expected = expected.chars().collect::<Vec<_>>();
    if expected.len() == lattice.len() {
        // A letter counts as read if it appears anywhere in the candidates.
        let mismatch = expected
            .iter()
            .zip(lattice.positions())
            .map(|(c, candidates)| !candidates.contains(c))
            .collect::<Vec<_>>();
        Alignment {
            correct: !mismatch.iter().any(|&m| m),
            expected_unmatched: mismatch.clone(),
            predicted_mismatch: mismatch,
            missing_gaps: vec![],
        }
    } else {
        align_words(&expected, &lattice.best())
    }
}

/// Line up two words of different lengths. Never `correct`.
pub fn align_words(expected: &[char], predicted: &[char]) -> Alignment {
    // For each expected letter, the recognized glyph it matched, if any.
    let mut partner = vec![None; expected.len()];
    let mut predicted_mismatch = vec![true; predicted.len()];
    for block in matching_blocks(expected, predicted) {
        for offset in 0..block.size {
            partner[block.a + offset] = Some(block.b + offset);
            predicted_mismatch[block.b + offset] = false;
        }
    }

    // A run of missing letters goes in the space after the glyph matching
    // the letter before the run, or in the leading space.
    let mut missing_gaps = vec![];
    for i in 0..expected.len() {
        if partner[i].is_some() {
            continue;
        }
        if i == 0 {
            missing_gaps.push(0);
        } else if let Some(p) = partner[i - 1] {
            missing_gaps.push(p + 1);
        }
    }

    Alignment {
        correct: false,
        predicted_mismatch,
        expected_unmatched: partner.iter().map(Option::is_none).collect(),
        missing_gaps,
    }
}
