//! One-dimensional darkness profiles of an image, and scanning them for the
//! edges between blank space and ink.
//!
//! A profile value is `255 / mean - 1`, where `mean` is the average
//! intensity of a column or row. A perfectly white line scores exactly `0.0`,
//! and anything darker scores above zero, so "blank" is simply `value == 0.0`.
//! An all-black line has a mean of zero and scores `+inf`, which still counts
//! as ink.

use crate::errors::{Error, Result};
use crate::pixmap::{Pixmap, WHITE};

/// Which way we project the image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    /// One value per column, averaging down each column.
    Horizontal,
    /// One value per row, averaging across each row.
    Vertical,
}

/// Compute the darkness profile of `image` along `axis`.
pub fn profile(image: &Pixmap, axis: Axis) -> Result<Vec<f64>> {
    if image.is_empty() {
        return Err(Error::invalid_image(format!(
            "cannot profile a {}x{} image",
            image.width(),
            image.height()
        )));
    }
    let (len, across) = match axis {
        Axis::Horizontal => (image.width(), image.height()),
        Axis::Vertical => (image.height(), image.width()),
    };
    let mut sums = vec![0u64; len];
    for y in 0..image.height() {
        for (x, &px) in image.row(y).iter().enumerate() {
            let i = match axis {
                Axis::Horizontal => x,
                Axis::Vertical => y,
            };
            sums[i] += u64::from(px);
        }
    }
    Ok(sums
        .into_iter()
        .map(|sum| {
            let mean = sum as f64 / across as f64;
            f64::from(WHITE) / mean - 1.0
        })
        .collect())
}

/// Is this profile value blank?
fn is_blank(value: f64) -> bool {
    value == 0.0
}

/// Scan forward from `start` for the first position whose blankness matches
/// `want_blank`. Returns `None` if we reach the end of the profile first,
/// meaning the current run extends to the edge of the image.
pub fn next_transition(profile: &[f64], start: usize, want_blank: bool) -> Option<usize> {
    profile
        .iter()
        .enumerate()
        .skip(start)
        .find(|&(_, &v)| is_blank(v) == want_blank)
        .map(|(i, _)| i)
}

/// Scan backward from the end of the profile towards `start` for the last
/// position whose blankness matches `want_blank`, and return the index just
/// past it, so it can be used directly as an exclusive bound. Returns `None`
/// if no position at or after `start` matches.
pub fn last_transition(profile: &[f64], start: usize, want_blank: bool) -> Option<usize> {
    if start >= profile.len() {
        return None;
    }
    profile[start..]
        .iter()
        .rposition(|&v| is_blank(v) == want_blank)
        .map(|i| start + i + 1)
}
