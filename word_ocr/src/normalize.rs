//! Normalizing glyph images into the fixed-size squares our classifiers
//! expect.
//!
//! The exact pixels matter here. A classifier trained on glyphs centred one
//! way will see a shifted distribution if they're centred another way, so
//! the rounding and resampling rules below are part of the contract.

use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::geom::Rect;
use crate::pixmap::Pixmap;
use crate::profile::{last_transition, next_transition, profile, Axis};

/// The default side length of a normalized glyph.
pub const DEFAULT_GLYPH_SIZE: u32 = 32;

/// Resampling method used when scaling glyphs.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Triangle,
    /// Cubic interpolation.
    CatmullRom,
    /// Gaussian filtering.
    Gaussian,
    /// Lanczos with a window of 3.
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> FilterType {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Crop `image` to the smallest rectangle containing all of its ink. A
/// completely blank image is returned unchanged.
pub fn crop_to_ink(image: &Pixmap) -> Pixmap {
    match ink_bounds(image) {
        Some(rect) => image.crop(&rect),
        None => image.clone(),
    }
}

/// The smallest rectangle containing all the ink in `image`, if any.
fn ink_bounds(image: &Pixmap) -> Option<Rect> {
    // An empty image has no profile, and certainly no ink.
    let profile_h = profile(image, Axis::Horizontal).ok()?;
    let profile_v = profile(image, Axis::Vertical).ok()?;
    let left = next_transition(&profile_h, 0, false)?;
    let right = last_transition(&profile_h, left, false)?;
    let top = next_transition(&profile_v, 0, false)?;
    let bottom = last_transition(&profile_v, top, false)?;
    Some(Rect::ltrb(left, top, right, bottom))
}

/// Centre `image` on a white square canvas whose side is the larger of its
/// width and height, then scale it to `target_size` square if
/// `target_size > 0`.
///
/// The shorter dimension is offset by `(side - shorter) / 2`, rounding
/// down, so odd differences leave one more pixel of padding on the
/// bottom or right than on the top or left. An image which is already
/// `target_size` square is returned as-is, which makes this idempotent.
pub fn pad_to_square(image: &Pixmap, target_size: u32, filter: ResizeFilter) -> Pixmap {
    let (width, height) = (image.width(), image.height());
    let side = width.max(height);
    let squared = if width == height {
        image.clone()
    } else {
        let mut canvas = Pixmap::blank(side, side);
        if height > width {
            canvas.blit(image, (side - width) / 2, 0);
        } else {
            canvas.blit(image, 0, (side - height) / 2);
        }
        canvas
    };

    let target = target_size as usize;
    if target == 0 || side == target {
        squared
    } else if side == 0 {
        Pixmap::blank(target, target)
    } else {
        let resized =
            imageops::resize(&squared.to_image(), target_size, target_size, filter.into());
        Pixmap::from(resized)
    }
}

/// The full glyph pipeline: crop to the ink, then pad and scale.
pub fn normalize_glyph(glyph: &Pixmap, target_size: u32, filter: ResizeFilter) -> Pixmap {
    pad_to_square(&crop_to_ink(glyph), target_size, filter)
}
