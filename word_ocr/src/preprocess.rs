//! Turning a decoded image into the dark-on-white grayscale `Pixmap` the
//! rest of the pipeline expects.

use image::{DynamicImage, GrayImage};
use imageproc::contrast::otsu_level;
use log::debug;

use crate::errors::{Error, Result};
use crate::pixmap::{Pixmap, BLACK, WHITE};

/// Images with a mean intensity below this are assumed to be light text on
/// a dark background.
const DARK_BACKGROUND_MEAN: f64 = 128.0;

/// Convert `image` to grayscale, flattening any transparency onto white,
/// inverting light-on-dark images, and optionally binarizing with Otsu's
/// threshold.
pub fn prepare(image: &DynamicImage, binarize: bool) -> Result<Pixmap> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::invalid_image(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let mut gray = if image.color().has_alpha() {
        flatten_onto_white(image)
    } else {
        image.to_luma8()
    };

    let mean = mean_intensity(&gray);
    if mean < DARK_BACKGROUND_MEAN {
        debug!("mean intensity {:.1}, inverting image", mean);
        image::imageops::invert(&mut gray);
    }

    if binarize {
        let level = otsu_level(&gray);
        debug!("binarizing with threshold {}", level);
        for px in gray.pixels_mut() {
            px.0[0] = if px.0[0] > level { WHITE } else { BLACK };
        }
    }

    Ok(Pixmap::from(gray))
}

/// Composite a partially transparent image over a white background.
fn flatten_onto_white(image: &DynamicImage) -> GrayImage {
    let with_alpha = image.to_luma_alpha8();
    GrayImage::from_fn(with_alpha.width(), with_alpha.height(), |x, y| {
        let [l, a] = with_alpha.get_pixel(x, y).0;
        let (l, a) = (u32::from(l), u32::from(a));
        let v = (l * a + u32::from(WHITE) * (255 - a) + 127) / 255;
        image::Luma([v as u8])
    })
}

fn mean_intensity(gray: &GrayImage) -> f64 {
    let total: u64 = gray.pixels().map(|px| u64::from(px.0[0])).sum();
    total as f64 / (f64::from(gray.width()) * f64::from(gray.height()))
}
