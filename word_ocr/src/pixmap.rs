//! Grayscale pixmaps, which are what every stage of our pipeline consumes
//! and produces.

use image::{GrayImage, Luma};
use std::fmt;

use crate::geom::Rect;

/// The intensity of an untouched background pixel.
pub const WHITE: u8 = 0xff;

/// The intensity of solid ink.
pub const BLACK: u8 = 0x00;

/// A single-channel image. Values range from `BLACK` to `WHITE`, and we
/// assume dark text on a light background.
#[derive(Clone, Eq, PartialEq)]
pub struct Pixmap {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Pixmap {
    /// Make sure that these specified image size is legal.
    fn size_check(width: usize, height: usize) {
        let max_dim = u32::MAX as usize;
        if width > max_dim || height > max_dim {
            panic!("image dimensions {}x{} are too large", width, height);
        }
        if width.checked_mul(height).is_none() {
            panic!("image area {}x{} is too large", width, height);
        }
    }

    /// Create a new `Pixmap` filled with `WHITE`.
    pub fn blank(width: usize, height: usize) -> Pixmap {
        Pixmap::size_check(width, height);
        Pixmap {
            data: vec![WHITE; width * height],
            width,
            height,
        }
    }

    /// Create a new `Pixmap` by calling `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Pixmap
    where
        F: FnMut(usize, usize) -> u8,
    {
        let mut pixmap = Pixmap::blank(width, height);
        for y in 0..height {
            for x in 0..width {
                pixmap.data[y * width + x] = f(x, y);
            }
        }
        pixmap
    }

    /// If `x` and `y` do not fit within the pixmap, panic.
    fn bounds_check(&self, x: usize, y: usize) {
        if x >= self.width {
            panic!("out of bounds x: {} width: {}", x, self.width);
        }
        if y >= self.height {
            panic!("out of bounds y: {} height: {}", y, self.height);
        }
    }

    /// The width of the `Pixmap`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The height of the `Pixmap`.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Does this pixmap contain no pixels at all?
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// A rectangle covering the whole pixmap.
    pub fn bounds(&self) -> Rect {
        Rect::ltwh(0, 0, self.width, self.height)
    }

    /// Get the pixel at `x` and `y`, or panic if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.bounds_check(x, y);
        self.data[y * self.width + x]
    }

    /// Get a mutable reference to the pixel at `x` and `y`, or panic if
    /// out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut u8 {
        self.bounds_check(x, y);
        &mut self.data[y * self.width + x]
    }

    /// Iterate over all the pixels in an image, in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().copied()
    }

    /// The pixels in row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        if y >= self.height {
            panic!("out of bounds y: {} height: {}", y, self.height);
        }
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Copy out the part of this image covered by `rect`. Panics if `rect`
    /// extends past our edges.
    pub fn crop(&self, rect: &Rect) -> Pixmap {
        assert!(
            rect.right() <= self.width && rect.bottom() <= self.height,
            "crop {:?} outside {}x{} image",
            rect,
            self.width,
            self.height,
        );
        let mut data = Vec::with_capacity(rect.width() * rect.height());
        for y in rect.vertical_range() {
            let start = y * self.width;
            data.extend_from_slice(&self.data[start + rect.left()..start + rect.right()]);
        }
        Pixmap {
            data,
            width: rect.width(),
            height: rect.height(),
        }
    }

    /// Copy `src` into this image with its top-left corner at `x`, `y`.
    /// Panics if `src` doesn't fit.
    pub fn blit(&mut self, src: &Pixmap, x: usize, y: usize) {
        assert!(
            x + src.width <= self.width && y + src.height <= self.height,
            "cannot blit {}x{} at ({}, {}) into {}x{}",
            src.width,
            src.height,
            x,
            y,
            self.width,
            self.height,
        );
        for sy in 0..src.height {
            let dst_start = (y + sy) * self.width + x;
            self.data[dst_start..dst_start + src.width].copy_from_slice(src.row(sy));
        }
    }

    /// Transform each pixel of the image.
    pub fn map<F>(&self, f: F) -> Pixmap
    where
        F: Fn(u8) -> u8,
    {
        Pixmap {
            data: self.data.iter().map(|p| f(*p)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Convert to an `image::GrayImage`, so we can use the `image` and
    /// `imageproc` libraries on it.
    pub fn to_image(&self) -> GrayImage {
        // `size_check` guarantees that both dimensions fit in a `u32`.
        GrayImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .expect("pixmap buffer does not match its dimensions")
    }
}

impl From<GrayImage> for Pixmap {
    fn from(image: GrayImage) -> Pixmap {
        let width = image.width() as usize;
        let height = image.height() as usize;
        Pixmap {
            data: image.into_raw(),
            width,
            height,
        }
    }
}

/// Build a `Luma` pixel.
pub(crate) fn luma(v: u8) -> Luma<u8> {
    Luma([v])
}

impl fmt::Debug for Pixmap {
    /// Dump small images as ASCII art, which makes test failures much easier
    /// to read.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pixmap {}x{}", self.width, self.height)?;
        if self.width * self.height > 64 * 64 {
            return Ok(());
        }
        for y in 0..self.height {
            for &px in self.row(y) {
                let c = match px {
                    WHITE => '.',
                    BLACK => '#',
                    _ => '+',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
