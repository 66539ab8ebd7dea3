//! Marking up a word image to show where recognition went wrong.

use imageproc::drawing::draw_hollow_rect_mut;

use crate::align::Alignment;
use crate::geom::Rect;
use crate::pixmap::{luma, Pixmap, BLACK};

/// Fade everything inside `rect` halfway towards white, so ink becomes
/// mid-gray and the background stays white.
pub fn gray_out(image: &mut Pixmap, rect: &Rect) {
    for y in rect.vertical_range() {
        for x in rect.horizontal_range() {
            let px = image.get_mut(x, y);
            *px = 128 + *px / 2;
        }
    }
}

/// Draw a one-pixel black outline around `rect`.
pub fn outline(image: &mut Pixmap, rect: &Rect) {
    if rect.is_empty() {
        return;
    }
    let mut canvas = image.to_image();
    let outline = imageproc::rect::Rect::at(rect.left() as i32, rect.top() as i32)
        .of_size(rect.width() as u32, rect.height() as u32);
    draw_hollow_rect_mut(&mut canvas, outline, luma(BLACK));
    *image = Pixmap::from(canvas);
}

/// Return a copy of `image` with wrong glyphs grayed out and the spaces
/// where letters are missing outlined.
pub fn annotate(image: &Pixmap, glyphs: &[Rect], spaces: &[Rect], alignment: &Alignment) -> Pixmap {
    let mut annotated = image.clone();
    for i in alignment.wrong_glyphs() {
        if let Some(rect) = glyphs.get(i) {
            gray_out(&mut annotated, rect);
        }
    }
    for &gap in &alignment.missing_gaps {
        if let Some(rect) = spaces.get(gap) {
            outline(&mut annotated, rect);
        }
    }
    annotated
}
