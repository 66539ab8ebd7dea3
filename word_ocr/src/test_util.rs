//! Test-only utilities.

use crate::pixmap::{Pixmap, BLACK, WHITE};

/// Build a pixmap from ASCII art. `#` is solid ink, `.` is background and
/// `+` is a mid-gray pixel.
pub fn pixmap_from_rows(rows: &[&str]) -> Pixmap {
    let height = rows.len();
    let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
    let grid = rows
        .iter()
        .map(|r| r.chars().collect::<Vec<_>>())
        .collect::<Vec<_>>();
    Pixmap::from_fn(width, height, |x, y| match grid[y][x] {
        '#' => BLACK,
        '.' => WHITE,
        '+' => 0x80,
        other => panic!("unexpected pixel {:?} in test image", other),
    })
}

/// Build a word image of `height` rows containing one solid bar per entry in
/// `bars`, where each entry is `(left, width)`.
pub fn bars_image(width: usize, height: usize, bars: &[(usize, usize)]) -> Pixmap {
    Pixmap::from_fn(width, height, |x, y| {
        let inked = y > 0
            && y + 1 < height
            && bars.iter().any(|&(l, w)| l <= x && x < l + w);
        if inked {
            BLACK
        } else {
            WHITE
        }
    })
}

#[test]
fn pixmap_from_rows_builds_expected_pixels() {
    let p = pixmap_from_rows(&["#.", "+#"]);
    assert_eq!(p.get(0, 0), BLACK);
    assert_eq!(p.get(1, 0), WHITE);
    assert_eq!(p.get(0, 1), 0x80);
}
