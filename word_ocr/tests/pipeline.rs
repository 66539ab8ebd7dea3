//! End-to-end tests, reading synthetic block-letter words with a template
//! classifier loaded from disk.

use std::path::Path;
use std::sync::Arc;
use word_ocr::{
    prepare, Alphabet, ClassifierRegistry, Config, Pixmap, Recognizer, Request, TemplateClassifier,
    Warning, BLACK,
};

const SCALE: usize = 2;
const MARGIN: usize = 4;
const GAP: usize = 4;

fn letter(c: char) -> &'static [&'static str] {
    match c {
        'A' => &[".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'C' => &[".####", "#....", "#....", "#....", "#....", "#....", ".####"],
        'E' => &["#####", "#....", "#....", "####.", "#....", "#....", "#####"],
        'H' => &["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'L' => &["#....", "#....", "#....", "#....", "#....", "#....", "#####"],
        'O' => &[".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'T' | 'Т' => &["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'Ь' => &["#....", "#....", "#....", "####.", "#...#", "#...#", "####."],
        'I' => &["#", "#", "#", "#", "#", "#", "#"],
        _ => panic!("no test glyph for {:?}", c),
    }
}

/// Draw a letter at `SCALE`, with no margin.
fn render(c: char) -> Pixmap {
    let rows = letter(c);
    let width = rows[0].len();
    Pixmap::from_fn(width * SCALE, rows.len() * SCALE, |x, y| {
        if rows[y / SCALE].as_bytes()[x / SCALE] == b'#' {
            BLACK
        } else {
            255
        }
    })
}

/// Draw `word` on a white background, letters separated by `GAP` columns.
fn word_image(word: &str) -> Pixmap {
    let glyphs = word.chars().map(render).collect::<Vec<_>>();
    let width = 2 * MARGIN + glyphs.iter().map(Pixmap::width).sum::<usize>()
        + GAP * glyphs.len().saturating_sub(1);
    let height = 2 * MARGIN + glyphs.iter().map(Pixmap::height).max().unwrap_or(0);
    let mut image = Pixmap::blank(width, height);
    let mut x = MARGIN;
    for glyph in &glyphs {
        image.blit(glyph, x, MARGIN);
        x += glyph.width() + GAP;
    }
    image
}

fn write_templates(dir: &Path, letters: &str) {
    for c in letters.chars() {
        let glyph = render(c);
        let mut canvas = Pixmap::blank(glyph.width() + 2 * MARGIN, glyph.height() + 2 * MARGIN);
        canvas.blit(&glyph, MARGIN, MARGIN);
        canvas
            .to_image()
            .save(dir.join(format!("{}.png", c)))
            .unwrap();
    }
}

fn recognizer() -> Recognizer {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Config::default();

    let latin_dir = tempfile::tempdir().unwrap();
    write_templates(latin_dir.path(), "ACEHLOT");
    let latin = TemplateClassifier::from_dir(
        latin_dir.path(),
        Alphabet::Latin,
        config.glyph_size,
        config.resize_filter,
    )
    .unwrap();

    let cyrillic_dir = tempfile::tempdir().unwrap();
    write_templates(cyrillic_dir.path(), "IТЬ");
    let cyrillic = TemplateClassifier::from_dir(
        cyrillic_dir.path(),
        Alphabet::Cyrillic,
        config.glyph_size,
        config.resize_filter,
    )
    .unwrap();

    let registry = ClassifierRegistry::new()
        .with_classifier(Alphabet::Latin, Arc::new(latin))
        .with_classifier(Alphabet::Cyrillic, Arc::new(cyrillic));
    Recognizer::new(registry, config)
}

#[test]
fn reads_and_scores_a_correct_word() {
    let request = Request::new(word_image("CAT"), Alphabet::Latin).with_expected("CAT");
    let response = recognizer().recognize(&request).unwrap();
    assert_eq!(response.word, "CAT");
    assert_eq!(response.glyphs.len(), 3);
    assert_eq!(response.spaces.len(), 4);
    assert!(response.warnings.is_empty());
    let score = response.score.unwrap();
    assert!(score.correct);
    assert_eq!(score.annotated, request.image);
}

#[test]
fn ranks_several_candidates() {
    let request = Request::new(word_image("HOLE"), Alphabet::Latin).with_candidate_depth(3);
    let response = recognizer().recognize(&request).unwrap();
    assert_eq!(response.word, "HOLE");
    assert_eq!(response.lattice.depth(), 3);
    for (candidates, expected) in response.lattice.positions().zip("HOLE".chars()) {
        assert_eq!(candidates[0], expected);
        assert!(!candidates[1..].contains(&expected));
    }
}

#[test]
fn substituted_letter_is_grayed_out() {
    let request = Request::new(word_image("CAT"), Alphabet::Latin).with_expected("COT");
    let response = recognizer().recognize(&request).unwrap();
    let score = response.score.unwrap();
    assert!(!score.correct);
    assert_eq!(score.alignment.wrong_glyphs(), vec![1]);

    // The middle glyph's ink is now gray, and nothing else changed.
    let glyph = response.glyphs[1];
    let ink = glyph
        .vertical_range()
        .flat_map(|y| glyph.horizontal_range().map(move |x| (x, y)))
        .find(|&(x, y)| request.image.get(x, y) == BLACK)
        .unwrap();
    assert_eq!(score.annotated.get(ink.0, ink.1), 128);
    let first = response.glyphs[0];
    assert_eq!(
        score.annotated.get(first.left(), first.top() + SCALE),
        BLACK
    );
}

#[test]
fn dropped_letter_is_flagged() {
    let request = Request::new(word_image("HELO"), Alphabet::Latin).with_expected("HELLO");
    let response = recognizer().recognize(&request).unwrap();
    assert_eq!(response.word, "HELO");
    let score = response.score.unwrap();
    assert!(!score.correct);
    assert!(score.alignment.wrong_glyphs().is_empty());
    assert_eq!(score.alignment.missing_gaps, vec![3]);

    // The gap between `L` and `O` is outlined.
    let space = response.spaces[3];
    assert_eq!(request.image.get(space.left() + 1, space.top()), 255);
    assert_eq!(score.annotated.get(space.left() + 1, space.top()), BLACK);
}

#[test]
fn split_yeru_is_merged() {
    let request = Request::new(word_image("ЬIТ"), Alphabet::Cyrillic).with_expected("ЫТ");
    let response = recognizer().recognize(&request).unwrap();
    assert_eq!(response.word, "ЫТ");
    assert_eq!(response.glyphs.len(), 2);
    assert_eq!(response.spaces.len(), 3);
    assert!(response.score.unwrap().correct);
}

#[test]
fn lone_i_reads_as_te() {
    let request = Request::new(word_image("IЬ"), Alphabet::Cyrillic);
    let response = recognizer().recognize(&request).unwrap();
    assert_eq!(response.word, "ТЬ");
}

#[test]
fn reads_light_text_on_dark_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("word.png");
    word_image("LATE")
        .map(|px| 255 - px)
        .to_image()
        .save(&path)
        .unwrap();

    let image = image::open(&path).unwrap();
    let pixmap = prepare(&image, true).unwrap();
    let request = Request::new(pixmap, Alphabet::Latin);
    let response = recognizer().recognize(&request).unwrap();
    assert_eq!(response.word, "LATE");
}

#[test]
fn too_many_glyphs_are_truncated() {
    let config = Config {
        max_glyphs: 2,
        ..Config::default()
    };
    let registry = ClassifierRegistry::new().with_classifier(
        Alphabet::Latin,
        Arc::new(|_: &Pixmap, k: usize| -> word_ocr::Result<Vec<char>> { Ok(vec!['X'; k]) }),
    );
    let request = Request::new(word_image("HELLO"), Alphabet::Latin);
    let response = Recognizer::new(registry, config).recognize(&request).unwrap();
    assert_eq!(response.word, "XX");
    assert_eq!(
        response.warnings,
        vec![Warning::SegmentationTruncated { max_glyphs: 2 }]
    );
}
