//! Integration tests for our command-line interface.  We actually run the
//! binary and make sure it produces the expected output.

use std::io::Cursor;

use cli_test_dir::{ExpectStatus, OutputExt, TestDir};
use image::{DynamicImage, ImageOutputFormat};
use word_ocr::{Pixmap, BLACK};

const SCALE: usize = 3;

fn letter(c: char) -> &'static [&'static str] {
    match c {
        'I' => &["#", "#", "#", "#", "#"],
        'L' => &["#..", "#..", "#..", "#..", "###"],
        'T' => &["###", ".#.", ".#.", ".#.", ".#."],
        'E' => &["###", "#..", "##.", "#..", "###"],
        _ => panic!("no test glyph for {:?}", c),
    }
}

fn render(c: char) -> Pixmap {
    let rows = letter(c);
    Pixmap::from_fn(rows[0].len() * SCALE, rows.len() * SCALE, |x, y| {
        if rows[y / SCALE].as_bytes()[x / SCALE] == b'#' {
            BLACK
        } else {
            255
        }
    })
}

/// Draw `word` with a 5 pixel margin and 5 pixel gaps between letters.
fn draw_word(word: &str) -> Pixmap {
    let glyphs = word.chars().map(render).collect::<Vec<_>>();
    let width = 5 + glyphs.iter().map(|g| g.width() + 5).sum::<usize>();
    let mut image = Pixmap::blank(width, 5 * SCALE + 10);
    let mut x = 5;
    for glyph in &glyphs {
        image.blit(glyph, x, 5);
        x += glyph.width() + 5;
    }
    image
}

fn png_bytes(pixmap: &Pixmap) -> Vec<u8> {
    let mut bytes = Cursor::new(vec![]);
    DynamicImage::ImageLuma8(pixmap.to_image())
        .write_to(&mut bytes, ImageOutputFormat::Png)
        .expect("could not encode PNG");
    bytes.into_inner()
}

/// Set up a test directory containing `templates/` for our test letters.
fn testdir_with_templates(test_name: &str) -> TestDir {
    let testdir = TestDir::new("wordcheck", test_name);
    for c in "ILTE".chars() {
        let glyph = render(c);
        let mut canvas = Pixmap::blank(glyph.width() + 8, glyph.height() + 8);
        canvas.blit(&glyph, 4, 4);
        testdir.create_file(format!("templates/{}.png", c), png_bytes(&canvas));
    }
    testdir
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_str(output.stdout_str()).expect("stdout was not JSON")
}

#[test]
fn recognizes_a_word() {
    let testdir = testdir_with_templates("recognizes_a_word");
    testdir.create_file("word.png", png_bytes(&draw_word("TILE")));
    let output = testdir
        .cmd()
        .args(["recognize", "word.png", "--lang", "en", "--templates", "templates"])
        .expect_success();
    let json = stdout_json(&output);
    assert_eq!(json["word"], "TILE");
    assert!(json.get("correct").is_none());
    assert!(json.get("candidates").is_none());
    assert_eq!(json["warnings"], serde_json::json!([]));
}

#[test]
fn scores_and_annotates() {
    let testdir = testdir_with_templates("scores_and_annotates");
    testdir.create_file("word.png", png_bytes(&draw_word("LIT")));
    let output = testdir
        .cmd()
        .args(["recognize", "word.png", "--lang", "en", "--templates", "templates"])
        .args(["--expected", "LOT", "--candidates", "2"])
        .args(["--annotated", "marked.png"])
        .expect_success();
    let json = stdout_json(&output);
    assert_eq!(json["word"], "LIT");
    assert_eq!(json["correct"], false);
    assert_eq!(json["candidates"].as_array().unwrap().len(), 3);
    assert_eq!(json["candidates"][0][0], "L");
    testdir.expect_path("marked.png");
}

#[test]
fn segments_into_glyph_files() {
    let testdir = TestDir::new("wordcheck", "segments_into_glyph_files");
    testdir.create_file("word.png", png_bytes(&draw_word("TIE")));
    testdir
        .cmd()
        .args(["segment", "word.png", "--out-dir", "glyphs"])
        .expect_success();
    testdir.expect_path("glyphs/0000.png");
    testdir.expect_path("glyphs/0001.png");
    testdir.expect_path("glyphs/0002.png");
    testdir.expect_no_such_path("glyphs/0003.png");
    testdir.expect_contains("glyphs/index.json", "\"truncated\": false");
    testdir.expect_contains("glyphs/index.json", "\"path\": \"0002.png\"");
}

/// "TIE" followed by a faint smudge, which only counts as a glyph when we
/// don't binarize.
fn smudged_word() -> Pixmap {
    let word = draw_word("TIE");
    let mut image = Pixmap::blank(word.width() + 6, word.height());
    image.blit(&word, 0, 0);
    image.blit(&Pixmap::from_fn(2, 3, |_, _| 250), word.width() + 1, 6);
    image
}

#[test]
fn config_file_controls_binarization() {
    let testdir = TestDir::new("wordcheck", "config_file_controls_binarization");
    testdir.create_file("word.png", png_bytes(&smudged_word()));
    testdir.create_file("config.json", r#"{ "binarize": false }"#);
    testdir
        .cmd()
        .args(["segment", "word.png", "--out-dir", "glyphs"])
        .args(["--config", "config.json"])
        .expect_success();
    testdir.expect_path("glyphs/0003.png");
}

#[test]
fn binarize_flag_overrides_config_file() {
    let testdir = TestDir::new("wordcheck", "binarize_flag_overrides_config_file");
    testdir.create_file("word.png", png_bytes(&smudged_word()));
    testdir.create_file("config.json", r#"{ "binarize": false }"#);
    testdir
        .cmd()
        .args(["segment", "word.png", "--out-dir", "glyphs"])
        .args(["--config", "config.json", "--binarize"])
        .expect_success();
    testdir.expect_path("glyphs/0002.png");
    testdir.expect_no_such_path("glyphs/0003.png");
}

#[test]
fn rejects_unknown_language() {
    let testdir = testdir_with_templates("rejects_unknown_language");
    testdir.create_file("word.png", png_bytes(&draw_word("IT")));
    testdir
        .cmd()
        .args(["recognize", "word.png", "--lang", "fr", "--templates", "templates"])
        .expect_failure();
}
