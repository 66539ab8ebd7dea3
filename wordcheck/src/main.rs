//! Read a word from an image, and check it against the word we expected.

#![warn(missing_docs)]

use std::{
    fs,
    io::{stdout, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use serde::Serialize;
use word_ocr::{
    normalize_glyph, prepare, segment, Alphabet, CandidateLattice, ClassifierRegistry, Config,
    Pixmap, Rect, Recognizer, Request, TemplateClassifier, Warning,
};

#[derive(Debug, Parser)]
/// Read handwritten block capitals, and mark up any mistakes.
#[command(name = "wordcheck", version)]
enum Args {
    /// Read a word, and optionally score it against the expected spelling.
    #[command(name = "recognize")]
    Recognize {
        /// Path to the word image.
        image: PathBuf,

        /// Language of the word ("en" or "ru").
        #[arg(long)]
        lang: String,

        /// Directory of template glyphs, named like `A.png` or `A_2.png`.
        #[arg(long)]
        templates: PathBuf,

        /// The word we expect the image to contain.
        #[arg(long)]
        expected: Option<String>,

        /// Number of ranked candidates to report for each letter.
        #[arg(long, default_value_t = 1)]
        candidates: usize,

        /// Binarize the image before reading it.
        #[arg(long)]
        binarize: bool,

        /// Path to a JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the marked-up image here.
        #[arg(long, requires = "expected")]
        annotated: Option<PathBuf>,
    },

    /// Split a word into normalized glyph images, for debugging or for
    /// building templates.
    #[command(name = "segment")]
    Segment {
        /// Path to the word image.
        image: PathBuf,

        /// Directory in which to write glyph images and `index.json`.
        #[arg(long)]
        out_dir: PathBuf,

        /// Binarize the image before segmenting it.
        #[arg(long)]
        binarize: bool,

        /// Path to a JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// What we print after reading a word.
#[derive(Serialize)]
struct RecognizeOutput<'a> {
    word: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<&'a CandidateLattice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct: Option<bool>,
    warnings: &'a [Warning],
}

/// What we write to `index.json` after segmenting a word.
#[derive(Serialize)]
struct IndexInfo {
    width: usize,
    height: usize,
    truncated: bool,
    glyphs: Vec<GlyphInfo>,
    spaces: Vec<Rect>,
}

#[derive(Serialize)]
struct GlyphInfo {
    rect: Rect,
    path: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Args = Args::parse();
    match args {
        Args::Recognize {
            image,
            lang,
            templates,
            expected,
            candidates,
            binarize,
            config,
            annotated,
        } => {
            let config = load_config(config.as_deref(), binarize)?;
            cmd_recognize(
                &image,
                &lang,
                &templates,
                expected,
                candidates,
                config,
                annotated.as_deref(),
            )
        }
        Args::Segment {
            image,
            out_dir,
            binarize,
            config,
        } => {
            let config = load_config(config.as_deref(), binarize)?;
            cmd_segment(&image, &out_dir, &config)
        }
    }
}

/// Load our configuration, letting command-line flags override it.
fn load_config(path: Option<&Path>, binarize: bool) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if binarize {
        config.binarize = true;
    }
    Ok(config)
}

/// Decode and prepare the word image at `path`.
fn load_word(path: &Path, config: &Config) -> Result<Pixmap> {
    let image = image::open(path)
        .with_context(|| format!("could not read image {}", path.display()))?;
    Ok(prepare(&image, config.binarize)?)
}

fn save_pixmap(pixmap: &Pixmap, path: &Path) -> Result<()> {
    pixmap
        .to_image()
        .save(path)
        .with_context(|| format!("could not write image {}", path.display()))
}

fn cmd_recognize(
    image_path: &Path,
    lang: &str,
    templates: &Path,
    expected: Option<String>,
    candidates: usize,
    config: Config,
    annotated_path: Option<&Path>,
) -> Result<()> {
    let alphabet = Alphabet::from_tag(lang)?;
    let classifier =
        TemplateClassifier::from_dir(templates, alphabet, config.glyph_size, config.resize_filter)
            .with_context(|| format!("could not load templates from {}", templates.display()))?;
    let registry = ClassifierRegistry::new().with_classifier(alphabet, Arc::new(classifier));

    let image = load_word(image_path, &config)?;
    let recognizer = Recognizer::new(registry, config);
    let mut request = Request::new(image, alphabet).with_candidate_depth(candidates);
    request.expected = expected;
    let response = recognizer.recognize(&request)?;

    for warning in &response.warnings {
        warn!("{}: {:?}", image_path.display(), warning);
    }

    if let Some(path) = annotated_path {
        match &response.score {
            Some(score) => save_pixmap(&score.annotated, path)?,
            // An empty expected word means there's nothing to score.
            None => save_pixmap(&request.image, path)?,
        }
    }

    let output = RecognizeOutput {
        word: &response.word,
        candidates: (candidates > 1).then_some(&response.lattice),
        correct: response.score.as_ref().map(|s| s.correct),
        warnings: &response.warnings,
    };
    let out = stdout();
    let mut out = out.lock();
    serde_json::to_writer_pretty(&mut out, &output)?;
    writeln!(out)?;
    Ok(())
}

fn cmd_segment(image_path: &Path, out_dir: &Path, config: &Config) -> Result<()> {
    let image = load_word(image_path, config)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("could not create {}", out_dir.display()))?;

    let segmentation = segment(&image, config.max_glyphs)?;
    let mut info = IndexInfo {
        width: image.width(),
        height: image.height(),
        truncated: segmentation.truncated,
        glyphs: vec![],
        spaces: segmentation.spaces.clone(),
    };
    for (i, rect) in segmentation.glyphs.iter().enumerate() {
        let glyph = normalize_glyph(&image.crop(rect), config.glyph_size, config.resize_filter);
        let glyph_name = format!("{:04}.png", i);
        save_pixmap(&glyph, &out_dir.join(&glyph_name))?;
        info.glyphs.push(GlyphInfo {
            rect: *rect,
            path: glyph_name,
        });
    }

    let json_path = out_dir.join("index.json");
    let json_file = fs::File::create(&json_path)
        .with_context(|| format!("could not create {}", json_path.display()))?;
    serde_json::to_writer_pretty(json_file, &info)
        .with_context(|| format!("error writing {}", json_path.display()))?;
    Ok(())
}
