//! The seam between our pipeline and whatever actually recognizes letters.
//!
//! A `Classifier` maps one normalized glyph to its `k` most likely labels.
//! We ship a simple template-matching backend, but anything implementing the
//! trait can be plugged in per alphabet through a `ClassifierRegistry`.

use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::alphabet::Alphabet;
use crate::errors::{Error, Result};
use crate::normalize::{normalize_glyph, pad_to_square, ResizeFilter, DEFAULT_GLYPH_SIZE};
use crate::pixmap::Pixmap;
use crate::preprocess::prepare;

/// The label a classifier uses to pad its output when it has fewer than `k`
/// real answers. It always ranks below every real label.
pub const UNKNOWN_LABEL: char = '\u{FFFD}';

/// Something which can recognize a single glyph.
///
/// Implementations must be deterministic for a given model state, and safe
/// to call from several threads at once.
pub trait Classifier: Send + Sync {
    /// Return exactly `k` labels for `glyph`, most likely first.
    fn classify(&self, glyph: &Pixmap, k: usize) -> Result<Vec<char>>;
}

impl<F> Classifier for F
where
    F: Fn(&Pixmap, usize) -> Result<Vec<char>> + Send + Sync,
{
    fn classify(&self, glyph: &Pixmap, k: usize) -> Result<Vec<char>> {
        self(glyph, k)
    }
}

/// A reference image for one label.
#[derive(Clone, Debug)]
struct Template {
    label: char,
    glyph: Pixmap,
}

/// Recognizes glyphs by comparing them against a set of labelled reference
/// glyphs, using the total absolute pixel difference.
#[derive(Clone, Debug)]
pub struct TemplateClassifier {
    alphabet: Alphabet,
    glyph_size: u32,
    filter: ResizeFilter,
    templates: Vec<Template>,
}

impl TemplateClassifier {
    /// Create a classifier with no templates. Templates and queries are
    /// compared at `glyph_size` square, or at our default size if
    /// `glyph_size` is zero.
    pub fn new(alphabet: Alphabet, glyph_size: u32, filter: ResizeFilter) -> TemplateClassifier {
        let glyph_size = if glyph_size == 0 {
            DEFAULT_GLYPH_SIZE
        } else {
            glyph_size
        };
        TemplateClassifier {
            alphabet,
            glyph_size,
            filter,
            templates: vec![],
        }
    }

    /// Load every `*.png` file in `dir` as a template. Files are named after
    /// their label, optionally followed by `_` and a variant number, as in
    /// `A.png` or `A_2.png`. Files are loaded in name order, which is also
    /// how ties between equally good labels are broken.
    pub fn from_dir(
        dir: &Path,
        alphabet: Alphabet,
        glyph_size: u32,
        filter: ResizeFilter,
    ) -> Result<TemplateClassifier> {
        let io_err = |source: std::io::Error| Error::Io {
            path: dir.to_owned(),
            source,
        };
        let mut paths = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<PathBuf>, _>>()
            .map_err(io_err)?;
        paths.retain(|p| p.extension().map_or(false, |ext| ext == "png"));
        paths.sort();

        let mut classifier = TemplateClassifier::new(alphabet, glyph_size, filter);
        for path in paths {
            let label = template_label(&path)?;
            let image = image::open(&path).map_err(|source| Error::Image {
                path: path.clone(),
                source,
            })?;
            let glyph = prepare(&image, false)?;
            classifier
                .add_template(label, &glyph)
                .map_err(|err| match err {
                    Error::InvalidTemplate { reason, .. } => {
                        Error::invalid_template(path.clone(), reason)
                    }
                    other => other,
                })?;
        }
        if classifier.templates.is_empty() {
            warn!("no templates found in {}", dir.display());
        }
        debug!(
            "loaded {} {} templates from {}",
            classifier.templates.len(),
            alphabet,
            dir.display()
        );
        Ok(classifier)
    }

    /// Add a template for `label`. The glyph is normalized the same way
    /// queries are.
    pub fn add_template(&mut self, label: char, glyph: &Pixmap) -> Result<()> {
        if !self.alphabet.contains(label) {
            return Err(Error::invalid_template(
                PathBuf::new(),
                format!("{:?} is not in the {} alphabet", label, self.alphabet),
            ));
        }
        if glyph.is_empty() {
            return Err(Error::invalid_template(PathBuf::new(), "template is empty"));
        }
        self.templates.push(Template {
            label,
            glyph: normalize_glyph(glyph, self.glyph_size, self.filter),
        });
        Ok(())
    }

    /// How many templates have we loaded?
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Do we have no templates at all?
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Classifier for TemplateClassifier {
    fn classify(&self, glyph: &Pixmap, k: usize) -> Result<Vec<char>> {
        let size = self.glyph_size as usize;
        let resized;
        let query = if glyph.width() == size && glyph.height() == size {
            glyph
        } else {
            resized = pad_to_square(glyph, self.glyph_size, self.filter);
            &resized
        };

        // Best distance per label, in the order labels were first loaded.
        let mut best: Vec<(char, u64)> = vec![];
        for template in &self.templates {
            let distance = distance(query, &template.glyph);
            match best.iter_mut().find(|(label, _)| *label == template.label) {
                Some(entry) => entry.1 = entry.1.min(distance),
                None => best.push((template.label, distance)),
            }
        }
        // Stable, so ties keep their loading order.
        best.sort_by_key(|&(_, d)| d);

        let mut labels = best.into_iter().map(|(label, _)| label).take(k).collect::<Vec<_>>();
        labels.resize(k, UNKNOWN_LABEL);
        Ok(labels)
    }
}

/// Total absolute difference between two equally sized glyphs.
fn distance(a: &Pixmap, b: &Pixmap) -> u64 {
    a.pixels()
        .zip(b.pixels())
        .map(|(pa, pb)| u64::from(pa.abs_diff(pb)))
        .sum()
}

/// Work out the label of a template from its file name.
fn template_label(path: &Path) -> Result<char> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::invalid_template(path.to_owned(), "file name is not UTF-8"))?;
    let name = stem.split('_').next().unwrap_or(stem);
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(label), None) => Ok(label),
        _ => Err(Error::invalid_template(
            path.to_owned(),
            format!("expected a single-letter name, found {:?}", name),
        )),
    }
}

/// Wraps another classifier, and gives up if it takes longer than
/// `timeout` on any one glyph.
///
/// Each call runs on its own thread. A call which times out is abandoned,
/// not cancelled, so the inner classifier may keep running in the
/// background until it finishes.
pub struct TimedClassifier {
    inner: Arc<dyn Classifier>,
    timeout: Duration,
}

impl TimedClassifier {
    /// Wrap `inner`, allowing it `timeout` per glyph.
    pub fn new(inner: Arc<dyn Classifier>, timeout: Duration) -> TimedClassifier {
        TimedClassifier { inner, timeout }
    }
}

impl Classifier for TimedClassifier {
    fn classify(&self, glyph: &Pixmap, k: usize) -> Result<Vec<char>> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let glyph = glyph.clone();
        thread::Builder::new()
            .name("classifier".to_owned())
            .spawn(move || {
                // The receiver may have given up on us already.
                let _ = tx.send(inner.classify(&glyph, k));
            })
            .map_err(Error::classifier)?;
        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(Error::ClassifierTimeout {
                glyph: 0,
                timeout: self.timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => {
                Err(Error::classifier("classifier thread exited without answering"))
            }
        }
    }
}

/// The classifiers for each alphabet, loaded once at startup and shared by
/// every request.
#[derive(Clone, Default)]
pub struct ClassifierRegistry {
    classifiers: HashMap<Alphabet, Arc<dyn Classifier>>,
}

impl ClassifierRegistry {
    /// Create an empty registry.
    pub fn new() -> ClassifierRegistry {
        ClassifierRegistry::default()
    }

    /// Register `classifier` for `alphabet`, replacing any existing one.
    pub fn with_classifier(
        mut self,
        alphabet: Alphabet,
        classifier: Arc<dyn Classifier>,
    ) -> ClassifierRegistry {
        self.classifiers.insert(alphabet, classifier);
        self
    }

    /// Get the classifier for `alphabet`.
    pub fn get(&self, alphabet: Alphabet) -> Result<&Arc<dyn Classifier>> {
        self.classifiers
            .get(&alphabet)
            .ok_or_else(|| Error::UnsupportedAlphabet {
                tag: alphabet.tag().to_owned(),
            })
    }

    /// The alphabets we have classifiers for.
    pub fn alphabets(&self) -> impl Iterator<Item = Alphabet> + '_ {
        self.classifiers.keys().copied()
    }
}

impl fmt::Debug for ClassifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierRegistry")
            .field("alphabets", &self.classifiers.keys().collect::<Vec<_>>())
            .finish()
    }
}
