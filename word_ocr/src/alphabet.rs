//! The alphabets we can read, and the script-specific fix-ups we apply to
//! classifier output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::classifier::UNKNOWN_LABEL;
use crate::errors::{Error, Result};

/// A supported alphabet. We only read uppercase block letters.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    /// English, `A` through `Z`.
    Latin,
    /// Russian, including a stray Latin `I`. `Ы` is drawn as two separate
    /// blobs, and the right-hand one on its own looks like `I`.
    Cyrillic,
}

const LATIN_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CYRILLIC_LETTERS: &str = "IАБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

impl Alphabet {
    /// Look up an alphabet by language tag (`"en"` or `"ru"`).
    pub fn from_tag(tag: &str) -> Result<Alphabet> {
        match tag {
            "en" => Ok(Alphabet::Latin),
            "ru" => Ok(Alphabet::Cyrillic),
            _ => Err(Error::UnsupportedAlphabet {
                tag: tag.to_owned(),
            }),
        }
    }

    /// The language tag for this alphabet.
    pub fn tag(self) -> &'static str {
        match self {
            Alphabet::Latin => "en",
            Alphabet::Cyrillic => "ru",
        }
    }

    /// Every label a classifier for this alphabet may produce.
    pub fn letters(self) -> impl Iterator<Item = char> {
        match self {
            Alphabet::Latin => LATIN_LETTERS.chars(),
            Alphabet::Cyrillic => CYRILLIC_LETTERS.chars(),
        }
    }

    /// Is `label` part of this alphabet?
    pub fn contains(self, label: char) -> bool {
        self.letters().any(|c| c == label)
    }

    /// The post-processing rule for this alphabet.
    pub fn corrector(self) -> Corrector {
        match self {
            Alphabet::Latin => Corrector::Identity,
            Alphabet::Cyrillic => Corrector::CyrillicYeru,
        }
    }
}

impl FromStr for Alphabet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Alphabet> {
        Alphabet::from_tag(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// What a `Corrector` decided about one glyph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Correction {
    /// The ranked labels to use. When `merge_with_previous` is set, these
    /// replace the previous glyph's labels, and the current glyph is
    /// dropped.
    pub ranked: Vec<char>,
    /// Should this glyph be merged into the one before it?
    pub merge_with_previous: bool,
}

impl Correction {
    fn keep(ranked: Vec<char>) -> Correction {
        Correction {
            ranked,
            merge_with_previous: false,
        }
    }
}

/// A script-specific rule for fixing up classifier output, based on the
/// previous glyph we accepted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Corrector {
    /// Leave everything alone.
    Identity,
    /// `Ь` followed by `I` is really `Ы`. Any other `I` is a misread `Т`,
    /// because there's no `I` in Russian.
    CyrillicYeru,
}

impl Corrector {
    /// Fix up `ranked` given the top label of the previous accepted glyph.
    pub fn correct(self, ranked: Vec<char>, previous: Option<char>) -> Correction {
        match self {
            Corrector::Identity => Correction::keep(ranked),
            Corrector::CyrillicYeru => correct_yeru(ranked, previous),
        }
    }
}

fn correct_yeru(mut ranked: Vec<char>, previous: Option<char>) -> Correction {
    if ranked.first() != Some(&'I') {
        return Correction::keep(ranked);
    }
    if previous == Some('Ь') {
        // Rank `Ы` first, keeping the remaining labels in order.
        let depth = ranked.len();
        let mut merged = vec!['Ы', 'Ь'];
        merged.extend(ranked.into_iter().filter(|&c| c != 'Ы' && c != 'Ь' && c != 'I'));
        merged.resize(depth, UNKNOWN_LABEL);
        return Correction {
            ranked: merged,
            merge_with_previous: true,
        };
    }
    match ranked.iter().position(|&c| c == 'Т') {
        Some(i) => ranked.swap(0, i),
        None => ranked[0] = 'Т',
    }
    Correction::keep(ranked)
}
