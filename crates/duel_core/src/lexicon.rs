//! The word-list oracle.
//!
//! A [`Lexicon`] answers exactly two questions: "is this a legal guess?"
//! and "pick me a random target word". The dictionary is loaded once and
//! immutable afterwards, which makes unsynchronized concurrent reads safe.

use crate::evaluate::WORD_LENGTH;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Five-letter word list compiled into the binary.
const EMBEDDED_WORDS: &str = include_str!("../data/words.txt");

/// The process-wide lexicon built from the embedded word list.
///
/// Loading cannot fail for the embedded list, so this is infallible.
static EMBEDDED: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::from_lines(EMBEDDED_WORDS).expect("embedded word list is valid")
});

/// Errors raised while loading a dictionary.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The dictionary source could not be read.
    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),

    /// The source contained no usable five-letter words.
    #[error("word list contains no five-letter words")]
    Empty,
}

/// An immutable dictionary of legal five-letter words.
///
/// Construction normalizes every entry to lowercase and drops anything
/// that is not exactly five ASCII-alphabetic characters, so a full
/// English word list can be fed in unfiltered.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: Vec<String>,
    index: HashSet<String>,
}

impl Lexicon {
    /// Builds a lexicon from newline-separated words.
    pub fn from_lines(lines: &str) -> Result<Self, LexiconError> {
        let words: Vec<String> = lines
            .lines()
            .map(str::trim)
            .filter(|w| w.len() == WORD_LENGTH && w.chars().all(|c| c.is_ascii_alphabetic()))
            .map(str::to_ascii_lowercase)
            .collect();

        if words.is_empty() {
            return Err(LexiconError::Empty);
        }

        let index = words.iter().cloned().collect();
        Ok(Self { words, index })
    }

    /// Loads a lexicon from a word-list file, one word per line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_lines(&contents)
    }

    /// Returns the lexicon built from the embedded word list.
    pub fn embedded() -> &'static Lexicon {
        &EMBEDDED
    }

    /// Reports whether `word` is a legal guess: exactly five alphabetic
    /// characters and a dictionary member, case-insensitive.
    pub fn is_legal_guess(&self, word: &str) -> bool {
        word.len() == WORD_LENGTH
            && word.chars().all(|c| c.is_ascii_alphabetic())
            && self.index.contains(&word.to_ascii_lowercase())
    }

    /// Uniformly selects one target word from the dictionary.
    pub fn pick_target(&self) -> &str {
        self.pick_target_with(&mut rand::thread_rng())
    }

    /// Uniformly selects one target word using the supplied RNG.
    ///
    /// Mostly useful in tests, where a seeded RNG keeps runs reproducible.
    pub fn pick_target_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.words
            .choose(rng)
            .map(String::as_str)
            .expect("lexicon is never empty after construction")
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false: construction rejects empty word lists.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
