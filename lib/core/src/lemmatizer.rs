//! Lemmatization / part-of-speech capability.
//!
//! The prototype builder never talks to a tagger directly. It receives a
//! [`Lemmatizer`] and tolerates it being absent or failing: a missing
//! answer means "identity lemma, unknown part of speech".

use crate::{Error, Result};
use ahash::AHashMap;
use std::io::BufRead;

/// Coarse part of speech derived from a Penn-style tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Number,
    Other,
}

impl PartOfSpeech {
    /// Map a fine-grained tag (`VBD`, `JJR`, `CD`, `NN:x`...) to a coarse class
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.split(':').next().unwrap_or("").trim();
        if tag == "CD" || tag == "NUM" {
            PartOfSpeech::Number
        } else if tag.starts_with("VB") || tag.starts_with("VV") || tag.starts_with("VH") {
            PartOfSpeech::Verb
        } else if tag.starts_with("JJ") {
            PartOfSpeech::Adjective
        } else if tag.starts_with("RB") {
            PartOfSpeech::Adverb
        } else if tag.starts_with("NN") || tag.starts_with("NP") {
            PartOfSpeech::Noun
        } else {
            PartOfSpeech::Other
        }
    }
}

/// One lemmatized token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub lemma: String,
    pub pos: PartOfSpeech,
}

impl TaggedToken {
    pub fn new(lemma: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self {
            lemma: lemma.into(),
            pos,
        }
    }
}

/// External lemmatizer / POS tagger.
///
/// Returns at most one analysis per token. `Ok(None)` means the token is
/// unknown; `Err` means the capability failed for this call.
pub trait Lemmatizer: Send + Sync {
    fn tag(&self, token: &str) -> Result<Option<TaggedToken>>;
}

/// Stand-in used when no tagger is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLemmatizer;

impl Lemmatizer for NoLemmatizer {
    fn tag(&self, _token: &str) -> Result<Option<TaggedToken>> {
        Ok(None)
    }
}

/// Dictionary-backed lemmatizer.
///
/// Reads the tab-separated `token<TAB>tag<TAB>lemma` shape produced by
/// TreeTagger runs; lookups are case-insensitive on the token.
#[derive(Debug, Clone, Default)]
pub struct LexiconLemmatizer {
    entries: AHashMap<String, TaggedToken>,
}

impl LexiconLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: &str, tag: &str, lemma: &str) {
        let lemma = lemma.split(':').next().unwrap_or("").trim();
        let lemma = if lemma.is_empty() || lemma == "<unknown>" {
            token.to_lowercase()
        } else {
            lemma.to_lowercase()
        };
        self.entries
            .entry(token.to_lowercase())
            .or_insert_with(|| TaggedToken::new(lemma, PartOfSpeech::from_tag(tag)));
    }

    /// Load a lexicon; malformed lines are skipped, the first analysis of a token wins
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lexicon = Self::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 3 || parts[0].trim().is_empty() {
                skipped += 1;
                continue;
            }
            lexicon.insert(parts[0].trim(), parts[1].trim(), parts[2].trim());
        }
        if skipped > 0 {
            tracing::warn!("Lexicon: skipped {} malformed lines", skipped);
        }
        if lexicon.is_empty() {
            return Err(Error::Lemmatizer("lexicon contains no entries".into()));
        }
        Ok(lexicon)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lemmatizer for LexiconLemmatizer {
    fn tag(&self, token: &str) -> Result<Option<TaggedToken>> {
        Ok(self.entries.get(&token.to_lowercase()).cloned())
    }
}
