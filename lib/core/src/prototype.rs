//! Per-track prototypes.
//!
//! A prototype is the bag of lemmas found in a track's descriptive text,
//! each scored by its relative frequency rescaled into
//! `[min_score, max_score]`.

use crate::config::PrototypeConfig;
use crate::counter::OrderedCounter;
use crate::normalizer::TermNormalizer;
use crate::track::Track;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One scored lemma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeEntry {
    pub lemma: String,
    /// Raw occurrences in the track text (zero when read back from an artifact)
    pub count: u32,
    pub score: f64,
}

/// Weighted term profile of one track.
///
/// Entries are kept by descending raw count, ties in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    entries: Vec<PrototypeEntry>,
}

#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl Prototype {
    /// Score lemma counts. Returns `None` when nothing was counted.
    pub fn from_counts(counts: &OrderedCounter, min_score: f64, max_score: f64) -> Option<Self> {
        let total = counts.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;

        let (mut min_freq, mut max_freq) = (f64::MAX, f64::MIN);
        for (_, count) in counts.iter() {
            let freq = f64::from(count) / total;
            min_freq = min_freq.min(freq);
            max_freq = max_freq.max(freq);
        }
        let range_freq = max_freq - min_freq;
        let range_score = max_score - min_score;

        let entries = counts
            .most_common()
            .into_iter()
            .map(|(lemma, count)| {
                let freq = f64::from(count) / total;
                let score = if range_freq == 0.0 {
                    max_score
                } else {
                    round_to(min_score + range_score * (freq - min_freq) / range_freq, 3)
                };
                PrototypeEntry {
                    lemma: lemma.to_string(),
                    count,
                    score,
                }
            })
            .collect();

        Some(Self { entries })
    }

    /// Rebuild from already-scored entries, e.g. a persisted artifact
    pub fn from_entries(entries: Vec<PrototypeEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, lemma: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.lemma == lemma)
            .map(|e| e.score)
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.entries.iter().any(|e| e.lemma == lemma)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrototypeEntry> {
        self.entries.iter()
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

/// Builds prototypes from catalog tracks
pub struct PrototypeBuilder<'a> {
    normalizer: TermNormalizer<'a>,
    config: PrototypeConfig,
}

impl<'a> PrototypeBuilder<'a> {
    pub fn new(normalizer: TermNormalizer<'a>, config: PrototypeConfig) -> Self {
        Self { normalizer, config }
    }

    pub fn config(&self) -> &PrototypeConfig {
        &self.config
    }

    /// Count lemmas in the track's configured fields.
    ///
    /// A verb is held back until the next content word and then credited
    /// once alongside it. A second verb arriving before any content word
    /// replaces the first, which is never counted.
    pub fn count_terms(&self, track: &Track) -> OrderedCounter {
        let description = track.description(&self.config.descr_fields);
        let mut counts = OrderedCounter::new();
        let mut pending_verb: Option<String> = None;

        for term in self.normalizer.terms(&description) {
            if term.is_verb {
                pending_verb = Some(term.lemma);
                continue;
            }
            counts.add(&term.lemma);
            if let Some(verb) = pending_verb.take() {
                counts.add(&verb);
            }
        }
        counts
    }

    /// Prototype for one track, `None` if no term survived filtering
    pub fn build(&self, track: &Track) -> Option<Prototype> {
        let counts = self.count_terms(track);
        Prototype::from_counts(&counts, self.config.min_score, self.config.max_score)
    }

    /// Prototypes for a whole catalog, keyed by artifact key in catalog order.
    ///
    /// Tracks are counted in parallel. Records sharing a key pool their
    /// counts into one prototype; tracks without surviving terms are skipped.
    pub fn build_all(&self, tracks: &[Track]) -> Vec<(String, Prototype)> {
        let counted: Vec<(String, OrderedCounter)> = tracks
            .par_iter()
            .map(|track| (track.artifact_key(), self.count_terms(track)))
            .collect();

        let mut order: Vec<String> = Vec::new();
        let mut merged: ahash::AHashMap<String, OrderedCounter> = ahash::AHashMap::new();
        for (key, counts) in counted {
            match merged.get_mut(&key) {
                Some(existing) => {
                    tracing::debug!("Merging duplicate track key {}", key);
                    for (lemma, n) in counts.iter() {
                        existing.add_n(lemma, n);
                    }
                }
                None => {
                    order.push(key.clone());
                    merged.insert(key, counts);
                }
            }
        }

        let mut prototypes = Vec::with_capacity(order.len());
        let mut skipped = 0usize;
        for key in order {
            let counts = &merged[&key];
            match Prototype::from_counts(counts, self.config.min_score, self.config.max_score) {
                Some(prototype) => prototypes.push((key, prototype)),
                None => {
                    tracing::debug!("No terms survived for {}, skipping", key);
                    skipped += 1;
                }
            }
        }
        tracing::info!(
            "Built {} prototypes from {} tracks ({} without terms)",
            prototypes.len(),
            tracks.len(),
            skipped
        );
        prototypes
    }
}
