//! Prototype matcher
//!
//! Scores catalog tracks against a composite profile using their persisted
//! prototypes, then admits only tracks whose text covers enough of the
//! active properties and anchors.

use crate::composite::CompositeProfile;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::borrow::Cow;
use tracklore_core::{
    contains_word, round_to, Filter, FilterCondition, MatcherConfig, Prototype, Track, TrackFilter,
};

/// Slack applied before rounding the required match count up
const COVERAGE_EPSILON: f64 = 1e-9;

/// Lookup of persisted prototypes by artifact key
pub trait PrototypeSource {
    fn prototype(&self, key: &str) -> Option<Cow<'_, Prototype>>;
}

/// Prototypes held in memory, e.g. straight from the builder
#[derive(Debug, Clone, Default)]
pub struct PrototypeIndex {
    prototypes: AHashMap<String, Prototype>,
}

impl PrototypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, prototype: Prototype) {
        self.prototypes.insert(key.into(), prototype);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

impl FromIterator<(String, Prototype)> for PrototypeIndex {
    fn from_iter<I: IntoIterator<Item = (String, Prototype)>>(iter: I) -> Self {
        Self {
            prototypes: iter.into_iter().collect(),
        }
    }
}

impl PrototypeSource for PrototypeIndex {
    fn prototype(&self, key: &str) -> Option<Cow<'_, Prototype>> {
        self.prototypes.get(key).map(Cow::Borrowed)
    }
}

/// Properties a matching run looks for
#[derive(Debug, Clone, Default)]
pub struct MatchQuery {
    active: Vec<String>,
    anchors: AHashSet<String>,
    negated: Vec<String>,
}

impl MatchQuery {
    pub fn new(active: Vec<String>, anchors: Vec<String>, negated: Vec<String>) -> Self {
        Self {
            active,
            anchors: anchors.into_iter().collect(),
            negated,
        }
    }

    pub fn from_profile(profile: &CompositeProfile) -> Self {
        Self::new(
            profile.active_properties(),
            profile.anchors(),
            profile.negated(),
        )
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn negated(&self) -> &[String] {
        &self.negated
    }

    pub fn is_anchor(&self, property: &str) -> bool {
        self.anchors.contains(property)
    }

    /// Smallest number of active properties a track must contain
    pub fn required_matches(&self, min_match_rate: f64) -> usize {
        let required = self.active.len() as f64 * min_match_rate - COVERAGE_EPSILON;
        required.ceil().max(0.0) as usize
    }
}

/// An admitted track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    /// Artifact key of the track
    pub track_id: String,
    pub title: String,
    pub score: f64,
    /// Active properties found in the track's text, in query order
    pub matches: Vec<String>,
    pub anchor_hits: Vec<String>,
}

/// Outcome of one matching run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchOutcome {
    /// Admitted tracks by descending score
    pub results: Vec<RankedResult>,
    /// Tracks considered (records with an identifier)
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Evaluation {
    score: f64,
    matches: Vec<String>,
    anchor_hits: Vec<String>,
    negated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PrototypeMatcher {
    config: MatcherConfig,
}

impl PrototypeMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    fn any_field_contains(&self, track: &Track, fields: &[String], property: &str) -> bool {
        fields.iter().any(|field| {
            track
                .field_text(field)
                .map(|text| contains_word(&text, property))
                .unwrap_or(false)
        })
    }

    fn in_track_text(&self, track: &Track, property: &str) -> bool {
        self.any_field_contains(track, &self.config.descr_fields, property)
            || self.any_field_contains(track, &self.config.title_fields, property)
    }

    /// Tracks mentioning any negated property in their descriptive or title text
    fn exclusion(&self, query: &MatchQuery) -> TrackFilter {
        let scope: Vec<String> = self
            .config
            .descr_fields
            .iter()
            .chain(&self.config.title_fields)
            .cloned()
            .collect();
        TrackFilter::new(FilterCondition::any_of(&scope, query.negated().iter().cloned()))
    }

    fn evaluate(
        &self,
        query: &MatchQuery,
        track: &Track,
        prototype: Option<&Prototype>,
        exclusion: &TrackFilter,
    ) -> Evaluation {
        let mut score = 0.0;
        if query
            .active()
            .iter()
            .any(|p| self.any_field_contains(track, &self.config.title_fields, p))
        {
            score += self.config.title_boost;
        }

        if let Some(prototype) = prototype {
            let active: AHashSet<&str> = query.active().iter().map(String::as_str).collect();
            score += prototype
                .iter()
                .filter(|entry| active.contains(entry.lemma.as_str()))
                .map(|entry| round_to(entry.score, 2))
                .sum::<f64>();
        }

        let matches: Vec<String> = query
            .active()
            .iter()
            .filter(|p| self.in_track_text(track, p))
            .cloned()
            .collect();
        let anchor_hits = matches
            .iter()
            .filter(|p| query.is_anchor(p))
            .cloned()
            .collect();
        let negated = exclusion.matches(track);

        Evaluation {
            score,
            matches,
            anchor_hits,
            negated,
        }
    }

    fn admits(&self, query: &MatchQuery, eval: &Evaluation) -> bool {
        !eval.negated
            && !query.active().is_empty()
            && eval.matches.len() >= query.required_matches(self.config.min_match_rate)
            && eval.anchor_hits.len() >= self.config.min_anchors
    }

    /// Rank `tracks` against `query`.
    ///
    /// Records without an identifier are ignored; a key seen twice is only
    /// evaluated for its first record. Rejected tracks and tracks scoring
    /// zero are left out. Ties keep catalog order.
    pub fn rank<S>(&self, query: &MatchQuery, tracks: &[Track], source: &S) -> MatchOutcome
    where
        S: PrototypeSource + ?Sized,
    {
        let mut seen = AHashSet::new();
        let mut results = Vec::new();
        let mut total = 0usize;
        let mut rejected = 0usize;
        let exclusion = self.exclusion(query);

        for track in tracks {
            if track.id.trim().is_empty() {
                continue;
            }
            total += 1;
            let key = track.artifact_key();
            if !seen.insert(key.clone()) {
                tracing::debug!("Duplicate track key {}, keeping the first record", key);
                continue;
            }

            let prototype = source.prototype(&key);
            if prototype.is_none() {
                tracing::debug!("No prototype for {}", key);
            }
            let eval = self.evaluate(query, track, prototype.as_deref(), &exclusion);
            if !self.admits(query, &eval) {
                rejected += 1;
                continue;
            }
            if eval.score <= 0.0 {
                continue;
            }
            results.push(RankedResult {
                track_id: key,
                title: track.title.clone(),
                score: eval.score,
                matches: eval.matches,
                anchor_hits: eval.anchor_hits,
            });
        }

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(max) = self.config.max_results {
            results.truncate(max);
        }
        tracing::debug!("{} tracks rejected by coverage, anchors or negation", rejected);

        MatchOutcome { results, total }
    }
}
