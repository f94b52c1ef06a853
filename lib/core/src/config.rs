//! Run configuration value objects.
//!
//! Every component receives its configuration explicitly; nothing is read
//! from process-wide state. All structs deserialize from JSON with every
//! field optional, falling back to the defaults below.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MIN_SCORE: f64 = 0.6;
pub const DEFAULT_MAX_SCORE: f64 = 0.9;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Configuration for the prototype builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrototypeConfig {
    /// Fields concatenated into the text a prototype is built from
    pub descr_fields: Vec<String>,
    pub min_score: f64,
    pub max_score: f64,
    /// Stopwords on top of the built-in English list
    pub extra_stopwords: Vec<String>,
    /// Optional `token<TAB>pos<TAB>lemma` lexicon for the lemmatizer
    pub lexicon_path: Option<PathBuf>,
}

impl Default for PrototypeConfig {
    fn default() -> Self {
        Self {
            descr_fields: strings(&[
                "title", "artist", "album", "year", "lyrics", "tags", "moods",
                "instruments", "subgenres", "contexts",
            ]),
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
            extra_stopwords: Vec::new(),
            lexicon_path: None,
        }
    }
}

impl PrototypeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.descr_fields.is_empty() {
            return Err(Error::InvalidConfig("descr_fields cannot be empty".into()));
        }
        if !(self.min_score < self.max_score) {
            return Err(Error::InvalidConfig(format!(
                "min_score {} must be below max_score {}",
                self.min_score, self.max_score
            )));
        }
        Ok(())
    }
}

/// Configuration for the genre profile distiller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistillerConfig {
    /// Minimum fraction of a genre's tracks carrying a tag for it to be typical
    pub typical_thr_tags: f64,
    pub rigid_thr_tags: f64,
    pub typical_thr_words: f64,
    pub rigid_thr_words: f64,
    /// Minimum absolute document frequency for lyric words
    pub min_df_words: usize,
    pub topk_typical: usize,
    pub max_rigid: usize,
    /// Balance between in-genre prevalence and cross-genre specificity
    pub alpha: f64,
    pub common_penalty: f64,
    pub distinctive_max_genres: usize,
    pub distinctive_boost: f64,
    /// Extra discount applied to lyric words relative to tags
    pub word_discount: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    /// Weight given to every typical property when all scores tie
    pub uniform_weight: f64,
}

impl Default for DistillerConfig {
    fn default() -> Self {
        Self {
            typical_thr_tags: 0.85,
            rigid_thr_tags: 0.98,
            typical_thr_words: 0.85,
            rigid_thr_words: 0.98,
            min_df_words: 10,
            topk_typical: 5,
            max_rigid: 3,
            alpha: 0.45,
            common_penalty: 0.40,
            distinctive_max_genres: 2,
            distinctive_boost: 1.20,
            word_discount: 0.8,
            min_weight: 0.60,
            max_weight: 0.95,
            uniform_weight: 0.80,
        }
    }
}

impl DistillerConfig {
    /// Permissive thresholds: more properties survive, at the cost of noise.
    pub fn light() -> Self {
        Self {
            typical_thr_tags: 0.60,
            rigid_thr_tags: 0.95,
            typical_thr_words: 0.60,
            rigid_thr_words: 0.95,
            min_df_words: 3,
            topk_typical: 12,
            max_rigid: 5,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("typical_thr_tags", self.typical_thr_tags),
            ("rigid_thr_tags", self.rigid_thr_tags),
            ("typical_thr_words", self.typical_thr_words),
            ("rigid_thr_words", self.rigid_thr_words),
            ("alpha", self.alpha),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.common_penalty <= 0.0 || self.common_penalty >= 1.0 {
            return Err(Error::InvalidConfig(
                "common_penalty must be within (0, 1)".into(),
            ));
        }
        if self.distinctive_boost <= 1.0 {
            return Err(Error::InvalidConfig(
                "distinctive_boost must be greater than 1".into(),
            ));
        }
        if !(self.min_weight < self.max_weight) {
            return Err(Error::InvalidConfig(format!(
                "min_weight {} must be below max_weight {}",
                self.min_weight, self.max_weight
            )));
        }
        Ok(())
    }
}

/// Configuration for the prototype matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Fraction of active properties that must be found in a track's text
    pub min_match_rate: f64,
    /// Minimum number of distinct anchors a track must contain
    pub min_anchors: usize,
    /// Added once when any active property appears in a title field
    pub title_boost: f64,
    pub title_fields: Vec<String>,
    pub descr_fields: Vec<String>,
    /// Cap on the number of reported results
    pub max_results: Option<usize>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_match_rate: 0.15,
            min_anchors: 1,
            title_boost: 0.1,
            title_fields: strings(&["title", "artist"]),
            descr_fields: strings(&[
                "lyrics", "tags", "moods", "instruments", "subgenres", "contexts",
                "artist", "album", "year",
            ]),
            max_results: None,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_match_rate) {
            return Err(Error::InvalidConfig(format!(
                "min_match_rate must be within [0, 1], got {}",
                self.min_match_rate
            )));
        }
        if self.descr_fields.is_empty() && self.title_fields.is_empty() {
            return Err(Error::InvalidConfig(
                "matcher needs at least one descriptive or title field".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration file layout: one optional section per component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub prototype: PrototypeConfig,
    pub distiller: DistillerConfig,
    pub matcher: MatcherConfig,
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.prototype.validate()?;
        self.distiller.validate()?;
        self.matcher.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RunConfig::default().validate().is_ok());
        assert!(DistillerConfig::light().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RunConfig::from_json(r#"{"matcher": {"min_anchors": 2}}"#).unwrap();
        assert_eq!(config.matcher.min_anchors, 2);
        assert_eq!(config.matcher.min_match_rate, 0.15);
        assert_eq!(config.distiller.topk_typical, 5);
        assert_eq!(config.prototype.descr_fields.len(), 10);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let result = RunConfig::from_json(r#"{"distiller": {"rigid_thr_tags": 1.5}}"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_inverted_score_range_rejected() {
        let config = PrototypeConfig {
            min_score: 0.9,
            max_score: 0.6,
            ..PrototypeConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
