//! Lyric repetition features.
//!
//! Derives the `catchy_chorus`, `hook_repetition` and `high_repetition`
//! tags from how repetitive a track's lyrics are, so the genre distiller
//! can treat them like any other tag.

use crate::counter::OrderedCounter;
use crate::prototype::round_to;
use crate::Track;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CATCHY_CHORUS: &str = "catchy_chorus";
pub const HOOK_REPETITION: &str = "hook_repetition";
pub const HIGH_REPETITION: &str = "high_repetition";

pub const DEFAULT_REP_THRESHOLD: f64 = 0.25;
/// Share of tokens the top bigram must cover to count as a chorus
const CHORUS_SHARE: f64 = 0.03;
/// Share of tokens the top trigram must cover to count as a hook
const HOOK_SHARE: f64 = 0.02;
const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgramCount {
    pub ngram: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepetitionReport {
    /// `1 - unique/total`, three decimals
    pub rep_ratio: f64,
    pub has_chorus_like: u8,
    pub has_hook_like: u8,
    pub top_terms: Vec<String>,
    pub top_bigrams: Vec<NgramCount>,
    pub top_trigrams: Vec<NgramCount>,
}

impl RepetitionReport {
    /// Tags this report implies at the given `high_repetition` threshold
    pub fn derived_tags(&self, rep_threshold: f64) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.has_chorus_like == 1 {
            tags.push(CATCHY_CHORUS);
        }
        if self.has_hook_like == 1 {
            tags.push(HOOK_REPETITION);
        }
        if self.rep_ratio >= rep_threshold {
            tags.push(HIGH_REPETITION);
        }
        tags
    }
}

/// Lowercase, blank everything but `[a-z0-9']` and whitespace, drop one-char tokens
fn repetition_tokens(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '\'' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> OrderedCounter {
    let mut counts = OrderedCounter::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            counts.add(&window.join("_"));
        }
    }
    counts
}

fn top(counts: &OrderedCounter) -> Vec<NgramCount> {
    counts
        .most_common()
        .into_iter()
        .take(TOP_N)
        .map(|(ngram, count)| NgramCount {
            ngram: ngram.to_string(),
            count,
        })
        .collect()
}

pub fn repetition_scores(text: &str) -> RepetitionReport {
    let tokens = repetition_tokens(text);
    if tokens.is_empty() {
        return RepetitionReport::default();
    }
    let total = tokens.len() as f64;

    let mut unigrams = OrderedCounter::new();
    for token in &tokens {
        unigrams.add(token);
    }
    let rep_ratio = (1.0 - unigrams.len() as f64 / total).max(0.0);

    let top_bigrams = top(&ngram_counts(&tokens, 2));
    let top_trigrams = top(&ngram_counts(&tokens, 3));
    let share = |ngrams: &[NgramCount]| {
        ngrams
            .first()
            .map(|n| f64::from(n.count) / total)
            .unwrap_or(0.0)
    };

    RepetitionReport {
        rep_ratio: round_to(rep_ratio, 3),
        has_chorus_like: u8::from(share(&top_bigrams) >= CHORUS_SHARE),
        has_hook_like: u8::from(share(&top_trigrams) >= HOOK_SHARE),
        top_terms: unigrams
            .most_common()
            .into_iter()
            .take(TOP_N)
            .map(|(t, _)| t.to_string())
            .collect(),
        top_bigrams,
        top_trigrams,
    }
}

fn merge_tags(existing: &[String], derived: &[&str]) -> Vec<String> {
    let mut tags: Vec<String> = existing
        .iter()
        .cloned()
        .chain(derived.iter().map(|t| t.to_string()))
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Copy of `track` with repetition tags added; tags end up sorted and unique
pub fn enrich_track(track: &Track, rep_threshold: f64) -> (Track, RepetitionReport) {
    let report = repetition_scores(&track.lyrics);
    let mut enriched = track.clone();
    enriched.tags = merge_tags(&track.tags, &report.derived_tags(rep_threshold));
    (enriched, report)
}

/// Enrich a raw catalog record in place, keeping fields the track model
/// does not know about. Adds a `repetition` section with the full report.
pub fn enrich_record(record: &mut Value, rep_threshold: f64) -> Option<RepetitionReport> {
    let obj = record.as_object_mut()?;
    let lyrics = obj
        .get("lyrics")
        .or_else(|| obj.get("text"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let report = repetition_scores(&lyrics);

    let existing: Vec<String> = obj
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let tags = merge_tags(&existing, &report.derived_tags(rep_threshold));

    obj.insert("repetition".to_string(), serde_json::to_value(&report).ok()?);
    if !tags.is_empty() {
        obj.insert(
            "tags".to_string(),
            Value::Array(tags.into_iter().map(Value::String).collect()),
        );
    }
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_lyrics_report_nothing() {
        let report = repetition_scores("  !! ");
        assert_eq!(report, RepetitionReport::default());
        assert!(report.derived_tags(DEFAULT_REP_THRESHOLD).is_empty());
    }

    #[test]
    fn test_repetitive_lyrics_get_all_tags() {
        let lyrics = "we will rock you ".repeat(10);
        let report = repetition_scores(&lyrics);

        // 40 tokens, 4 unique
        assert_eq!(report.rep_ratio, 0.9);
        assert_eq!(report.has_chorus_like, 1);
        assert_eq!(report.has_hook_like, 1);
        assert_eq!(report.top_bigrams[0].ngram, "we_will");
        assert_eq!(report.top_terms[0], "we");
        assert_eq!(
            report.derived_tags(DEFAULT_REP_THRESHOLD),
            vec![CATCHY_CHORUS, HOOK_REPETITION, HIGH_REPETITION]
        );
    }

    #[test]
    fn test_varied_lyrics_get_no_tags() {
        let words: Vec<String> = (0..200).map(|i| format!("w{}x", i)).collect();
        let report = repetition_scores(&words.join(" "));
        assert_eq!(report.rep_ratio, 0.0);
        assert_eq!(report.has_chorus_like, 0);
        assert_eq!(report.has_hook_like, 0);
    }

    #[test]
    fn test_enrich_track_sorts_tags() {
        let track = Track::new("t")
            .with_lyrics("la la la la la la")
            .with_tags(["pop", "dance"]);
        let (enriched, _) = enrich_track(&track, DEFAULT_REP_THRESHOLD);

        assert!(enriched.tags.contains(&HIGH_REPETITION.to_string()));
        let mut sorted = enriched.tags.clone();
        sorted.sort();
        assert_eq!(enriched.tags, sorted);
        assert_eq!(track.tags, vec!["pop", "dance"]);
    }

    #[test]
    fn test_enrich_record_keeps_unknown_fields() {
        let mut record = json!({
            "ID": "x",
            "lyrics": "na na na na",
            "tags": ["rock"],
            "custom": 7
        });
        let report = enrich_record(&mut record, DEFAULT_REP_THRESHOLD).unwrap();

        assert_eq!(report.rep_ratio, 0.75);
        assert_eq!(record["custom"], 7);
        assert!(record["repetition"]["rep_ratio"].is_number());
        let tags = record["tags"].as_array().unwrap();
        assert!(tags.contains(&json!("high_repetition")));
        assert!(tags.contains(&json!("rock")));
    }
}
