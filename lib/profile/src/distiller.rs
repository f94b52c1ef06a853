//! Category profile distillation.
//!
//! Aggregates per-genre document frequencies over the whole catalog and
//! reduces each genre to a handful of weighted *typical* properties plus a
//! short list of *rigid* anchors.

use crate::lexicon::GenreLexicon;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracklore_core::text::norm_token;
use tracklore_core::{round_to, DistillerConfig, OrderedCounter, Track};

/// Scores closer than this are treated as equal during normalization
const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypicalProperty {
    pub name: String,
    pub weight: f64,
}

/// Distilled profile of one genre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category: String,
    /// Number of catalog tracks assigned to the category
    pub track_count: usize,
    /// Sorted by descending weight, then name
    pub typical: Vec<TypicalProperty>,
    /// Anchors in selection order
    pub rigid: Vec<String>,
}

impl CategoryProfile {
    pub fn empty(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            track_count: 0,
            typical: Vec::new(),
            rigid: Vec::new(),
        }
    }

    pub fn typical_weight(&self, name: &str) -> Option<f64> {
        self.typical
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.weight)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.typical.is_empty() && self.rigid.is_empty()
    }

    /// `name: weight` lines of the typical artifact
    pub fn typical_lines(&self) -> Vec<String> {
        self.typical
            .iter()
            .map(|p| format!("{}: {}", p.name, p.weight))
            .collect()
    }

    pub fn rigid_lines(&self) -> Vec<String> {
        self.rigid.clone()
    }
}

/// Document frequencies of one genre
#[derive(Debug, Default)]
struct GenreStats {
    tracks: usize,
    tag_df: OrderedCounter,
    word_df: OrderedCounter,
}

impl GenreStats {
    fn observe(&mut self, tags: &[String], words: &[String]) {
        self.tracks += 1;
        for tag in tags {
            self.tag_df.add(tag);
        }
        for word in words {
            self.word_df.add(word);
        }
    }

    /// Every property seen in this genre, tags and words alike
    fn properties(&self) -> AHashSet<&str> {
        self.tag_df.keys().chain(self.word_df.keys()).collect()
    }
}

/// Insertion-ordered accumulator of candidate scores
#[derive(Debug, Default)]
struct ScoreBoard {
    index: AHashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl ScoreBoard {
    fn add(&mut self, name: &str, score: f64) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 += score,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), score));
            }
        }
    }
}

fn unique_in_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = AHashSet::new();
    items
        .into_iter()
        .filter(|item| !item.is_empty() && seen.insert(item.clone()))
        .collect()
}

pub struct CategoryProfileDistiller {
    lexicon: GenreLexicon,
    config: DistillerConfig,
}

impl CategoryProfileDistiller {
    pub fn new(lexicon: GenreLexicon, config: DistillerConfig) -> Self {
        Self { lexicon, config }
    }

    pub fn lexicon(&self) -> &GenreLexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &DistillerConfig {
        &self.config
    }

    /// One profile per macro-genre of the lexicon, in lexicon order.
    /// Genres without tracks get an empty profile.
    pub fn distill(&self, tracks: &[Track]) -> Vec<CategoryProfile> {
        let mut stats: AHashMap<&str, GenreStats> = AHashMap::new();
        let mut unassigned = 0usize;

        for track in tracks {
            let genres = self.lexicon.assign(track);
            if genres.is_empty() {
                unassigned += 1;
                continue;
            }
            let tags = unique_in_order(track.tags.iter().map(|t| norm_token(t)));
            let words = unique_in_order(self.lexicon.extract_words(&track.lyrics));
            for genre in &genres {
                if let Some(name) = self.lexicon.macro_genres.iter().find(|g| *g == genre) {
                    stats.entry(name.as_str()).or_default().observe(&tags, &words);
                }
            }
        }
        tracing::debug!(
            "{} of {} tracks matched no genre",
            unassigned,
            tracks.len()
        );

        let mut genre_count: AHashMap<&str, usize> = AHashMap::new();
        for genre_stats in stats.values() {
            for property in genre_stats.properties() {
                *genre_count.entry(property).or_insert(0) += 1;
            }
        }

        self.lexicon
            .macro_genres
            .iter()
            .map(|genre| {
                let profile = match stats.get(genre.as_str()) {
                    Some(genre_stats) => self.profile(genre, genre_stats, &genre_count),
                    None => CategoryProfile::empty(genre.as_str()),
                };
                tracing::info!(
                    "Category {}: {} tracks, {} typical, {} rigid",
                    genre,
                    profile.track_count,
                    profile.typical.len(),
                    profile.rigid.len()
                );
                profile
            })
            .collect()
    }

    fn profile(
        &self,
        genre: &str,
        stats: &GenreStats,
        genre_count: &AHashMap<&str, usize>,
    ) -> CategoryProfile {
        let cfg = &self.config;
        let n = stats.tracks as f64;

        let tag_frac: Vec<(&str, f64)> = stats
            .tag_df
            .iter()
            .map(|(tag, df)| (tag, f64::from(df) / n))
            .collect();
        let word_frac: Vec<(&str, f64)> = stats
            .word_df
            .iter()
            .filter(|(_, df)| *df as usize >= cfg.min_df_words)
            .map(|(word, df)| (word, f64::from(df) / n))
            .collect();

        let count_of = |p: &str| genre_count.get(p).copied().unwrap_or(0);
        let base = |p: &str, v: f64| {
            let idf = (2.0 + count_of(p) as f64).ln();
            cfg.alpha * v + (1.0 - cfg.alpha) * (v / idf)
        };

        let mut board = ScoreBoard::default();
        for &(tag, v) in &tag_frac {
            if v >= cfg.typical_thr_tags {
                board.add(tag, base(tag, v));
            }
        }
        for &(word, v) in &word_frac {
            let generic = self.lexicon.is_common(word) && !self.lexicon.is_whitelisted(word);
            if v >= cfg.typical_thr_words && !generic {
                board.add(word, base(word, v) * cfg.word_discount);
            }
        }

        for (name, score) in board.entries.iter_mut() {
            if self.lexicon.is_common(name) {
                *score *= cfg.common_penalty;
            }
            if count_of(name) <= cfg.distinctive_max_genres {
                *score *= cfg.distinctive_boost;
            }
        }

        let mut ranked = board.entries;
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(cfg.topk_typical);

        let mut typical = self.normalize(ranked);
        typical.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.name.cmp(&b.name)));

        let rigid_tags = tag_frac
            .iter()
            .filter(|(_, v)| *v >= cfg.rigid_thr_tags)
            .map(|(tag, _)| tag.to_string());
        let rigid_words = word_frac
            .iter()
            .filter(|(word, v)| self.lexicon.is_whitelisted(word) && *v >= cfg.rigid_thr_words)
            .map(|(word, _)| word.to_string());
        let mut rigid = unique_in_order(rigid_tags.chain(rigid_words));
        rigid.truncate(cfg.max_rigid);

        CategoryProfile {
            category: genre.to_string(),
            track_count: stats.tracks,
            typical,
            rigid,
        }
    }

    /// Min-max rescale kept scores into `[min_weight, max_weight]`
    fn normalize(&self, ranked: Vec<(String, f64)>) -> Vec<TypicalProperty> {
        let cfg = &self.config;
        if ranked.is_empty() {
            return Vec::new();
        }
        let lo = ranked.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
        let hi = ranked
            .iter()
            .map(|(_, s)| *s)
            .fold(f64::NEG_INFINITY, f64::max);

        ranked
            .into_iter()
            .map(|(name, score)| {
                let weight = if hi - lo < SCORE_EPSILON {
                    cfg.uniform_weight
                } else {
                    cfg.min_weight + (score - lo) / (hi - lo) * (cfg.max_weight - cfg.min_weight)
                };
                TypicalProperty {
                    name,
                    weight: round_to(weight, 3).clamp(cfg.min_weight, cfg.max_weight),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DistillerConfig {
        DistillerConfig {
            min_df_words: 1,
            ..DistillerConfig::default()
        }
    }

    fn distiller() -> CategoryProfileDistiller {
        CategoryProfileDistiller::new(GenreLexicon::default(), config())
    }

    fn profile<'a>(profiles: &'a [CategoryProfile], genre: &str) -> &'a CategoryProfile {
        profiles.iter().find(|p| p.category == genre).unwrap()
    }

    #[test]
    fn test_every_genre_reported_even_without_tracks() {
        let profiles = distiller().distill(&[]);

        assert_eq!(profiles.len(), 8);
        assert!(profiles.iter().all(|p| p.is_empty() && p.track_count == 0));
        assert_eq!(profiles[0].category, "rap");
    }

    #[test]
    fn test_universal_tag_is_rigid_only_in_its_genre() {
        let tracks: Vec<Track> = (0..4)
            .map(|i| Track::new(format!("r{}", i)).with_tags(["rap", "street"]))
            .chain((0..4).map(|i| Track::new(format!("c{}", i)).with_tags(["country", "banjo"])))
            .collect();
        let profiles = distiller().distill(&tracks);

        let rap = profile(&profiles, "rap");
        assert_eq!(rap.track_count, 4);
        assert!(rap.rigid.contains(&"street".to_string()));
        assert!(rap.typical_weight("street").is_some());

        let country = profile(&profiles, "country");
        assert!(!country.rigid.contains(&"street".to_string()));
        assert!(country.typical_weight("street").is_none());
    }

    #[test]
    fn test_rigid_truncated_to_max() {
        let tracks = vec![Track::new("m").with_tags(["metal", "loud", "dark", "fast", "heavy"])];
        let profiles = distiller().distill(&tracks);
        assert_eq!(profile(&profiles, "metal").rigid, vec!["metal", "loud", "dark"]);
    }

    #[test]
    fn test_equal_scores_get_uniform_weight() {
        let tracks = vec![Track::new("p").with_tags(["pop", "bright"])];
        let profiles = distiller().distill(&tracks);
        let pop = profile(&profiles, "pop");

        assert_eq!(pop.typical.len(), 2);
        assert!(pop.typical.iter().all(|p| p.weight == 0.8));
        // ties sorted by name
        assert_eq!(pop.typical_lines(), vec!["bright: 0.8", "pop: 0.8"]);
    }

    #[test]
    fn test_common_properties_are_penalized() {
        let tracks = vec![
            Track::new("a").with_tags(["rock", "catchy_chorus", "guitar"]),
            Track::new("b").with_tags(["rock", "catchy_chorus", "guitar"]),
        ];
        let profiles = distiller().distill(&tracks);
        let rock = profile(&profiles, "rock");

        assert_eq!(rock.typical[0].weight, 0.95);
        assert_eq!(rock.typical_weight("catchy_chorus"), Some(0.6));
        assert_eq!(rock.typical_weight("guitar"), Some(0.95));
    }

    #[test]
    fn test_shared_properties_rank_below_distinctive_ones() {
        let mut tracks = Vec::new();
        for genre in ["rap", "rock", "pop"] {
            tracks.push(Track::new(genre).with_tags([genre, "love"]));
        }
        tracks.push(Track::new("rap2").with_tags(["rap", "love", "bars"]));
        let mut config = config();
        config.typical_thr_tags = 0.5;
        let profiles = CategoryProfileDistiller::new(GenreLexicon::default(), config).distill(&tracks);

        // "love" is in every track but spread over three genres
        let rap = profile(&profiles, "rap");
        assert_eq!(rap.typical_weight("rap"), Some(0.95));
        assert_eq!(rap.typical_weight("bars"), Some(0.6));
        let love = rap.typical_weight("love").unwrap();
        assert!(love > 0.6 && love < 0.95);
        assert_eq!(rap.typical[0].name, "rap");
    }

    #[test]
    fn test_words_need_minimum_document_frequency() {
        let tracks: Vec<Track> = (0..3)
            .map(|i| {
                Track::new(format!("t{}", i))
                    .with_tags(["trap"])
                    .with_lyrics("drip drip on the bando")
            })
            .collect();

        let strict = DistillerConfig {
            min_df_words: 4,
            ..DistillerConfig::default()
        };
        let profiles = CategoryProfileDistiller::new(GenreLexicon::default(), strict).distill(&tracks);
        assert_eq!(profile(&profiles, "trap").rigid, vec!["trap"]);

        let profiles = distiller().distill(&tracks);
        let trap = profile(&profiles, "trap");
        assert_eq!(trap.rigid, vec!["trap", "drip", "bando"]);
        assert!(trap.typical_weight("drip").is_some());
    }

    #[test]
    fn test_distill_is_deterministic() {
        let tracks: Vec<Track> = (0..20)
            .map(|i| {
                Track::new(format!("t{}", i))
                    .with_tags(["reggae", if i % 2 == 0 { "sun" } else { "island" }, "roots"])
                    .with_lyrics("one love, jah love, island sun and drum")
            })
            .collect();
        let first = distiller().distill(&tracks);
        let second = distiller().distill(&tracks);
        assert_eq!(first, second);
    }
}
