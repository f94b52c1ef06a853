//! # tracklore Core
//!
//! Core library for tracklore.
//!
//! This crate provides the catalog data model and the per-track text
//! machinery:
//!
//! - [`Track`] - A catalog record (lyrics, tags, moods, ...)
//! - [`TermNormalizer`] - Free text to a filtered, lemmatized term stream
//! - [`Lemmatizer`] - Pluggable lemmatization / part-of-speech capability
//! - [`PrototypeBuilder`] - Per-track weighted term profiles ([`Prototype`])
//! - [`TrackFilter`] - Loose textual containment over track fields
//!
//! ## Example
//!
//! ```rust
//! use tracklore_core::{PrototypeBuilder, PrototypeConfig, Stopwords, TermNormalizer, Track};
//!
//! let builder = PrototypeBuilder::new(
//!     TermNormalizer::without_lemmatizer(Stopwords::english()),
//!     PrototypeConfig::default(),
//! );
//!
//! let track = Track::new("rap_001")
//!     .with_title("Money Talks")
//!     .with_lyrics("money money fame");
//!
//! let prototype = builder.build(&track).unwrap();
//! assert_eq!(prototype.get("money"), Some(0.9));
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod filter;
pub mod lemmatizer;
pub mod normalizer;
pub mod prototype;
pub mod repetition;
pub mod text;
pub mod track;

pub use config::{DistillerConfig, MatcherConfig, PrototypeConfig, RunConfig};
pub use counter::OrderedCounter;
pub use error::{Error, Result};
pub use filter::{contains_word, Filter, FilterCondition, TrackFilter};
pub use lemmatizer::{Lemmatizer, LexiconLemmatizer, NoLemmatizer, PartOfSpeech, TaggedToken};
pub use normalizer::{Term, TermNormalizer};
pub use prototype::{round_to, Prototype, PrototypeBuilder, PrototypeEntry};
pub use repetition::{enrich_record, enrich_track, repetition_scores, RepetitionReport};
pub use text::{norm_token, tokenize, Stopwords};
pub use track::{artifact_key, Track};
