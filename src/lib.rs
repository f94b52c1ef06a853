//! # tracklore
//!
//! Distills text profiles from a music catalog and ranks tracks against
//! blended genre profiles.
//!
//! A run moves through four batch steps:
//!
//! 1. **Prototypes** - every track's descriptive text becomes a weighted
//!    lemma profile, persisted as one flat file per track.
//! 2. **Category profiles** - per macro-genre document frequencies are
//!    reduced to weighted *typical* properties and binary *rigid* anchors.
//! 3. **Blend input** - two genres' profiles are written out for an
//!    external concept-blend engine, which picks the typical properties to
//!    keep.
//! 4. **Recommendation** - the blended (composite) profile is matched
//!    against the catalog with coverage, anchor and negation rules.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! tracklore prototypes --input catalog.json --out prototypes/
//! tracklore profiles --input catalog.json --out profiles/
//! tracklore blend-input --profiles profiles/ --out blends/ rap country
//! tracklore recommend blends/rap_country.txt --input catalog.json --prototypes prototypes/
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use tracklore::prelude::*;
//!
//! let tracks = vec![
//!     Track::new("t1").with_tags(["rap", "street"]).with_lyrics("street flow"),
//!     Track::new("t2").with_tags(["country"]).with_lyrics("banjo road"),
//! ];
//!
//! let builder = PrototypeBuilder::new(
//!     TermNormalizer::without_lemmatizer(Stopwords::english()),
//!     PrototypeConfig::default(),
//! );
//! let index: PrototypeIndex = builder.build_all(&tracks).into_iter().collect();
//!
//! let profiles = CategoryProfileDistiller::new(GenreLexicon::default(), DistillerConfig::default())
//!     .distill(&tracks);
//! let rap = profiles.iter().find(|p| p.category == "rap").unwrap();
//!
//! let mut composite = CompositeProfile::new("rap", "country");
//! for anchor in &rap.rigid {
//!     composite = composite.with_rigid(anchor.clone(), Origin::Head);
//! }
//! let outcome = PrototypeMatcher::default().rank(&MatchQuery::from_profile(&composite), &tracks, &index);
//! assert_eq!(outcome.results[0].track_id, "t1");
//! ```
//!
//! ## Crate Structure
//!
//! - `tracklore-core` - Track model, configuration, term normalization, prototypes
//! - `tracklore-profile` - Genre lexicon and category profile distiller
//! - `tracklore-matcher` - Composite profiles and the prototype matcher
//! - `tracklore-storage` - Catalog loading, artifacts, blend inputs, exports

pub mod pipeline;

// Re-export core types
pub use tracklore_core::{
    DistillerConfig, MatcherConfig, PrototypeConfig, RunConfig,
    Track, Prototype, PrototypeEntry, PrototypeBuilder,
    Lemmatizer, LexiconLemmatizer, NoLemmatizer, PartOfSpeech, TaggedToken,
    TermNormalizer, Stopwords,
    Filter, FilterCondition, TrackFilter,
    Error, Result,
};

// Re-export distillation
pub use tracklore_profile::{CategoryProfile, CategoryProfileDistiller, GenreLexicon, TypicalProperty};

// Re-export matching
pub use tracklore_matcher::{
    CompositeProfile, MatchOutcome, MatchQuery, MatchSummary, Origin, ProfileError,
    PrototypeIndex, PrototypeMatcher, PrototypeSource, RankedResult,
};

// Re-export storage
pub use tracklore_storage::{BlendInputWriter, Catalog, ProfileStore, PrototypeStore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DistillerConfig, MatcherConfig, PrototypeConfig, RunConfig,
        Track, Prototype, PrototypeBuilder,
        Lemmatizer, TermNormalizer, Stopwords,
        CategoryProfile, CategoryProfileDistiller, GenreLexicon,
        CompositeProfile, MatchQuery, Origin, PrototypeIndex, PrototypeMatcher, RankedResult,
        ProfileStore, PrototypeStore,
        Error, Result,
    };
}
