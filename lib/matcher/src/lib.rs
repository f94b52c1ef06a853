//! # tracklore Matcher
//!
//! Ranks catalog tracks against a composite genre profile.
//!
//! - [`CompositeProfile`] - Head/modifier blend of rigid and typical properties
//! - [`MatchQuery`] - Active properties, anchors and negations of a run
//! - [`PrototypeMatcher`] - Prototype scoring plus coverage and anchor admission
//! - [`MatchSummary`] - Classified/total report of a run
//!
//! ## Example
//!
//! ```rust
//! use tracklore_core::{Prototype, PrototypeEntry, Track};
//! use tracklore_matcher::{CompositeProfile, MatchQuery, Origin, PrototypeIndex, PrototypeMatcher};
//!
//! let profile = CompositeProfile::new("rap", "country")
//!     .with_rigid("flow", Origin::Head)
//!     .with_typical("banjo", 0.85, Origin::Modifier)
//!     .with_selection(vec![true]);
//!
//! let tracks = vec![Track::new("t1").with_lyrics("flow over banjo")];
//! let index: PrototypeIndex = std::iter::once((
//!     "t1".to_string(),
//!     Prototype::from_entries(vec![PrototypeEntry { lemma: "banjo".into(), count: 2, score: 0.9 }]),
//! ))
//! .collect();
//!
//! let outcome = PrototypeMatcher::default().rank(&MatchQuery::from_profile(&profile), &tracks, &index);
//! assert_eq!(outcome.results[0].matches, vec!["flow", "banjo"]);
//! ```

pub mod composite;
pub mod matcher;
pub mod report;

pub use composite::{
    parse_selection, CompositeProfile, Origin, ProfileError, RigidProperty, TypicalEntry,
};
pub use matcher::{
    MatchOutcome, MatchQuery, PrototypeIndex, PrototypeMatcher, PrototypeSource, RankedResult,
};
pub use report::{describe, recommendation_line, result_label, MatchSummary};
