//! # tracklore Profile
//!
//! Genre-level distillation for tracklore.
//!
//! - [`GenreLexicon`] - Which macro-genres exist and how labels map onto them
//! - [`CategoryProfileDistiller`] - Whole-catalog aggregation into [`CategoryProfile`]s
//!
//! ## Example
//!
//! ```rust
//! use tracklore_core::{DistillerConfig, Track};
//! use tracklore_profile::{CategoryProfileDistiller, GenreLexicon};
//!
//! let distiller = CategoryProfileDistiller::new(GenreLexicon::default(), DistillerConfig::default());
//! let tracks = vec![Track::new("r1").with_subgenres(["drill"]).with_tags(["dark"])];
//!
//! let profiles = distiller.distill(&tracks);
//! let rap = profiles.iter().find(|p| p.category == "rap").unwrap();
//! assert_eq!(rap.rigid, vec!["dark"]);
//! ```

pub mod distiller;
pub mod lexicon;

pub use distiller::{CategoryProfile, CategoryProfileDistiller, TypicalProperty};
pub use lexicon::GenreLexicon;
