//! End-to-end pipeline steps, one per CLI subcommand.
//!
//! Each step takes explicit paths and configuration, so the binary stays a
//! thin argument parser and the steps can be driven from tests.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracklore_core::{
    DistillerConfig, Lemmatizer, LexiconLemmatizer, MatcherConfig, NoLemmatizer, PrototypeBuilder,
    PrototypeConfig, RunConfig, Stopwords, TermNormalizer,
};
use tracklore_matcher::{CompositeProfile, MatchOutcome, MatchQuery, MatchSummary, PrototypeMatcher};
use tracklore_profile::{CategoryProfile, CategoryProfileDistiller, GenreLexicon};
use tracklore_storage::{export_run, load_catalog, ProfileStore, PrototypeStore};

/// Run configuration from an optional JSON file, defaults otherwise
pub fn load_run_config(path: Option<&Path>) -> Result<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    RunConfig::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Lexicon-backed lemmatizer, or none when no lexicon is configured
pub fn load_lemmatizer(path: Option<&Path>) -> Result<Box<dyn Lemmatizer>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open lexicon {}", path.display()))?;
            let lexicon = LexiconLemmatizer::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to load lexicon {}", path.display()))?;
            tracing::info!("Loaded {} lexicon entries from {}", lexicon.len(), path.display());
            Ok(Box::new(lexicon))
        }
        None => {
            tracing::info!("No lexicon configured, terms are used as-is");
            Ok(Box::new(NoLemmatizer))
        }
    }
}

/// Built-in stopwords plus configured extras and an optional one-word-per-line file
pub fn load_stopwords(config: &PrototypeConfig, file: Option<&Path>) -> Result<Stopwords> {
    let mut stopwords = Stopwords::english().with_extra(&config.extra_stopwords);
    if let Some(path) = file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stopwords {}", path.display()))?;
        stopwords = stopwords.with_extra(text.lines());
    }
    Ok(stopwords)
}

pub fn load_genre_lexicon(path: Option<&Path>) -> Result<GenreLexicon> {
    let Some(path) = path else {
        return Ok(GenreLexicon::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read genre lexicon {}", path.display()))?;
    GenreLexicon::from_json(&text)
        .with_context(|| format!("Invalid genre lexicon {}", path.display()))
}

/// Counts reported by [`build_prototypes`]
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeRun {
    pub tracks: usize,
    pub written: usize,
}

pub fn build_prototypes(
    catalog: &Path,
    out_dir: &Path,
    config: &PrototypeConfig,
    stopwords_file: Option<&Path>,
) -> Result<PrototypeRun> {
    config.validate()?;
    let catalog = load_catalog(catalog)?;
    let lemmatizer = load_lemmatizer(config.lexicon_path.as_deref())?;
    let stopwords = load_stopwords(config, stopwords_file)?;

    let builder = PrototypeBuilder::new(
        TermNormalizer::new(lemmatizer.as_ref(), stopwords),
        config.clone(),
    );
    let prototypes = builder.build_all(&catalog.tracks);
    let written = PrototypeStore::new(out_dir).write_all(&prototypes)?;

    Ok(PrototypeRun {
        tracks: catalog.len(),
        written,
    })
}

pub fn distill_profiles(
    catalog: &Path,
    out_dir: &Path,
    config: &DistillerConfig,
    lexicon: GenreLexicon,
) -> Result<Vec<CategoryProfile>> {
    config.validate()?;
    let catalog = load_catalog(catalog)?;
    let distiller = CategoryProfileDistiller::new(lexicon, config.clone());
    let profiles = distiller.distill(&catalog.tracks);
    ProfileStore::new(out_dir).write_all(&profiles)?;
    Ok(profiles)
}

/// Composite profile from its text form, or JSON for `.json` files
pub fn load_composite_profile(path: &Path) -> Result<CompositeProfile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
    let profile = if is_json {
        CompositeProfile::from_json(&text)
    } else {
        CompositeProfile::parse(&text)
    };
    profile.with_context(|| format!("Invalid profile {}", path.display()))
}

/// Category label of a profile file: its file name
pub fn profile_category(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result of [`recommend`]
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub profile: CompositeProfile,
    pub outcome: MatchOutcome,
    pub summary: MatchSummary,
}

pub fn recommend(
    profile_path: &Path,
    catalog: &Path,
    prototypes_dir: &Path,
    config: &MatcherConfig,
    export_dir: Option<&Path>,
) -> Result<Recommendation> {
    config.validate()?;
    let profile = load_composite_profile(profile_path)?;
    let category = profile_category(profile_path);
    let query = MatchQuery::from_profile(&profile);
    tracing::info!(
        "Matching {} active properties ({} negated) for {}",
        query.active().len(),
        query.negated().len(),
        category
    );

    let catalog = load_catalog(catalog)?;
    let matcher = PrototypeMatcher::new(config.clone());
    let outcome = matcher.rank(&query, &catalog.tracks, &PrototypeStore::new(prototypes_dir));

    let summary = match export_dir {
        Some(dir) => export_run(dir, &category, &outcome)?,
        None => MatchSummary::from_outcome(&category, &outcome),
    };
    tracing::info!("{}", summary);

    Ok(Recommendation {
        profile,
        outcome,
        summary,
    })
}
