//! Catalog loading and in-place enrichment.
//!
//! A catalog is a JSON file (an array of records, a single record or an
//! object with a `tracks` array) or a directory of such files.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracklore_core::{enrich_record, Track};

use crate::write_atomic;

/// Tracks loaded for one run
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tracks: Vec<Track>,
    /// Directory entries that could not be read or parsed
    pub skipped_files: usize,
    /// Records that were not JSON objects
    pub skipped_records: usize,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Flatten the accepted top-level shapes into a list of records
fn into_records(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("tracks") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                obj.insert("tracks".to_string(), other);
                vec![Value::Object(obj)]
            }
            None => vec![Value::Object(obj)],
        },
        _ => Vec::new(),
    }
}

fn parse_file(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("Catalog file {} is empty", path.display());
    }
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
    Ok(into_records(value))
}

/// `*.json` files of a directory, sorted by name
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list catalog directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    files.sort();
    Ok(files)
}

/// Load every record reachable from `path`.
///
/// A single unreadable file is fatal; inside a directory bad files are
/// skipped with a warning.
pub fn load_records(path: &Path) -> Result<(Vec<Value>, usize)> {
    if !path.is_dir() {
        return Ok((parse_file(path)?, 0));
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for file in json_files(path)? {
        match parse_file(&file) {
            Ok(mut items) => records.append(&mut items),
            Err(e) => {
                tracing::warn!("Skipping {}: {:#}", file.display(), e);
                skipped += 1;
            }
        }
    }
    Ok((records, skipped))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let (records, skipped_files) = load_records(path)?;

    let mut catalog = Catalog {
        tracks: Vec::with_capacity(records.len()),
        skipped_files,
        skipped_records: 0,
    };
    for (i, record) in records.iter().enumerate() {
        match Track::from_value(record) {
            Some(track) => catalog.tracks.push(track),
            None => {
                tracing::warn!("Skipping catalog record #{}: not a JSON object", i);
                catalog.skipped_records += 1;
            }
        }
    }

    tracing::info!(
        "Loaded {} tracks from {} ({} files skipped, {} records skipped)",
        catalog.tracks.len(),
        path.display(),
        catalog.skipped_files,
        catalog.skipped_records
    );
    Ok(catalog)
}

/// Add repetition tags to every record of a catalog file.
///
/// The top-level shape and unknown fields are preserved. The result is
/// written atomically to `output`, or over `input` when no output is given.
/// Returns the number of records processed.
pub fn enrich_catalog(input: &Path, output: Option<&Path>, rep_threshold: f64) -> Result<usize> {
    if input.is_dir() {
        bail!("{} is a directory; enrichment rewrites a single catalog file", input.display());
    }
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read catalog file {}", input.display()))?;
    let mut value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse catalog file {}", input.display()))?;

    let mut processed = 0usize;
    {
        let records: Vec<&mut Value> = match &mut value {
            Value::Array(items) => items.iter_mut().collect(),
            Value::Object(obj) if obj.get("tracks").map(Value::is_array).unwrap_or(false) => obj
                .get_mut("tracks")
                .and_then(Value::as_array_mut)
                .map(|items| items.iter_mut().collect())
                .unwrap_or_default(),
            other => vec![other],
        };
        for record in records {
            if enrich_record(record, rep_threshold).is_some() {
                processed += 1;
            } else {
                tracing::warn!("Skipping non-object catalog record");
            }
        }
    }

    let out_path = output.unwrap_or(input);
    let json = serde_json::to_string_pretty(&value)?;
    write_atomic(out_path, &json)?;
    tracing::info!("Enriched {} records into {}", processed, out_path.display());
    Ok(processed)
}
