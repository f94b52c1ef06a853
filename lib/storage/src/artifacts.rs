//! Flat per-run artifacts.
//!
//! Prototypes are stored one file per track (`<key>.txt`, lines
//! `lemma:<padding>score`). Category profiles are stored as
//! `typical/<category>.txt` (`name: weight`) and `rigid/<category>.txt`
//! (one name per line).

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracklore_core::{Prototype, PrototypeEntry};
use tracklore_matcher::PrototypeSource;
use tracklore_profile::{CategoryProfile, TypicalProperty};

use crate::write_atomic;

/// Column the score is padded towards in prototype files
const PROTOTYPE_COLUMN: usize = 21;
const ARTIFACT_EXT: &str = "txt";
const TYPICAL_DIR: &str = "typical";
const RIGID_DIR: &str = "rigid";

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

fn lines_to_text(lines: &[String]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

/// Read an artifact, treating a missing file as empty
fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// `lemma:<padding>score`, padding at least one space
pub fn prototype_line(lemma: &str, score: f64) -> String {
    let pad = PROTOTYPE_COLUMN.saturating_sub(lemma.chars().count()).max(1);
    format!("{}:{}{}", lemma, " ".repeat(pad), score)
}

/// Parse a prototype artifact. Malformed lines are skipped.
pub fn parse_prototype(text: &str) -> Prototype {
    let entries = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| {
            let parsed = line
                .split_once(':')
                .and_then(|(lemma, score)| Some((lemma.trim(), score.trim().parse::<f64>().ok()?)));
            match parsed {
                Some((lemma, score)) if !lemma.is_empty() => Some(PrototypeEntry {
                    lemma: lemma.to_string(),
                    count: 0,
                    score,
                }),
                _ => {
                    tracing::warn!("Skipping malformed prototype line {}: {:?}", i + 1, line);
                    None
                }
            }
        })
        .collect();
    Prototype::from_entries(entries)
}

/// Parse a typical artifact. Malformed lines are skipped.
pub fn parse_typical(text: &str) -> Vec<TypicalProperty> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (name, weight) = line.rsplit_once(':')?;
            match weight.trim().parse::<f64>() {
                Ok(weight) => Some(TypicalProperty {
                    name: name.trim().to_string(),
                    weight,
                }),
                Err(_) => {
                    tracing::warn!("Skipping malformed typical line: {:?}", line);
                    None
                }
            }
        })
        .collect()
}

pub fn parse_rigid(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Directory of per-track prototype artifacts
#[derive(Debug, Clone)]
pub struct PrototypeStore {
    dir: PathBuf,
}

impl PrototypeStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, ARTIFACT_EXT))
    }

    pub fn write(&self, key: &str, prototype: &Prototype) -> Result<PathBuf> {
        ensure_dir(&self.dir)?;
        let lines: Vec<String> = prototype
            .iter()
            .map(|e| prototype_line(&e.lemma, e.score))
            .collect();
        let path = self.path_for(key);
        write_atomic(&path, &lines_to_text(&lines))?;
        Ok(path)
    }

    /// Write every prototype, returning how many files were written
    pub fn write_all(&self, prototypes: &[(String, Prototype)]) -> Result<usize> {
        for (key, prototype) in prototypes {
            self.write(key, prototype)?;
        }
        tracing::info!(
            "Wrote {} prototype artifacts to {}",
            prototypes.len(),
            self.dir.display()
        );
        Ok(prototypes.len())
    }

    pub fn read(&self, key: &str) -> Result<Option<Prototype>> {
        Ok(read_optional(&self.path_for(key))?.map(|text| parse_prototype(&text)))
    }
}

impl PrototypeSource for PrototypeStore {
    fn prototype(&self, key: &str) -> Option<Cow<'_, Prototype>> {
        match self.read(key) {
            Ok(prototype) => prototype.map(Cow::Owned),
            Err(e) => {
                tracing::warn!("Ignoring prototype {}: {:#}", key, e);
                None
            }
        }
    }
}

/// `typical/` and `rigid/` artifacts of every category
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn typical_path(&self, category: &str) -> PathBuf {
        self.root
            .join(TYPICAL_DIR)
            .join(format!("{}.{}", category, ARTIFACT_EXT))
    }

    pub fn rigid_path(&self, category: &str) -> PathBuf {
        self.root
            .join(RIGID_DIR)
            .join(format!("{}.{}", category, ARTIFACT_EXT))
    }

    /// Write both artifacts of a profile; empty profiles give empty files
    pub fn write(&self, profile: &CategoryProfile) -> Result<()> {
        ensure_dir(&self.root.join(TYPICAL_DIR))?;
        ensure_dir(&self.root.join(RIGID_DIR))?;
        write_atomic(
            &self.typical_path(&profile.category),
            &lines_to_text(&profile.typical_lines()),
        )?;
        write_atomic(
            &self.rigid_path(&profile.category),
            &lines_to_text(&profile.rigid_lines()),
        )
    }

    pub fn write_all(&self, profiles: &[CategoryProfile]) -> Result<()> {
        for profile in profiles {
            self.write(profile)?;
        }
        tracing::info!(
            "Wrote {} category profiles to {}",
            profiles.len(),
            self.root.display()
        );
        Ok(())
    }

    /// Read a category back; missing artifacts read as empty.
    /// The track count is not persisted and reads as zero.
    pub fn read(&self, category: &str) -> Result<CategoryProfile> {
        let typical = read_optional(&self.typical_path(category))?
            .map(|t| parse_typical(&t))
            .unwrap_or_default();
        let rigid = read_optional(&self.rigid_path(category))?
            .map(|t| parse_rigid(&t))
            .unwrap_or_default();
        Ok(CategoryProfile {
            category: category.to_string(),
            track_count: 0,
            typical,
            rigid,
        })
    }

    /// Categories with a typical artifact, sorted by name
    pub fn categories(&self) -> Result<Vec<String>> {
        let dir = self.root.join(TYPICAL_DIR);
        let mut categories: Vec<String> = fs::read_dir(&dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|e| e == ARTIFACT_EXT).unwrap_or(false))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        categories.sort();
        Ok(categories)
    }
}
