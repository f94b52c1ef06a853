//! Input files for the concept-blend engine.
//!
//! Each file pairs a head and a modifier category and lists their rigid
//! and typical properties in the layout the engine reads. The engine later
//! appends its `Result:` / `Scenario:` lines, turning the file into a
//! composite profile.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracklore_core::round_to;
use tracklore_profile::CategoryProfile;

use crate::artifacts::ProfileStore;
use crate::write_atomic;

/// Render the blend input for `head` + `modifier`
pub fn render_blend_input(head: &CategoryProfile, modifier: &CategoryProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Title: {}-{}\n", head.category, modifier.category);
    let _ = writeln!(out, "Head Concept Name: {}", head.category);
    let _ = writeln!(out, "Modifier Concept Name: {}\n", modifier.category);

    for p in &head.rigid {
        let _ = writeln!(out, "head, {}", p);
    }
    out.push('\n');
    for p in &modifier.rigid {
        let _ = writeln!(out, "modifier, {}", p);
    }
    out.push('\n');

    for p in &modifier.typical {
        let _ = writeln!(out, "T(modifier), {}, {}", p.name, round_to(p.weight, 3));
    }
    out.push('\n');
    for p in &head.typical {
        let _ = writeln!(out, "T(head), {}, {}", p.name, round_to(p.weight, 3));
    }
    out.push('\n');
    out
}

pub struct BlendInputWriter {
    profiles: ProfileStore,
    out_dir: PathBuf,
}

impl BlendInputWriter {
    pub fn new<P: AsRef<Path>>(profiles: ProfileStore, out_dir: P) -> Self {
        Self {
            profiles,
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, head: &str, modifier: &str) -> PathBuf {
        self.out_dir.join(format!("{}_{}.txt", head, modifier))
    }

    /// Write `<head>_<modifier>.txt`; categories without artifacts contribute nothing
    pub fn write_pair(&self, head: &str, modifier: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Failed to create {}", self.out_dir.display()))?;
        let head_profile = self.profiles.read(head)?;
        let modifier_profile = self.profiles.read(modifier)?;
        if head_profile.is_empty() || modifier_profile.is_empty() {
            tracing::warn!("Blending {} with {}: one side has no properties", head, modifier);
        }

        let path = self.path_for(head, modifier);
        write_atomic(&path, &render_blend_input(&head_profile, &modifier_profile))?;
        tracing::debug!("Wrote blend input {}", path.display());
        Ok(path)
    }

    /// Every ordered pair of distinct stored categories
    pub fn write_all_pairs(&self) -> Result<Vec<PathBuf>> {
        let categories = self.profiles.categories()?;
        let mut written = Vec::new();
        for head in &categories {
            for modifier in &categories {
                if head != modifier {
                    written.push(self.write_pair(head, modifier)?);
                }
            }
        }
        tracing::info!(
            "Wrote {} blend inputs for {} categories",
            written.len(),
            categories.len()
        );
        Ok(written)
    }
}
