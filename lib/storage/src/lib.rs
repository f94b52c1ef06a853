//! # tracklore Storage
//!
//! File-system side of a tracklore run: catalog loading and enrichment,
//! flat prototype and category artifacts, blend-engine input files and the
//! append-only recommendation exports.

pub mod artifacts;
pub mod blend;
pub mod catalog;
pub mod exports;

pub use artifacts::{
    parse_prototype, parse_rigid, parse_typical, prototype_line, ProfileStore, PrototypeStore,
};
pub use blend::{render_blend_input, BlendInputWriter};
pub use catalog::{enrich_catalog, load_catalog, load_records, Catalog};
pub use exports::{export_run, AppendLog, RECOMMENDATIONS_FILE, RESUME_FILE};

use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use std::io::Write;
use std::path::Path;

/// Replace `path` with `contents` through a temporary file and rename
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(contents.as_bytes()))
        .with_context(|| format!("Failed to write {}", path.display()))
}
