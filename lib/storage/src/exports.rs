use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracklore_matcher::{recommendation_line, MatchOutcome, MatchSummary};

pub const RECOMMENDATIONS_FILE: &str = "recommendations.tsv";
pub const RESUME_FILE: &str = "resume.tsv";

/// Append-only line log; earlier runs are never rewritten
pub struct AppendLog {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl AppendLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn append(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }
}

/// Append a matching run to `recommendations.tsv` and `resume.tsv` in `dir`.
/// Runs that classified nothing leave the resume untouched.
pub fn export_run(dir: &Path, category: &str, outcome: &MatchOutcome) -> Result<MatchSummary> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let summary = MatchSummary::from_outcome(category, outcome);

    let mut recommendations = AppendLog::open(dir.join(RECOMMENDATIONS_FILE))?;
    for result in &outcome.results {
        recommendations.append(&recommendation_line(result, category))?;
    }
    recommendations.sync()?;

    if summary.classified > 0 {
        let mut resume = AppendLog::open(dir.join(RESUME_FILE))?;
        resume.append(&summary.resume_line())?;
        resume.sync()?;
    }
    tracing::debug!(
        "Exported {} recommendations for {} to {}",
        summary.classified,
        category,
        dir.display()
    );
    Ok(summary)
}
