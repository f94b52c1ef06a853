//! Human-readable summaries and export lines for matching runs

use crate::matcher::{MatchOutcome, RankedResult};
use serde::Serialize;
use std::fmt;

/// How many tracks a run classified into a category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub category: String,
    pub classified: usize,
    pub total: usize,
}

impl MatchSummary {
    pub fn from_outcome(category: impl Into<String>, outcome: &MatchOutcome) -> Self {
        Self {
            category: category.into(),
            classified: outcome.results.len(),
            total: outcome.total,
        }
    }

    pub fn percentage(&self) -> f64 {
        100.0 * self.classified as f64 / self.total.max(1) as f64
    }

    /// `category<TAB>classified` line of the resume export
    pub fn resume_line(&self) -> String {
        format!("{}\t{}", single_line(&self.category), self.classified)
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.classified == 0 {
            return write!(f, "No recommendable tracks for {}", self.category);
        }
        write!(
            f,
            "Classified {} of {} tracks ({:.2}%)",
            self.classified,
            self.total,
            self.percentage()
        )
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\t', '\n'], " ")
}

/// `<id> - <title>` label of a result
pub fn result_label(result: &RankedResult) -> String {
    format!("{} - {}", result.track_id, result.title)
}

/// `<id> - <title><TAB><category>` line of the recommendations export
pub fn recommendation_line(result: &RankedResult, category: &str) -> String {
    format!(
        "{}\t{}",
        single_line(&result_label(result)),
        single_line(category)
    )
}

/// Multi-line listing of a ranked result for terminal output
pub fn describe(result: &RankedResult) -> String {
    let mut matches = result.matches.clone();
    matches.sort();
    format!(
        "{}-{:.2}\n\t{}\n\t\\-> matches: {:?}",
        result.track_id,
        result.score,
        result_label(result),
        matches
    )
}
