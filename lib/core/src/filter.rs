// Textual containment filters over track fields
use crate::Track;

/// Loose word containment.
///
/// `word` must appear in `text` delimited by spaces, or followed by a
/// comma. This is substring matching on a space-padded string, not
/// tokenized word-boundary matching: multi-word properties only match as
/// a literal contiguous phrase.
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let padded = format!(" {} ", text);
    padded.contains(&format!(" {} ", word)) || padded.contains(&format!(" {},", word))
}

pub trait Filter {
    fn matches(&self, track: &Track) -> bool;
}

pub struct TrackFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone)]
pub enum FilterCondition {
    /// `value` is word-contained in at least one of `fields`
    Contains { fields: Vec<String>, value: String },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl FilterCondition {
    pub fn contains(fields: &[String], value: impl Into<String>) -> Self {
        FilterCondition::Contains {
            fields: fields.to_vec(),
            value: value.into(),
        }
    }

    /// Matches when any of `values` is contained in any of `fields`
    pub fn any_of<I, S>(fields: &[String], values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterCondition::Or(
            values
                .into_iter()
                .map(|v| FilterCondition::contains(fields, v))
                .collect(),
        )
    }
}

impl TrackFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    fn matches_condition(condition: &FilterCondition, track: &Track) -> bool {
        match condition {
            FilterCondition::Contains { fields, value } => fields.iter().any(|field| {
                track
                    .field_text(field)
                    .map(|text| contains_word(&text, value))
                    .unwrap_or(false)
            }),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, track))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, track))
            }
            FilterCondition::Not(condition) => !Self::matches_condition(condition, track),
        }
    }
}

impl Filter for TrackFilter {
    fn matches(&self, track: &Track) -> bool {
        Self::matches_condition(&self.condition, track)
    }
}
