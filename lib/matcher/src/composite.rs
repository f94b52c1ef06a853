//! Composite query profiles.
//!
//! A composite profile combines the rigid and typical properties of a
//! *head* genre and a *modifier* genre, plus an inclusion vector saying
//! which typical properties the blend engine kept.
//!
//! Text form, as written by the blend engine:
//!
//! ```text
//! Title: rap-country
//! Head Concept (Name): rap
//! Modifier Concept (Name): country
//! head, flow
//! modifier, -explicit
//! T(modifier), banjo, 0.85
//! T(head), street, 0.9
//! Result: {"banjo": 0.85, "@scenario_probability": 0.42}
//! Scenario: [1, 0, 0.42]
//! ```

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key the blend engine adds next to selected properties
const SCENARIO_PROBABILITY_KEY: &str = "@scenario_probability";
const RESULT_PREFIX: &str = "Result:";
const SCENARIO_PREFIX: &str = "Scenario:";

/// Errors raised while reading a composite profile
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("Missing header line '{0}'")]
    MissingHeader(&'static str),

    #[error("Header line '{0}' has no ':' separator")]
    MalformedHeader(String),

    #[error("Invalid profile JSON: {0}")]
    Json(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Head,
    Modifier,
}

impl Origin {
    fn parse(label: &str) -> Self {
        if label == "head" {
            Origin::Head
        } else {
            Origin::Modifier
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Head => "head",
            Origin::Modifier => "modifier",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidProperty {
    /// Property name; a leading `-` marks it negated
    pub name: String,
    pub origin: Origin,
}

impl RigidProperty {
    pub fn is_negated(&self) -> bool {
        self.name.starts_with('-')
    }

    /// Name without the negation marker
    pub fn property(&self) -> &str {
        self.name.trim_start_matches('-').trim()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypicalEntry {
    pub name: String,
    pub weight: f64,
    pub origin: Origin,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeProfile {
    pub title: String,
    pub head: String,
    pub modifier: String,
    pub rigid: Vec<RigidProperty>,
    pub typical: Vec<TypicalEntry>,
    /// One flag per `typical` entry; missing flags count as unselected
    #[serde(default)]
    pub selection: Vec<bool>,
}

impl CompositeProfile {
    pub fn new(head: impl Into<String>, modifier: impl Into<String>) -> Self {
        let head = head.into();
        let modifier = modifier.into();
        Self {
            title: format!("{}-{}", head, modifier),
            head,
            modifier,
            ..Self::default()
        }
    }

    pub fn with_rigid(mut self, name: impl Into<String>, origin: Origin) -> Self {
        self.rigid.push(RigidProperty {
            name: name.into(),
            origin,
        });
        self
    }

    pub fn with_typical(mut self, name: impl Into<String>, weight: f64, origin: Origin) -> Self {
        self.typical.push(TypicalEntry {
            name: name.into(),
            weight,
            origin,
        });
        self
    }

    pub fn with_selection(mut self, selection: Vec<bool>) -> Self {
        self.selection = selection;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        serde_json::from_str(json).map_err(|e| ProfileError::Json(e.to_string()))
    }

    /// Parse the blend engine's text form
    pub fn parse(text: &str) -> Result<Self, ProfileError> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));

        let mut header = |name: &'static str| -> Result<String, ProfileError> {
            let line = lines.next().ok_or(ProfileError::MissingHeader(name))?;
            line.split_once(':')
                .map(|(_, value)| value.trim().to_string())
                .ok_or_else(|| ProfileError::MalformedHeader(line.to_string()))
        };
        let title = header("Title")?;
        let head = header("Head Concept")?;
        let modifier = header("Modifier Concept")?;

        let mut profile = Self {
            title,
            head,
            modifier,
            ..Self::default()
        };
        let mut result_line = None;
        let mut scenario_line = None;

        for line in lines {
            if let Some(raw) = line.strip_prefix(RESULT_PREFIX) {
                result_line = Some(raw.trim());
                continue;
            }
            if let Some(raw) = line.strip_prefix(SCENARIO_PREFIX) {
                scenario_line = Some(raw.trim());
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            match fields.as_slice() {
                [label, name] if !name.is_empty() => {
                    profile.rigid.push(RigidProperty {
                        name: name.to_string(),
                        origin: Origin::parse(label),
                    });
                }
                [label, name, weight] if label.starts_with('T') && !name.is_empty() => {
                    let Ok(weight) = weight.parse::<f64>() else {
                        tracing::warn!("Skipping typical line with bad weight: {}", line);
                        continue;
                    };
                    let origin = label
                        .strip_prefix("T(")
                        .and_then(|l| l.strip_suffix(')'))
                        .map(Origin::parse)
                        .unwrap_or(Origin::Modifier);
                    profile.typical.push(TypicalEntry {
                        name: name.to_string(),
                        weight,
                        origin,
                    });
                }
                _ => tracing::debug!("Ignoring profile line: {}", line),
            }
        }

        profile.selection = match scenario_line.or(result_line) {
            Some(raw) => parse_selection(raw, &profile.typical),
            None => Vec::new(),
        };
        Ok(profile)
    }

    /// Non-negated rigid names, deduplicated in order
    pub fn anchors(&self) -> Vec<String> {
        let mut seen = AHashSet::new();
        self.rigid
            .iter()
            .filter(|r| !r.is_negated())
            .map(|r| r.property().to_string())
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect()
    }

    /// Properties whose presence disqualifies a track
    pub fn negated(&self) -> Vec<String> {
        self.rigid
            .iter()
            .filter(|r| r.is_negated())
            .map(|r| r.property().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn selected_typical(&self) -> impl Iterator<Item = &TypicalEntry> {
        self.typical
            .iter()
            .enumerate()
            .filter(|(i, _)| self.selection.get(*i).copied().unwrap_or(false))
            .map(|(_, entry)| entry)
    }

    /// Anchors followed by the selected typical properties, deduplicated
    pub fn active_properties(&self) -> Vec<String> {
        let mut active = self.anchors();
        let mut seen: AHashSet<String> = active.iter().cloned().collect();
        for entry in self.selected_typical() {
            let name = entry.name.trim();
            if !name.is_empty() && seen.insert(name.to_string()) {
                active.push(name.to_string());
            }
        }
        active
    }
}

fn bit(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f.trunc() == 1.0).unwrap_or(false),
        Value::String(s) => s.trim() == "1",
        Value::Bool(b) => *b,
        _ => false,
    }
}

/// Decode an inclusion vector for `typical`.
///
/// Accepts a JSON array whose last element is the scenario score, a JSON
/// object keyed by the selected property names, or the legacy `'1','0',...`
/// list. Anything else selects nothing.
pub fn parse_selection(raw: &str, typical: &[TypicalEntry]) -> Vec<bool> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) if !items.is_empty() => {
            return items[..items.len() - 1].iter().map(bit).collect();
        }
        Ok(Value::Object(selected)) => {
            return typical
                .iter()
                .map(|entry| {
                    entry.name != SCENARIO_PROBABILITY_KEY && selected.contains_key(&entry.name)
                })
                .collect();
        }
        _ => {}
    }

    let body = raw.trim().trim_matches(|c| c == '[' || c == ']');
    body.split(',')
        .map(|p| p.trim().trim_matches(|c| c == '\'' || c == '"'))
        .filter_map(|p| match p {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = "\
# produced by the blend engine
Title: rap-country
Head Concept (Name): rap
Modifier Concept (Name): country

head, flow
head, street
modifier, -explicit
T(modifier), banjo, 0.85
T(head), street, 0.9
T(head), gold, 0.7
Result: {\"banjo\": 0.85, \"gold\": 0.7, \"@scenario_probability\": 0.42}
";

    #[test]
    fn test_parse_text_profile() {
        let profile = CompositeProfile::parse(PROFILE).unwrap();

        assert_eq!(profile.title, "rap-country");
        assert_eq!(profile.head, "rap");
        assert_eq!(profile.modifier, "country");
        assert_eq!(profile.rigid.len(), 3);
        assert_eq!(profile.typical.len(), 3);
        assert_eq!(profile.typical[0].origin, Origin::Modifier);
        assert_eq!(profile.typical[1].origin, Origin::Head);
        assert_eq!(profile.selection, vec![true, false, true]);
    }

    #[test]
    fn test_active_properties_and_anchors() {
        let profile = CompositeProfile::parse(PROFILE).unwrap();

        assert_eq!(profile.anchors(), vec!["flow", "street"]);
        assert_eq!(profile.negated(), vec!["explicit"]);
        assert_eq!(profile.active_properties(), vec!["flow", "street", "banjo", "gold"]);
    }

    #[test]
    fn test_scenario_line_preferred_over_result() {
        let text = format!("{}Scenario: [0, 1, 0, 0.42]\n", PROFILE);
        let profile = CompositeProfile::parse(&text).unwrap();
        assert_eq!(profile.selection, vec![false, true, false]);
        assert_eq!(profile.active_properties(), vec!["flow", "street"]);
    }

    #[test]
    fn test_missing_vector_selects_nothing() {
        let profile = CompositeProfile::parse(
            "Title: a-b\nHead: a\nModifier: b\nhead, x\nT(head), y, 0.8\n",
        )
        .unwrap();
        assert!(profile.selection.is_empty());
        assert_eq!(profile.active_properties(), vec!["x"]);
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let err = CompositeProfile::parse("Title: a-b\nHead: a\n").unwrap_err();
        assert_eq!(err, ProfileError::MissingHeader("Modifier Concept"));

        let err = CompositeProfile::parse("Title a-b\nHead: a\nModifier: b\n").unwrap_err();
        assert!(matches!(err, ProfileError::MalformedHeader(_)));
    }

    #[test]
    fn test_bad_weight_line_skipped() {
        let profile =
            CompositeProfile::parse("Title: a-b\nHead: a\nModifier: b\nT(head), y, heavy\n")
                .unwrap();
        assert!(profile.typical.is_empty());
    }

    #[test]
    fn test_parse_selection_forms() {
        let typical = vec![
            TypicalEntry { name: "a".into(), weight: 0.9, origin: Origin::Head },
            TypicalEntry { name: "b".into(), weight: 0.8, origin: Origin::Modifier },
        ];

        assert_eq!(parse_selection("[1, 0, 0.5]", &typical), vec![true, false]);
        assert_eq!(parse_selection("{\"b\": 0.8}", &typical), vec![false, true]);
        assert_eq!(parse_selection("['1','1']", &typical), vec![true, true]);
        assert_eq!(parse_selection("[]", &typical), Vec::<bool>::new());
        assert_eq!(parse_selection("garbage", &typical), Vec::<bool>::new());
    }

    #[test]
    fn test_builder_and_json() {
        let profile = CompositeProfile::new("metal", "pop")
            .with_rigid("riff", Origin::Head)
            .with_typical("hook", 0.9, Origin::Modifier)
            .with_selection(vec![true]);
        assert_eq!(profile.title, "metal-pop");

        let json = serde_json::to_string(&profile).unwrap();
        let back = CompositeProfile::from_json(&json).unwrap();
        assert_eq!(back, profile);
        assert_eq!(back.active_properties(), vec!["riff", "hook"]);
    }
}
