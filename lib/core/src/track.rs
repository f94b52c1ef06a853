use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Characters stripped from track identifiers before they become file names
const CHARS_NOT_ALLOWED: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// A catalog record describing one music track.
///
/// Tracks are loaded once per run and never mutated afterwards; every
/// component borrows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub lyrics: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub moods: Vec<String>,
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(default)]
    pub subgenres: Vec<String>,
    #[serde(default)]
    pub contexts: Vec<String>,
}

impl Track {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    #[must_use]
    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = lyrics.into();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_subgenres<I, S>(mut self, subgenres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subgenres = subgenres.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_moods<I, S>(mut self, moods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moods = moods.into_iter().map(Into::into).collect();
        self
    }

    /// Text of a descriptive field by its catalog name.
    ///
    /// List-valued fields are joined with single spaces. Unknown field
    /// names yield `None`, which callers treat as empty text.
    pub fn field_text(&self, field: &str) -> Option<String> {
        let text = match field {
            "ID" | "id" => self.id.clone(),
            "title" => self.title.clone(),
            "artist" => self.artist.clone(),
            "album" => self.album.clone(),
            "year" => self.year.clone(),
            "lyrics" => self.lyrics.clone(),
            "tags" => self.tags.join(" "),
            "moods" => self.moods.join(" "),
            "instruments" => self.instruments.join(" "),
            "subgenres" => self.subgenres.join(" "),
            "contexts" => self.contexts.join(" "),
            _ => return None,
        };
        Some(text)
    }

    /// Space-prefixed concatenation of the selected fields, in order.
    pub fn description(&self, fields: &[String]) -> String {
        let joined = fields
            .iter()
            .map(|f| self.field_text(f).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ");
        format!(" {}", joined)
    }

    /// File-system safe key under which this track's artifacts are stored.
    ///
    /// Falls back to a slug of artist, title and year when the record has
    /// no identifier.
    pub fn artifact_key(&self) -> String {
        let raw = if self.id.trim().is_empty() {
            let slug = slugify(&format!("{}_{}_{}", self.artist, self.title, self.year));
            if slug.is_empty() {
                "artwork".to_string()
            } else {
                slug
            }
        } else {
            self.id.clone()
        };
        artifact_key(&raw)
    }

    /// Normalize a raw JSON record into a track.
    ///
    /// Records that already carry `ID` and `lyrics` are read field by field;
    /// anything else is treated as an "extended" crawler record and mapped
    /// onto the flat schema, synthesizing an identifier from genre, artist,
    /// title, year and the Genius id.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        if obj.contains_key("ID") && obj.contains_key("lyrics") {
            return Some(Self {
                id: value_text(obj.get("ID")),
                title: value_text(obj.get("title")),
                artist: value_text(obj.get("artist")),
                album: value_text(obj.get("album")),
                year: value_text(obj.get("year")),
                lyrics: value_text(obj.get("lyrics")),
                tags: value_list(obj.get("tags")),
                moods: value_list(obj.get("moods")),
                instruments: value_list(obj.get("instruments")),
                subgenres: value_list(obj.get("subgenres")),
                contexts: value_list(obj.get("contexts")),
            });
        }

        let title = value_text(obj.get("title"));
        let artist = value_text(obj.get("artist"));
        let year = value_text(obj.get("year"));
        let lyrics = value_text(obj.get("lyrics"));
        let genre = value_text(obj.get("genre"));

        let genius = obj.get("genius").and_then(Value::as_object);
        let album = genius
            .and_then(|g| g.get("album"))
            .map(|v| value_text(Some(v)))
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "Single".to_string());
        let genius_id = genius
            .and_then(|g| g.get("genius_id"))
            .map(|v| value_text(Some(v)))
            .filter(|g| !g.is_empty() && g != "0" && g != "false");
        let raw_tags = value_list(genius.and_then(|g| g.get("raw_tags")));
        let instruments = value_list(
            obj.get("plan")
                .and_then(Value::as_object)
                .and_then(|p| p.get("instrumentation")),
        );

        let slug_artist = prefix_or(&slugify(&artist), 10, "artist");
        let slug_title = prefix_or(&slugify(&title), 16, "title");
        let mut id = format!(
            "{}_{}_{}",
            if genre.is_empty() { "music" } else { genre.as_str() },
            slug_artist,
            slug_title
        );
        if !year.is_empty() {
            id.push('_');
            id.push_str(&year);
        }
        if let Some(gid) = genius_id {
            id.push('_');
            id.push_str(&gid);
        }

        let mut tags = Vec::with_capacity(raw_tags.len() + 1);
        if !genre.is_empty() {
            tags.push(genre.clone());
        }
        tags.extend(raw_tags);

        Some(Self {
            id,
            title,
            artist,
            album,
            year,
            lyrics,
            tags,
            moods: Vec::new(),
            instruments,
            subgenres: if genre.is_empty() { Vec::new() } else { vec![genre] },
            contexts: Vec::new(),
        })
    }
}

/// Strip characters that are illegal in file names and replace quotes.
pub fn artifact_key(id: &str) -> String {
    id.chars()
        .filter(|c| !CHARS_NOT_ALLOWED.contains(c))
        .map(|c| if c == '\'' { '_' } else { c })
        .collect()
}

/// Lowercase, alphanumeric runs joined by single dashes.
pub fn slugify(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

fn prefix_or(s: &str, n: usize, fallback: &str) -> String {
    let prefix: String = s.chars().take(n).collect();
    if prefix.is_empty() {
        fallback.to_string()
    } else {
        prefix
    }
}

/// Render a JSON value as flat text: lists are space-joined, null is empty.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| value_text(Some(v)))
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => other.to_string(),
    }
}

fn value_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(|v| value_text(Some(v))).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_record_defaults_missing_fields() {
        let track = Track::from_value(&json!({
            "ID": "rap_1",
            "lyrics": "money on my mind",
            "year": 2019,
            "tags": null
        }))
        .unwrap();

        assert_eq!(track.id, "rap_1");
        assert_eq!(track.year, "2019");
        assert!(track.tags.is_empty());
        assert!(track.title.is_empty());
    }

    #[test]
    fn test_extended_record_synthesizes_id() {
        let track = Track::from_value(&json!({
            "title": "Back in Black",
            "artist": "AC/DC",
            "year": "1980",
            "genre": "rock",
            "lyrics": "back in black",
            "genius": {"genius_id": 1234, "raw_tags": ["hard_rock"]},
            "plan": {"instrumentation": ["distorted_guitar"]}
        }))
        .unwrap();

        assert_eq!(track.id, "rock_ac-dc_back-in-black_1980_1234");
        assert_eq!(track.album, "Single");
        assert_eq!(track.tags, vec!["rock", "hard_rock"]);
        assert_eq!(track.subgenres, vec!["rock"]);
        assert_eq!(track.instruments, vec!["distorted_guitar"]);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Track::from_value(&json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_artifact_key_sanitizes() {
        assert_eq!(artifact_key("rap/drill:don't?"), "rapdrilldon_t");
        let anonymous = Track::default().with_artist("Kanye West").with_title("Power");
        assert_eq!(anonymous.artifact_key(), "kanye-west-power");
        assert_eq!(Track::default().artifact_key(), "artwork");
    }

    #[test]
    fn test_field_text_joins_lists() {
        let track = Track::new("x").with_tags(["trap", "808"]);
        assert_eq!(track.field_text("tags").as_deref(), Some("trap 808"));
        assert_eq!(track.field_text("unknown"), None);
        assert_eq!(
            track.description(&["title".to_string(), "tags".to_string()]),
            "  trap 808"
        );
    }
}
