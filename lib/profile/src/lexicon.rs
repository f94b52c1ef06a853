//! Genre lexicon
//!
//! Declares the macro-genres the distiller produces profiles for, how raw
//! subgenre/tag labels collapse onto them, and the word lists that steer
//! lyric vocabulary (stopwords, domain whitelist, overly generic properties).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracklore_core::text::{alpha_runs, norm_token};
use tracklore_core::Track;

const MACRO_GENRES: &[&str] = &["rap", "metal", "rock", "pop", "trap", "reggae", "rnb", "country"];

const SUB_TO_MACRO: &[(&str, &str)] = &[
    ("hip_hop", "rap"), ("hiphop", "rap"), ("boom_bap", "rap"), ("boom-bap", "rap"),
    ("rap", "rap"), ("drill", "rap"),
    ("trap", "trap"),
    ("rnb", "rnb"), ("r&b", "rnb"), ("contemporary_rnb", "rnb"), ("alternative_rnb", "rnb"),
    ("reggae", "reggae"), ("dancehall", "reggae"),
    ("metal", "metal"), ("heavy_metal", "metal"), ("nu_metal", "metal"),
    ("rock", "rock"), ("alt_rock", "rock"), ("alternative_rock", "rock"), ("punk_rock", "rock"),
    ("pop", "pop"), ("synthpop", "pop"), ("dance_pop", "pop"), ("electropop", "pop"),
    ("country", "country"), ("classic_country", "country"), ("alt_country", "country"),
];

/// Properties recurring across most genres
const COMMON_GLOBAL: &[&str] = &["high_repetition", "catchy_chorus", "hook_repetition"];

const LYRIC_STOPWORDS: &[&str] = &[
    "the", "all", "a", "an", "and", "or", "but", "for", "to", "of", "in", "on", "at", "by",
    "with", "from", "as", "is", "are", "was", "were", "be", "been", "am", "do", "does", "did",
    "doing", "that", "this", "these", "those", "there", "here", "then", "than", "so", "i", "you",
    "he", "she", "we", "they", "it", "me", "him", "her", "us", "them", "my", "your", "his", "our",
    "their", "what", "which", "who", "whom", "whose", "where", "when", "why", "how", "not", "no",
    "yes", "yeah", "yah", "yo", "uh", "oh", "nah", "hmm", "im", "i'm", "ive", "i've", "ill",
    "i'll", "id", "i'd", "youre", "you're", "youve", "you've", "youll", "you'll", "youd", "you'd",
    "hes", "he's", "shes", "she's", "we're", "weve", "we've", "well", "we'll", "wed", "we'd",
    "theyre", "they're", "theyve", "they've", "theyll", "they'll", "theyd", "they'd", "its",
    "it's", "dont", "don't", "doesnt", "doesn't", "didnt", "didn't", "cant", "can't", "couldnt",
    "couldn't", "shouldnt", "shouldn't", "wouldnt", "wouldn't", "aint", "ain't", "isnt", "isn't",
    "wasnt", "wasn't", "werent", "weren't", "havent", "haven't", "hasnt", "hasn't", "hadnt",
    "hadn't", "wont", "won't", "gonna", "wanna", "gotta", "lemme", "kinda", "sorta", "tryna",
    "'cause", "cause", "ya", "ok", "okay", "alright", "like", "just", "really", "right", "way",
    "thing", "things", "stuff", "get", "got", "make", "makes", "made", "take", "takes", "took",
    "put", "puts", "keep", "keeps", "kept", "back", "out", "up", "down", "over", "under", "again",
    "still", "now", "ever", "never", "always", "sometimes", "one", "two", "three", "time",
    "times", "day", "night",
];

/// Domain vocabulary that is never treated as a stopword and may become rigid
const DOMAIN_WHITELIST: &[&str] = &[
    "hook_repetition", "catchy_chorus", "high_repetition", "flow", "wordplay", "storytelling",
    "battle", "trap", "drill", "boom_bap", "hip_hop", "hiphop", "rnb", "reggae", "metal", "rock",
    "pop", "country", "skrrt", "flex", "ice", "bando", "lean", "molly", "perc", "xan", "opps",
    "gang", "plug", "rollie", "guap", "racks", "bands", "glizzy", "draco", "blick", "blicky",
    "wraith", "bentley", "lambo", "woah", "lit", "savage", "shawty", "woke", "sauce", "drip",
    "patek", "cartier", "vvs", "chain", "chains", "whip", "808", "808s", "distorted_guitar", "riff",
    "bassline", "piano_loop",
];

/// Minimum length of a lyric word
const MIN_WORD_LEN: usize = 3;

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreLexicon {
    /// Genres that get a profile, in output order
    pub macro_genres: Vec<String>,
    /// Normalized label -> macro-genre
    pub sub_to_macro: BTreeMap<String, String>,
    pub common_global: HashSet<String>,
    pub stopwords: HashSet<String>,
    pub domain_whitelist: HashSet<String>,
}

impl Default for GenreLexicon {
    fn default() -> Self {
        Self {
            macro_genres: MACRO_GENRES.iter().map(|s| s.to_string()).collect(),
            sub_to_macro: SUB_TO_MACRO
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            common_global: set(COMMON_GLOBAL),
            stopwords: set(LYRIC_STOPWORDS),
            domain_whitelist: set(DOMAIN_WHITELIST),
        }
    }
}

impl GenreLexicon {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_whitelisted(&self, property: &str) -> bool {
        self.domain_whitelist.contains(property)
    }

    pub fn is_common(&self, property: &str) -> bool {
        self.common_global.contains(property)
    }

    /// Stopword test; whitelisted domain words are never stopwords
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word) && !self.is_whitelisted(word)
    }

    fn map_label(&self, label: &str) -> String {
        let label = norm_token(label);
        self.sub_to_macro.get(&label).cloned().unwrap_or(label)
    }

    /// Macro-genres a track belongs to, in `macro_genres` order.
    ///
    /// Subgenre and tag labels are mapped through `sub_to_macro` (unknown
    /// labels stand for themselves); title, album and artist are also
    /// scanned for any mapped label as a plain substring.
    pub fn assign(&self, track: &Track) -> Vec<String> {
        let mut found: HashSet<String> = track
            .subgenres
            .iter()
            .chain(track.tags.iter())
            .map(|label| self.map_label(label))
            .collect();

        let blob = format!("{} {} {}", track.title, track.album, track.artist).to_lowercase();
        for (label, genre) in &self.sub_to_macro {
            if blob.contains(label.as_str()) {
                found.insert(genre.clone());
            }
        }

        self.macro_genres
            .iter()
            .filter(|g| found.contains(*g))
            .cloned()
            .collect()
    }

    /// Content words of a lyric text: alphabetic runs of at least three
    /// characters, normalized, without stopwords.
    pub fn extract_words(&self, text: &str) -> Vec<String> {
        alpha_runs(text, MIN_WORD_LEN)
            .into_iter()
            .map(norm_token)
            .filter(|w| w.chars().count() >= MIN_WORD_LEN && !self.is_stopword(w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_maps_sublabels() {
        let lexicon = GenreLexicon::default();
        let track = Track::new("t")
            .with_subgenres(["Boom_Bap"])
            .with_tags(["heavy_metal", "sad", "jazz"]);

        assert_eq!(lexicon.assign(&track), vec!["rap", "metal"]);
    }

    #[test]
    fn test_assign_scans_title_album_artist() {
        let lexicon = GenreLexicon::default();
        let track = Track::new("t")
            .with_title("Country Roads")
            .with_album("Greatest");
        assert_eq!(lexicon.assign(&track), vec!["country"]);

        // plain substring scan: "trapped" contains both "rap" and "trap"
        let track = Track::new("t").with_title("Trapped");
        assert_eq!(lexicon.assign(&track), vec!["rap", "trap"]);
    }

    #[test]
    fn test_assign_nothing() {
        let lexicon = GenreLexicon::default();
        assert!(lexicon.assign(&Track::new("t").with_tags(["jazz"])).is_empty());
    }

    #[test]
    fn test_extract_words_respects_whitelist() {
        let lexicon = GenreLexicon::default();
        let words = lexicon.extract_words("Yeah, I got the DRIP and the ice, woah it's lit");
        assert_eq!(words, vec!["drip", "ice", "woah", "lit"]);
    }

    #[test]
    fn test_whitelist_overrides_stopwords() {
        let mut lexicon = GenreLexicon::default();
        lexicon.stopwords.insert("flow".to_string());
        assert!(!lexicon.is_stopword("flow"));
        assert!(lexicon.is_stopword("yeah"));
    }

    #[test]
    fn test_partial_json_lexicon() {
        let lexicon = GenreLexicon::from_json(r#"{"macro_genres": ["jazz"]}"#).unwrap();
        assert_eq!(lexicon.macro_genres, vec!["jazz"]);
        assert!(lexicon.sub_to_macro.contains_key("hip_hop"));
    }
}
