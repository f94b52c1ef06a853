// Tokenization and stopword handling shared by the builders
use ahash::AHashSet;

pub const PREPOSITIONS: &[&str] = &[
    "of", "to", "from", "in", "on", "at", "by", "for", "with", "about", "against", "between",
    "into", "through", "during", "before", "after", "above", "below", "up", "down", "out", "off",
    "over", "under",
];

pub const ARTICLES: &[&str] = &["the", "a", "an"];

pub const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "so", "yet", "for", "nor", "because", "although", "though", "while", "if",
    "when", "where", "that", "which", "who", "whom", "whose", "until", "unless", "since", "as",
    "than", "whether", "either", "neither", "both", "also", "only",
];

/// English function words
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Punctuation tokens a tokenizer may emit on its own
pub const PUNCTUATION: &[&str] = &[
    "!", "\"", "#", "$", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".", "/", ":", ";", "<",
    "=", ">", "?", "@", "[", "\\", "]", "^", "_", "`", "{", "|", "}", "~", "...", "``",
];

/// Set of words removed before lemmatization
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: AHashSet<String>,
}

impl Stopwords {
    /// Built-in English list plus prepositions, articles, conjunctions and punctuation
    pub fn english() -> Self {
        let words = PREPOSITIONS
            .iter()
            .chain(ARTICLES)
            .chain(CONJUNCTIONS)
            .chain(ENGLISH_STOPWORDS)
            .chain(PUNCTUATION)
            .map(|w| w.to_string())
            .collect();
        Self { words }
    }

    pub fn empty() -> Self {
        Self {
            words: AHashSet::new(),
        }
    }

    /// Add an externally supplied list; entries are lowercased and trimmed
    #[must_use]
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in extra {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                self.words.insert(word);
            }
        }
        self
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '-' || c == '_'
}

/// Segment free text into word tokens.
/// Keeps inner apostrophes, hyphens and underscores; punctuation never
/// survives as a token. Case is preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !is_word_char(c))
        .map(|s| s.trim_matches(|c: char| c == '\'' || c == '-'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercase, unify typographic apostrophes and trim `_`, `-` and spaces
pub fn norm_token(token: &str) -> String {
    token
        .to_lowercase()
        .replace(['\u{2019}', '\u{2018}'], "'")
        .trim_matches(|c: char| c == '_' || c == '-' || c == ' ')
        .to_string()
}

/// Runs of ASCII letters and apostrophes at least `min_len` characters long
pub fn alpha_runs(text: &str, min_len: usize) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        let inside = c.is_ascii_alphabetic() || c == '\'';
        match (inside, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_len {
                    runs.push(&text[s..i]);
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if text.len() - s >= min_len {
            runs.push(&text[s..]);
        }
    }
    runs
}
