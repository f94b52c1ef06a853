// Term normalizer: free text -> filtered, lemmatized term stream
use crate::lemmatizer::{Lemmatizer, NoLemmatizer, PartOfSpeech, TaggedToken};
use crate::text::{tokenize, Stopwords};

/// A surviving token after filtering and lemmatization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub lemma: String,
    pub is_verb: bool,
}

pub struct TermNormalizer<'a> {
    lemmatizer: &'a dyn Lemmatizer,
    stopwords: Stopwords,
}

static NO_LEMMATIZER: NoLemmatizer = NoLemmatizer;

impl<'a> TermNormalizer<'a> {
    pub fn new(lemmatizer: &'a dyn Lemmatizer, stopwords: Stopwords) -> Self {
        Self {
            lemmatizer,
            stopwords,
        }
    }

    /// Normalizer with no tagging capability: identity lemmas, no POS filtering
    pub fn without_lemmatizer(stopwords: Stopwords) -> TermNormalizer<'static> {
        TermNormalizer {
            lemmatizer: &NO_LEMMATIZER,
            stopwords,
        }
    }

    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    /// Analyze one lowercased token, degrading to the identity lemma with
    /// unknown part of speech when the capability has no answer or fails.
    pub fn analyze(&self, token: &str) -> TaggedToken {
        match self.lemmatizer.tag(token) {
            Ok(Some(tagged)) => {
                let lemma = tagged.lemma.split(':').next().unwrap_or("").to_string();
                if lemma.is_empty() {
                    TaggedToken::new(token, tagged.pos)
                } else {
                    TaggedToken::new(lemma, tagged.pos)
                }
            }
            Ok(None) => TaggedToken::new(token, PartOfSpeech::Other),
            Err(e) => {
                tracing::debug!("Lemmatizer failed on {:?}: {}", token, e);
                TaggedToken::new(token, PartOfSpeech::Other)
            }
        }
    }

    /// Tokenize, filter and lemmatize `text`.
    ///
    /// Drops tokens of one character, stopwords, numbers and adverbs.
    pub fn terms(&self, text: &str) -> Vec<Term> {
        tokenize(text)
            .into_iter()
            .filter_map(|raw| {
                let token = raw.to_lowercase().trim().to_string();
                if token.chars().count() <= 1 || self.stopwords.contains(&token) {
                    return None;
                }
                let tagged = self.analyze(&token);
                match tagged.pos {
                    PartOfSpeech::Number | PartOfSpeech::Adverb => None,
                    pos => Some(Term {
                        lemma: tagged.lemma,
                        is_verb: pos == PartOfSpeech::Verb,
                    }),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemmatizer::LexiconLemmatizer;
    use crate::{Error, Result};

    struct FailingLemmatizer;

    impl Lemmatizer for FailingLemmatizer {
        fn tag(&self, _token: &str) -> Result<Option<TaggedToken>> {
            Err(Error::Lemmatizer("tagger crashed".into()))
        }
    }

    #[test]
    fn test_filters_without_capability() {
        let normalizer = TermNormalizer::without_lemmatizer(Stopwords::english());
        let terms = normalizer.terms("The Money, and a x on 2 my MIND quickly");

        let lemmas: Vec<_> = terms.iter().map(|t| t.lemma.as_str()).collect();
        assert_eq!(lemmas, vec!["money", "mind", "quickly"]);
        assert!(terms.iter().all(|t| !t.is_verb));
    }

    #[test]
    fn test_pos_filtering_with_lexicon() {
        let mut lexicon = LexiconLemmatizer::new();
        lexicon.insert("quickly", "RB", "quickly");
        lexicon.insert("42", "CD", "@card@");
        lexicon.insert("running", "VBG", "run");
        lexicon.insert("cars", "NNS", "car");

        let normalizer = TermNormalizer::new(&lexicon, Stopwords::english());
        let terms = normalizer.terms("running 42 cars quickly");

        assert_eq!(
            terms,
            vec![
                Term { lemma: "run".into(), is_verb: true },
                Term { lemma: "car".into(), is_verb: false },
            ]
        );
    }

    #[test]
    fn test_failing_capability_degrades() {
        let failing = FailingLemmatizer;
        let normalizer = TermNormalizer::new(&failing, Stopwords::empty());
        let tagged = normalizer.analyze("dancing");
        assert_eq!(tagged, TaggedToken::new("dancing", PartOfSpeech::Other));
        assert_eq!(normalizer.terms("dancing queen").len(), 2);
    }
}
