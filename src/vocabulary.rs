//! Tokenization and the known-token vocabulary.
//!
//! The vocabulary grows while the training corpus is parsed: the first sighting
//! of any token is rewritten to [`UNKNOWN_TOKEN`] and only later sightings pass
//! through. That way the training data carries realistic unknown-word
//! statistics without a separate held-out set.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ClassifierError, Result};
use crate::types::{Sentence, Sentiment};

pub const UNKNOWN_TOKEN: &str = "<unk>";
pub const SENTENCE_START: &str = "<s>";
pub const SENTENCE_END: &str = "</s>";

// no sense treating these as unknown
const SEED_TOKENS: [&str; 11] = ["!", ".", ",", SENTENCE_START, SENTENCE_END, ":", ";", "'", "\"", "/", "\\"];

fn punctuation_pattern() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s']").expect("valid regex"))
}

/// Splits a `sentiment<TAB>text` line into its two halves.
pub fn split_line(line: &str) -> Result<(Sentiment, &str)> {
    let (tag, text) = line.split_once('\t').ok_or_else(|| ClassifierError::MalformedRecord {
        line: line.to_string(),
        reason: "missing tab between sentiment and sentence".to_string(),
    })?;
    let sentiment = Sentiment::from_tag(tag.trim()).map_err(|_| ClassifierError::MalformedRecord {
        line: line.to_string(),
        reason: format!("unknown sentiment tag '{}'", tag),
    })?;
    Ok((sentiment, text))
}

/// Lower-cases `text`, isolates punctuation and splits on whitespace. Models
/// of order two and above get `order - 1` start markers and one end marker.
pub fn tokenize_sentence(text: &str, order: usize) -> Sentence {
    let lowered = text.to_lowercase();
    let spaced = punctuation_pattern().replace_all(&lowered, " $0 ");

    let mut tokens: Sentence = Vec::new();
    for _ in 1..order {
        tokens.push(SENTENCE_START.to_string());
    }
    tokens.extend(spaced.split_whitespace().map(String::from));
    if order > 1 {
        tokens.push(SENTENCE_END.to_string());
    }
    tokens
}

/// Parses a `label<TAB>text` line into its sentiment and token sequence.
pub fn tokenize_line(line: &str, order: usize) -> Result<(Sentiment, Sentence)> {
    let (sentiment, text) = split_line(line)?;
    Ok((sentiment, tokenize_sentence(text, order)))
}

/// Grows the vocabulary while the training corpus is read.
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    seen_words: HashSet<String>,
}

impl Default for VocabularyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        VocabularyBuilder {
            seen_words: SEED_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Rewrites first sightings to the unknown marker and records them as seen.
    pub fn observe(&mut self, mut sentence: Sentence) -> Sentence {
        for word in sentence.iter_mut() {
            if !self.seen_words.contains(word.as_str()) {
                let first_sighting = std::mem::replace(word, UNKNOWN_TOKEN.to_string());
                self.seen_words.insert(first_sighting);
            }
        }
        sentence
    }

    pub fn len(&self) -> usize {
        self.seen_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen_words.is_empty()
    }

    pub fn finish(mut self) -> Vocabulary {
        self.seen_words.remove("");
        Vocabulary { words: self.seen_words }
    }
}

/// The frozen set of known tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.words.iter()
    }

    /// Replaces every token outside the vocabulary with the unknown marker.
    pub fn map_unknown(&self, mut sentence: Sentence) -> Sentence {
        for word in sentence.iter_mut() {
            if !self.contains(word) {
                *word = UNKNOWN_TOKEN.to_string();
            }
        }
        sentence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_isolates_punctuation() {
        let tokens = tokenize_sentence("Great movie, didn't LOVE it!", 1);
        assert_eq!(tokens, vec!["great", "movie", ",", "didn't", "love", "it", "!"]);
    }

    #[test]
    fn test_tokenize_adds_markers_for_bigrams() {
        assert_eq!(tokenize_sentence("bad acting.", 2), vec!["<s>", "bad", "acting", ".", "</s>"]);
        assert_eq!(tokenize_sentence("", 2), vec!["<s>", "</s>"]);
        assert!(tokenize_sentence("   ", 1).is_empty());
    }

    #[test]
    fn test_tokenize_line_requires_tab() {
        let (sentiment, tokens) = tokenize_line("pos\tgreat movie", 1).unwrap();
        assert_eq!(sentiment, Sentiment::Positive);
        assert_eq!(tokens, vec!["great", "movie"]);

        assert!(matches!(
            tokenize_line("pos great movie", 1),
            Err(ClassifierError::MalformedRecord { .. })
        ));
        assert!(matches!(
            tokenize_line("happy\tgreat movie", 1),
            Err(ClassifierError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_first_sighting_becomes_unknown() {
        let mut builder = VocabularyBuilder::new();
        let first = builder.observe(vec!["great".to_string(), "great".to_string(), "!".to_string()]);
        assert_eq!(first, vec![UNKNOWN_TOKEN, "great", "!"]);

        let second = builder.observe(vec!["great".to_string(), "movie".to_string()]);
        assert_eq!(second, vec!["great", UNKNOWN_TOKEN]);

        let vocabulary = builder.finish();
        assert!(vocabulary.contains("great"));
        assert!(vocabulary.contains("movie"));
        assert!(!vocabulary.contains(UNKNOWN_TOKEN));
    }

    #[test]
    fn test_map_unknown_does_not_grow() {
        let vocabulary = VocabularyBuilder::new().finish();
        let size = vocabulary.len();
        let mapped = vocabulary.map_unknown(vec!["hello".to_string(), ".".to_string()]);
        assert_eq!(mapped, vec![UNKNOWN_TOKEN, "."]);
        assert_eq!(vocabulary.len(), size);
    }
}
