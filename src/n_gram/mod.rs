use std::collections::HashMap;

use itertools::Itertools;

pub mod smoothing;

use crate::types::{PerSentiment, SentencesBySentiment, Sentiment};
use crate::util::window;

/// Token -> count for one sentiment class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnigramTable<V> {
    counts: HashMap<String, V>,
}

impl<V: Copy> UnigramTable<V> {
    pub fn new() -> Self {
        UnigramTable { counts: HashMap::new() }
    }

    pub fn get(&self, word: &str) -> Option<V> {
        self.counts.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn insert(&mut self, word: String, value: V) {
        self.counts.insert(word, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, V)> {
        self.counts.iter().map(|(w, v)| (w, *v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for UnigramTable<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        UnigramTable { counts: iter.into_iter().collect() }
    }
}

/// Context token -> (next token -> count) for one sentiment class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BigramTable<V> {
    contexts: HashMap<String, HashMap<String, V>>,
}

impl<V: Copy> BigramTable<V> {
    pub fn new() -> Self {
        BigramTable { contexts: HashMap::new() }
    }

    pub fn get(&self, context: &str, word: &str) -> Option<V> {
        self.contexts.get(context)?.get(word).copied()
    }

    /// Every continuation observed after `context`, if it was ever a context.
    pub fn continuations(&self, context: &str) -> Option<impl Iterator<Item = (&String, V)>> {
        self.contexts.get(context).map(|next| next.iter().map(|(w, v)| (w, *v)))
    }

    pub fn insert(&mut self, context: String, word: String, value: V) {
        self.contexts.entry(context).or_default().insert(word, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String, V)> {
        self.contexts
            .iter()
            .flat_map(|(context, next)| next.iter().map(move |(w, v)| (context, w, *v)))
    }

    pub fn len(&self) -> usize {
        self.contexts.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BigramTable<u64> {
    /// Sum of the raw counts of every word seen after `context`.
    pub fn total_after(&self, context: &str) -> Option<u64> {
        self.contexts.get(context).map(|next| next.values().sum())
    }
}

pub type UnigramCounts = PerSentiment<UnigramTable<u64>>;
pub type BigramCounts = PerSentiment<BigramTable<u64>>;

/// Raw unigram tallies per sentiment class.
pub fn make_unigrams(sentences_by_sentiment: &SentencesBySentiment) -> UnigramCounts {
    PerSentiment::from_fn(|sentiment| {
        let mut table = UnigramTable::new();
        for sentence in &sentences_by_sentiment[sentiment] {
            for gram in window(sentence, 1) {
                *table.counts.entry(gram[0].clone()).or_insert(0) += 1;
            }
        }
        table
    })
}

/// Raw conditional bigram tallies per sentiment class.
pub fn make_bigrams(sentences_by_sentiment: &SentencesBySentiment) -> BigramCounts {
    PerSentiment::from_fn(|sentiment| {
        let mut table = BigramTable::new();
        for sentence in &sentences_by_sentiment[sentiment] {
            for gram in window(sentence, 2) {
                *table
                    .contexts
                    .entry(gram[0].clone())
                    .or_default()
                    .entry(gram[1].clone())
                    .or_insert(0) += 1;
            }
        }
        table
    })
}

impl UnigramTable<u64> {
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl UnigramTable<f64> {
    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }
}

/// Raw unigram statistics plus their Good-Turing smoothed counterparts.
#[derive(Debug, Clone)]
pub struct UnigramModel {
    pub raw: UnigramCounts,
    pub smoothed: PerSentiment<UnigramTable<f64>>,
    pub smoothed_totals: PerSentiment<f64>,
}

impl UnigramModel {
    pub fn new(raw: UnigramCounts, smoothed: PerSentiment<UnigramTable<f64>>) -> UnigramModel {
        let smoothed_totals = PerSentiment::from_fn(|sentiment| smoothed[sentiment].total());
        UnigramModel { raw, smoothed, smoothed_totals }
    }

    /// Smoothed probability of `word` under `sentiment`, if the word has any mass there.
    pub fn prob(&self, sentiment: Sentiment, word: &str) -> Option<f64> {
        let total = self.smoothed_totals[sentiment];
        self.smoothed[sentiment]
            .get(word)
            .filter(|_| total > 0.0)
            .map(|count| count / total)
    }
}

/// Raw bigram statistics plus their Good-Turing smoothed counterparts.
#[derive(Debug, Clone)]
pub struct BigramModel {
    pub raw: BigramCounts,
    pub smoothed: PerSentiment<BigramTable<f64>>,
}

/// Renders the most frequent unigrams of a class, highest first.
pub fn top_unigrams(table: &UnigramTable<u64>, limit: usize) -> Vec<(String, u64)> {
    table
        .iter()
        .sorted_by(|(w1, c1), (w2, c2)| c2.cmp(c1).then_with(|| w1.cmp(w2)))
        .take(limit)
        .map(|(w, c)| (w.clone(), c))
        .collect_vec()
}

pub fn sentence_count(sentences_by_sentiment: &SentencesBySentiment) -> usize {
    sentences_by_sentiment.values().map(Vec::len).sum()
}

#[cfg(test)]
pub(crate) fn sentences_of(tokens: &[&[&str]]) -> Vec<crate::types::Sentence> {
    tokens
        .iter()
        .map(|s| s.iter().map(|t| t.to_string()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> SentencesBySentiment {
        let mut by_sentiment = SentencesBySentiment::default();
        by_sentiment[Sentiment::Positive] = sentences_of(&[&["great", "movie"], &["great", "great", "fun"]]);
        by_sentiment[Sentiment::Negative] = sentences_of(&[&["bad"]]);
        by_sentiment
    }

    #[test]
    fn test_make_unigrams() {
        let unigrams = make_unigrams(&corpus());
        assert_eq!(unigrams[Sentiment::Positive].get("great"), Some(3));
        assert_eq!(unigrams[Sentiment::Positive].get("movie"), Some(1));
        assert_eq!(unigrams[Sentiment::Positive].get("bad"), None);
        assert_eq!(unigrams[Sentiment::Negative].get("bad"), Some(1));
        assert!(unigrams[Sentiment::Neutral].is_empty());

        assert_eq!(unigrams[Sentiment::Positive].total(), 5);
        assert_eq!(unigrams[Sentiment::Negative].total(), 1);
    }

    #[test]
    fn test_make_bigrams() {
        let bigrams = make_bigrams(&corpus());
        let pos = &bigrams[Sentiment::Positive];
        assert_eq!(pos.get("great", "movie"), Some(1));
        assert_eq!(pos.get("great", "great"), Some(1));
        assert_eq!(pos.get("great", "fun"), Some(1));
        assert_eq!(pos.get("movie", "great"), None);
        assert_eq!(pos.total_after("great"), Some(3));
        assert_eq!(pos.total_after("fun"), None);
        assert_eq!(pos.len(), 3);
        // a one-token sentence has no bigram window
        assert!(bigrams[Sentiment::Negative].is_empty());
    }

    #[test]
    fn test_top_unigrams() {
        let unigrams = make_unigrams(&corpus());
        let top = top_unigrams(&unigrams[Sentiment::Positive], 2);
        assert_eq!(top, vec![("great".to_string(), 3), ("fun".to_string(), 1)]);
    }
}
