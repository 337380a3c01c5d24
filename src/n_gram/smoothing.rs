//! Good-Turing discounting with a Katz-style cutoff.
//!
//! Counts above the cutoff `k` are trusted as they are. Counts at or below it
//! are replaced with
//!
//! ```text
//! c* = [ (c+1)·N(c+1)/N(c) − c·(k+1)·N(k+1)/N(1) ] / [ 1 − (k+1)·N(k+1)/N(1) ]
//! ```
//!
//! where `N(x)` is the number of distinct (context, word) pairs seen exactly `x`
//! times, pooled across all three sentiment classes.

use std::collections::HashMap;

use tracing::info;

use crate::error::{ClassifierError, Result};
use crate::n_gram::{BigramCounts, BigramTable, UnigramCounts, UnigramTable};
use crate::types::PerSentiment;
use crate::vocabulary::Vocabulary;

/// Count value -> number of distinct n-grams with that count.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyOfFrequencies {
    order: usize,
    freq_of_freqs: HashMap<u64, u64>,
}

impl FrequencyOfFrequencies {
    pub fn from_counts(order: usize, counts: impl IntoIterator<Item = u64>) -> Self {
        let mut freq_of_freqs = HashMap::new();
        for count in counts {
            *freq_of_freqs.entry(count).or_insert(0) += 1;
        }
        FrequencyOfFrequencies { order, freq_of_freqs }
    }

    pub fn for_unigrams(tables: &UnigramCounts) -> Self {
        Self::from_counts(1, tables.values().flat_map(|t| t.iter().map(|(_, c)| c)))
    }

    pub fn for_bigrams(tables: &BigramCounts) -> Self {
        Self::from_counts(2, tables.values().flat_map(|t| t.iter().map(|(_, _, c)| c)))
    }

    /// `N(value)`, failing when no n-gram has exactly that count.
    pub fn get(&self, value: u64) -> Result<f64> {
        match self.freq_of_freqs.get(&value) {
            Some(&n) if n > 0 => Ok(n as f64),
            _ => Err(ClassifierError::InsufficientSmoothingStatistics { order: self.order, value }),
        }
    }

    pub fn total(&self) -> u64 {
        self.freq_of_freqs.values().sum()
    }

    pub fn len(&self) -> usize {
        self.freq_of_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freq_of_freqs.is_empty()
    }

    /// Share of n-grams seen exactly once, the mass reserved for unseen events.
    pub fn unseen_mass(&self) -> Result<f64> {
        let total = self.total();
        if total == 0 {
            return Err(ClassifierError::InsufficientSmoothingStatistics { order: self.order, value: 1 });
        }
        Ok(self.get(1)? / total as f64)
    }

    /// The smoothed count for raw count `c` under cutoff `k`.
    pub fn gt_count(&self, c: u64, k: u64) -> Result<f64> {
        if c > k {
            return Ok(c as f64);
        }
        let n1 = self.get(1)?;
        let cutoff_term = (k + 1) as f64 * self.get(k + 1)? / n1;
        let denominator = 1.0 - cutoff_term;
        if denominator == 0.0 {
            return Err(ClassifierError::InsufficientSmoothingStatistics { order: self.order, value: k + 1 });
        }
        let good_turing = (c + 1) as f64 * self.get(c + 1)? / self.get(c)?;
        Ok((good_turing - c as f64 * cutoff_term) / denominator)
    }
}

/// Smooths unigram counts. Every vocabulary word missing from a class receives
/// the unseen mass `N(1) / Σ N(x)`.
pub fn good_turing_unigrams(
    raw: &UnigramCounts,
    cutoff: u64,
    vocabulary: &Vocabulary,
) -> Result<PerSentiment<UnigramTable<f64>>> {
    let freq_of_freqs = FrequencyOfFrequencies::for_unigrams(raw);
    info!(distinct_counts = freq_of_freqs.len(), "unigram frequency of frequencies");
    let unseen_mass = freq_of_freqs.unseen_mass()?;

    PerSentiment::try_from_fn(|sentiment| {
        let mut smoothed: UnigramTable<f64> = raw[sentiment]
            .iter()
            .map(|(word, c)| Ok((word.clone(), freq_of_freqs.gt_count(c, cutoff)?)))
            .collect::<Result<_>>()?;
        for word in vocabulary.iter() {
            if !smoothed.contains(word) {
                smoothed.insert(word.clone(), unseen_mass);
            }
        }
        Ok(smoothed)
    })
}

/// Smooths conditional bigram counts. Unseen pairs are left to backoff.
pub fn good_turing_bigrams(raw: &BigramCounts, cutoff: u64) -> Result<PerSentiment<BigramTable<f64>>> {
    let freq_of_freqs = FrequencyOfFrequencies::for_bigrams(raw);
    info!(distinct_counts = freq_of_freqs.len(), "bigram frequency of frequencies");

    PerSentiment::try_from_fn(|sentiment| {
        let mut smoothed = BigramTable::new();
        for (context, word, c) in raw[sentiment].iter() {
            smoothed.insert(context.clone(), word.clone(), freq_of_freqs.gt_count(c, cutoff)?);
        }
        Ok(smoothed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::n_gram::{make_bigrams, make_unigrams, sentences_of};
    use crate::types::{SentencesBySentiment, Sentiment};
    use crate::vocabulary::VocabularyBuilder;

    // N(1) = 8, N(2) = 2, N(3) = 1, N(5) = 4, N(9) = 1
    fn freq_of_freqs() -> FrequencyOfFrequencies {
        let counts = [1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 3, 5, 5, 5, 5, 9];
        FrequencyOfFrequencies::from_counts(1, counts)
    }

    #[test]
    fn test_gt_count_below_cutoff() {
        let ffd = freq_of_freqs();
        // denominator = 1 - 3·1/8 = 5/8
        assert!((ffd.gt_count(1, 2).unwrap() - 0.2).abs() < 1e-12);
        assert!((ffd.gt_count(2, 2).unwrap() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_gt_count_above_cutoff_passes_through() {
        let ffd = freq_of_freqs();
        assert_eq!(ffd.gt_count(3, 2).unwrap(), 3.0);
        assert_eq!(ffd.gt_count(9, 2).unwrap(), 9.0);
    }

    #[test]
    fn test_gt_count_missing_statistic() {
        let ffd = freq_of_freqs();
        // N(4) does not exist, so neither c = 3 under k = 3 nor the k + 1 term can be formed
        assert!(matches!(
            ffd.gt_count(1, 3),
            Err(ClassifierError::InsufficientSmoothingStatistics { order: 1, value: 4 })
        ));
        let no_singletons = FrequencyOfFrequencies::from_counts(2, [2, 2, 3]);
        assert!(matches!(
            no_singletons.gt_count(2, 2),
            Err(ClassifierError::InsufficientSmoothingStatistics { order: 2, value: 1 })
        ));
        assert!(no_singletons.unseen_mass().is_err());
    }

    #[test]
    fn test_unseen_mass() {
        assert!((freq_of_freqs().unseen_mass().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_smoothed_counts_positive_below_cutoff() {
        let ffd = freq_of_freqs();
        for c in 1..=2 {
            assert!(ffd.gt_count(c, 2).unwrap() > 0.0);
        }
    }

    #[test]
    fn test_good_turing_unigrams_fills_vocabulary() {
        let mut builder = VocabularyBuilder::new();
        for word in ["a", "b", "c", "d"] {
            builder.observe(vec![word.to_string()]);
        }
        let vocabulary = builder.finish();

        let mut by_sentiment = SentencesBySentiment::default();
        // counts pooled over classes: pos {a:1, b:2, c:3}, neg {a:1}, neu {d:1}
        by_sentiment[Sentiment::Positive] = sentences_of(&[&["a", "b", "b", "c", "c", "c"]]);
        by_sentiment[Sentiment::Negative] = sentences_of(&[&["a"]]);
        by_sentiment[Sentiment::Neutral] = sentences_of(&[&["d"]]);
        let raw = make_unigrams(&by_sentiment);

        // N(1) = 3, N(2) = 1, N(3) = 1; k = 1 needs only N(1) and N(2)
        let smoothed = good_turing_unigrams(&raw, 1, &vocabulary).unwrap();
        let unseen = 3.0 / 5.0;
        let pos = &smoothed[Sentiment::Positive];
        // c* for c = 1 under k = 1 is always zero
        assert!(pos.get("a").unwrap().abs() < 1e-12);
        assert_eq!(pos.get("b"), Some(2.0));
        assert_eq!(pos.get("c"), Some(3.0));
        assert_eq!(pos.get("d"), Some(unseen));
        assert_eq!(pos.get("!"), Some(unseen));
        assert_eq!(pos.len(), vocabulary.len());
        assert_eq!(smoothed[Sentiment::Negative].get("c"), Some(unseen));
    }

    #[test]
    fn test_good_turing_bigrams_leaves_unseen_pairs_out() {
        let mut by_sentiment = SentencesBySentiment::default();
        by_sentiment[Sentiment::Positive] = sentences_of(&[&["a", "b", "a", "b", "c"], &["x", "y"]]);
        by_sentiment[Sentiment::Negative] = sentences_of(&[&["b", "c"]]);
        let raw = make_bigrams(&by_sentiment);

        // pairs: pos {(a,b):2, (b,a):1, (b,c):1, (x,y):1}, neg {(b,c):1}; N(1) = 4, N(2) = 1
        let smoothed = good_turing_bigrams(&raw, 1).unwrap();
        assert_eq!(smoothed[Sentiment::Positive].get("a", "b"), Some(2.0));
        assert!(smoothed[Sentiment::Positive].get("b", "c").unwrap().abs() < 1e-12);
        assert_eq!(smoothed[Sentiment::Positive].get("c", "a"), None);
        assert_eq!(smoothed[Sentiment::Neutral].len(), 0);

        assert!(matches!(
            good_turing_bigrams(&raw, 2),
            Err(ClassifierError::InsufficientSmoothingStatistics { order: 2, value: 3 })
        ));
    }
}
