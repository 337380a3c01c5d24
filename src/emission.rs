//! Sentence log-probabilities under each sentiment's language model.
//!
//! Every score is a base-2 log. Tokens outside the admissible feature set
//! contribute nothing, so a sentence with no admissible tokens scores 0.

use std::sync::Arc;

use crate::chi_square::AdmissibleFeatureSet;
use crate::n_gram::{BigramModel, UnigramModel};
use crate::types::Sentiment;
use crate::util::{log2_prob, window};

/// Strategy for scoring a tokenized sentence under one sentiment class.
pub trait EmissionModel: Send + Sync {
    fn log_prob(&self, sentiment: Sentiment, sentence: &[String]) -> f64;

    /// N-gram order the strategy consumes.
    fn order(&self) -> usize;
}

pub struct UnigramEmission {
    unigrams: Arc<UnigramModel>,
    features: Arc<AdmissibleFeatureSet>,
}

impl UnigramEmission {
    pub fn new(unigrams: Arc<UnigramModel>, features: Arc<AdmissibleFeatureSet>) -> Self {
        UnigramEmission { unigrams, features }
    }
}

impl EmissionModel for UnigramEmission {
    fn log_prob(&self, sentiment: Sentiment, sentence: &[String]) -> f64 {
        let mut log_prob_sum = 0.0;
        for word in sentence {
            if !self.features.contains(word) {
                continue;
            }
            // admissible words are vocabulary words, and smoothing gives every one of those mass
            if let Some(prob) = self.unigrams.prob(sentiment, word) {
                log_prob_sum += log2_prob(prob);
            }
        }
        log_prob_sum
    }

    fn order(&self) -> usize {
        1
    }
}

/// Two-level Katz backoff from bigrams to smoothed unigrams.
pub struct KatzBackoffEmission {
    unigrams: Arc<UnigramModel>,
    bigrams: BigramModel,
    features: Arc<AdmissibleFeatureSet>,
}

impl KatzBackoffEmission {
    pub fn new(unigrams: Arc<UnigramModel>, bigrams: BigramModel, features: Arc<AdmissibleFeatureSet>) -> Self {
        KatzBackoffEmission { unigrams, bigrams, features }
    }

    fn either_admissible(&self, w1: &str, w2: &str) -> bool {
        self.features.contains(w1) || self.features.contains(w2)
    }

    /// Log-probability of `w2` following `w1`.
    ///
    /// Note the normalizers: the seen-pair estimate and the leftover mass
    /// both divide smoothed counts by the *raw* continuation total of `w1`.
    pub fn katz_backoff_prob(&self, sentiment: Sentiment, w1: &str, w2: &str) -> f64 {
        let raw = &self.bigrams.raw[sentiment];
        let smoothed = &self.bigrams.smoothed[sentiment];

        let Some(total_after) = raw.total_after(w1) else {
            // never a context: fall back to the plain unigram estimate
            if !self.features.contains(w2) {
                return 0.0;
            }
            return self.unigrams.prob(sentiment, w2).map_or(0.0, log2_prob);
        };
        if !self.either_admissible(w1, w2) {
            return 0.0;
        }
        let total_after = total_after as f64;

        if raw.get(w1, w2).is_some() {
            let count = smoothed.get(w1, w2).unwrap_or(0.0);
            return log2_prob(count / total_after);
        }

        let beta: f64 = smoothed
            .continuations(w1)
            .map(|next| next.map(|(_, count)| count / total_after).sum())
            .unwrap_or(0.0);
        let alpha = 1.0 - beta;
        match self.unigrams.prob(sentiment, w2) {
            Some(prob) => log2_prob(alpha * prob),
            None => 0.0,
        }
    }
}

impl EmissionModel for KatzBackoffEmission {
    fn log_prob(&self, sentiment: Sentiment, sentence: &[String]) -> f64 {
        window(sentence, 2)
            .map(|bigram| self.katz_backoff_prob(sentiment, bigram[0], bigram[1]))
            .sum()
    }

    fn order(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::n_gram::{BigramTable, UnigramTable};
    use crate::types::PerSentiment;

    fn words(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn unigram_model() -> Arc<UnigramModel> {
        // every class: great 4, movie 2, the 2 (total 8)
        let smoothed = PerSentiment::from_fn(|_| {
            [("great", 4.0), ("movie", 2.0), ("the", 2.0)]
                .into_iter()
                .map(|(w, c)| (w.to_string(), c))
                .collect::<UnigramTable<f64>>()
        });
        Arc::new(UnigramModel::new(PerSentiment::default(), smoothed))
    }

    fn features(tokens: &[&str]) -> Arc<AdmissibleFeatureSet> {
        Arc::new(tokens.iter().map(|t| t.to_string()).collect())
    }

    fn katz(admissible: &[&str]) -> KatzBackoffEmission {
        let mut raw: PerSentiment<BigramTable<u64>> = PerSentiment::default();
        let mut smoothed: PerSentiment<BigramTable<f64>> = PerSentiment::default();
        let pos = Sentiment::Positive;
        // after "the": great seen 3 times, movie once
        raw[pos].insert("the".into(), "great".into(), 3);
        raw[pos].insert("the".into(), "movie".into(), 1);
        smoothed[pos].insert("the".into(), "great".into(), 3.0);
        smoothed[pos].insert("the".into(), "movie".into(), 0.5);
        KatzBackoffEmission::new(unigram_model(), BigramModel { raw, smoothed }, features(admissible))
    }

    #[test]
    fn test_unigram_skips_inadmissible_words() {
        let emission = UnigramEmission::new(unigram_model(), features(&["great"]));
        let score = emission.log_prob(Sentiment::Positive, &words(&["the", "great", "movie"]));
        assert!((score - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_unigram_no_admissible_words_scores_zero() {
        let emission = UnigramEmission::new(unigram_model(), features(&[]));
        assert_eq!(emission.log_prob(Sentiment::Negative, &words(&["great", "movie"])), 0.0);
        assert_eq!(emission.order(), 1);
    }

    #[test]
    fn test_katz_seen_bigram() {
        let emission = katz(&["great"]);
        // smoothed 3 over raw total 4
        let expected = (3.0f64 / 4.0).log2();
        assert!((emission.katz_backoff_prob(Sentiment::Positive, "the", "great") - expected).abs() < 1e-12);
        // the pair is seen but neither word is admissible
        assert_eq!(emission.katz_backoff_prob(Sentiment::Positive, "the", "movie"), 0.0);
    }

    #[test]
    fn test_katz_backs_off_to_weighted_unigram() {
        let emission = katz(&["the"]);
        // beta = (3 + 0.5) / 4, alpha = 1/8, p(the) = 2/8
        let expected = (0.125f64 * 0.25).log2();
        assert!((emission.katz_backoff_prob(Sentiment::Positive, "the", "the") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_katz_unknown_context_uses_unigram() {
        let emission = katz(&["movie"]);
        let expected = (2.0f64 / 8.0).log2();
        assert!((emission.katz_backoff_prob(Sentiment::Positive, "movie", "movie") - expected).abs() < 1e-12);
        assert_eq!(emission.katz_backoff_prob(Sentiment::Positive, "movie", "great"), 0.0);
        // "the" is a context only in the positive class
        assert!((emission.katz_backoff_prob(Sentiment::Negative, "the", "movie") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_katz_exhausted_context_scores_neg_infinity() {
        let mut raw: PerSentiment<BigramTable<u64>> = PerSentiment::default();
        let mut smoothed: PerSentiment<BigramTable<f64>> = PerSentiment::default();
        let pos = Sentiment::Positive;
        // every continuation sits above the cutoff, so it keeps its raw count
        raw[pos].insert("movie".into(), "</s>".into(), 5);
        smoothed[pos].insert("movie".into(), "</s>".into(), 5.0);
        // smoothed mass above the raw total leaves a negative alpha
        raw[pos].insert("great".into(), "movie".into(), 2);
        smoothed[pos].insert("great".into(), "movie".into(), 2.5);
        let emission = KatzBackoffEmission::new(unigram_model(), BigramModel { raw, smoothed }, features(&["movie", "great"]));

        let exhausted = emission.katz_backoff_prob(pos, "movie", "the");
        assert_eq!(exhausted, f64::NEG_INFINITY);
        let overdrawn = emission.katz_backoff_prob(pos, "great", "the");
        assert_eq!(overdrawn, f64::NEG_INFINITY);
        assert!(!overdrawn.is_nan());

        let sentence = words(&["great", "movie", "the"]);
        assert_eq!(emission.log_prob(pos, &sentence), f64::NEG_INFINITY);
    }

    #[test]
    fn test_katz_sentence_sums_windows() {
        let emission = katz(&["great"]);
        let sentence = words(&["the", "great", "movie"]);
        // (the, great) seen; (great, movie): great never a context, movie inadmissible
        let expected = (3.0f64 / 4.0).log2();
        assert!((emission.log_prob(Sentiment::Positive, &sentence) - expected).abs() < 1e-12);
        assert_eq!(emission.log_prob(Sentiment::Positive, &words(&["great"])), 0.0);
        assert_eq!(emission.order(), 2);
    }
}
