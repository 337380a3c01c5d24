//! Chi-square feature selection over smoothed unigram counts.
//!
//! Each token gets a 2×3 contingency table, rows {present, absent} against
//! columns {neg, neu, pos}. Tokens whose Pearson statistic clears the
//! threshold are admissible. Only admissible tokens move emission scores.

use std::collections::HashSet;

use tracing::info;

use crate::n_gram::UnigramModel;
use crate::types::{PerSentiment, Sentiment};
use crate::vocabulary::Vocabulary;

/// Pearson chi-square statistic for one token.
///
/// `class_totals` are the token totals of each class, `feature_counts` the
/// occurrences of the token in each class. `smoother` is added to every
/// observed cell, and so folds into every marginal.
pub fn chi_squarify(class_totals: &PerSentiment<f64>, feature_counts: &PerSentiment<f64>, smoother: f64) -> f64 {
    let n: f64 = class_totals.values().sum::<f64>() + 6.0 * smoother;
    let features: f64 = feature_counts.values().sum::<f64>() + 3.0 * smoother;
    let non_features = n - features;
    if n <= 0.0 {
        return 0.0;
    }

    let mut chi_statistic = 0.0;
    for sentiment in Sentiment::ALL {
        let column = class_totals[sentiment] + 2.0 * smoother;
        let present = feature_counts[sentiment] + smoother;
        let absent = class_totals[sentiment] - feature_counts[sentiment] + smoother;
        for (observed, row_total) in [(present, features), (absent, non_features)] {
            let expected = row_total * column / n;
            if expected <= 0.0 {
                continue;
            }
            let a = observed - expected;
            chi_statistic += a * a / expected;
        }
    }
    chi_statistic
}

/// Vocabulary tokens informative enough to influence emission scores.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdmissibleFeatureSet {
    features: HashSet<String>,
}

impl AdmissibleFeatureSet {
    pub fn select(vocabulary: &Vocabulary, unigrams: &UnigramModel, threshold: f64, smoother: f64) -> Self {
        let features: HashSet<String> = vocabulary
            .iter()
            .filter(|word| chi_square_for(word, unigrams, smoother) > threshold)
            .cloned()
            .collect();
        info!(
            admissible = features.len(),
            vocabulary = vocabulary.len(),
            threshold,
            "selected admissible features"
        );
        AdmissibleFeatureSet { features }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.features.contains(word)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.features.iter()
    }
}

impl FromIterator<String> for AdmissibleFeatureSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        AdmissibleFeatureSet { features: iter.into_iter().collect() }
    }
}

pub fn chi_square_for(word: &str, unigrams: &UnigramModel, smoother: f64) -> f64 {
    let word_counts = PerSentiment::from_fn(|s| unigrams.smoothed[s].get(word).unwrap_or(0.0));
    chi_squarify(&unigrams.smoothed_totals, &word_counts, smoother)
}
