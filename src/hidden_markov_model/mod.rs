//! The trained review model: sentiment transitions plus per-sentiment language
//! models used as emission distributions. Built once, read-only afterwards.

use std::sync::Arc;

use tracing::{debug, info};

pub mod evaluate;
pub mod viterbi;

use crate::chi_square::AdmissibleFeatureSet;
use crate::config::{ClassifierConfig, NGramOrder};
use crate::corpus::{parse_corpus, parse_reviews, Review};
use crate::emission::{EmissionModel, KatzBackoffEmission, UnigramEmission};
use crate::error::Result;
use crate::markov_chain::TransitionMatrix;
use crate::n_gram::smoothing::{good_turing_bigrams, good_turing_unigrams};
use crate::n_gram::{make_bigrams, make_unigrams, sentence_count, top_unigrams, BigramModel, UnigramModel};
use crate::types::{Sentiment, SentimentState};
use crate::vocabulary::Vocabulary;

pub use evaluate::Tally;
pub use viterbi::{viterbi, Decoded};

pub struct HiddenMarkovModel {
    config: ClassifierConfig,
    transitions: TransitionMatrix,
    vocabulary: Vocabulary,
    unigrams: Arc<UnigramModel>,
    features: Arc<AdmissibleFeatureSet>,
    emission: Box<dyn EmissionModel>,
}

impl HiddenMarkovModel {
    /// Runs the whole training pipeline over `reviews`. Any failure aborts
    /// construction, since every later table depends on the earlier ones.
    pub fn train(reviews: &[Review], config: &ClassifierConfig) -> Result<HiddenMarkovModel> {
        config.validate()?;
        let order = config.order.n();
        info!(reviews = reviews.len(), order, cutoff = config.cutoff, "training review model");

        let corpus = parse_corpus(reviews, order);
        let transitions = corpus.transitions.smooth(config.transition_smoothing);
        let vocabulary = corpus.vocabulary;
        for from in SentimentState::ALL {
            let row: Vec<f64> = SentimentState::ALL.iter().map(|&to| transitions.prob(from, to)).collect();
            debug!(%from, ?row, "transition row");
        }
        info!(
            sentences = sentence_count(&corpus.sentences_by_sentiment),
            vocabulary = vocabulary.len(),
            "tokenized training sentences"
        );

        let raw_unigrams = make_unigrams(&corpus.sentences_by_sentiment);
        for sentiment in Sentiment::ALL {
            debug!(%sentiment, top = ?top_unigrams(&raw_unigrams[sentiment], 10), "most frequent unigrams");
        }
        let smoothed_unigrams = good_turing_unigrams(&raw_unigrams, config.cutoff, &vocabulary)?;
        let unigrams = Arc::new(UnigramModel::new(raw_unigrams, smoothed_unigrams));

        let bigrams = match config.order {
            NGramOrder::Unigram => None,
            NGramOrder::Bigram => {
                let raw = make_bigrams(&corpus.sentences_by_sentiment);
                let smoothed = good_turing_bigrams(&raw, config.cutoff)?;
                Some(BigramModel { raw, smoothed })
            }
        };

        let features = Arc::new(AdmissibleFeatureSet::select(
            &vocabulary,
            &unigrams,
            config.chi_square_threshold,
            config.chi_square_smoother,
        ));

        let emission: Box<dyn EmissionModel> = match bigrams {
            None => Box::new(UnigramEmission::new(unigrams.clone(), features.clone())),
            Some(bigrams) => Box::new(KatzBackoffEmission::new(unigrams.clone(), bigrams, features.clone())),
        };

        Ok(HiddenMarkovModel {
            config: config.clone(),
            transitions,
            vocabulary,
            unigrams,
            features,
            emission,
        })
    }

    /// Parses raw review blocks and trains on them.
    pub fn train_blocks<S: AsRef<str>>(blocks: &[S], config: &ClassifierConfig) -> Result<HiddenMarkovModel> {
        HiddenMarkovModel::train(&parse_reviews(blocks)?, config)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn transitions(&self) -> &TransitionMatrix {
        &self.transitions
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn unigrams(&self) -> &UnigramModel {
        &self.unigrams
    }

    pub fn features(&self) -> &AdmissibleFeatureSet {
        &self.features
    }

    pub fn emission(&self) -> &dyn EmissionModel {
        self.emission.as_ref()
    }
}
