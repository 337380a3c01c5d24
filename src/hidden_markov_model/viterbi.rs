use tracing::debug;

use crate::corpus::Review;
use crate::error::{ClassifierError, Result};
use crate::hidden_markov_model::HiddenMarkovModel;
use crate::markov_chain::TransitionMatrix;
use crate::types::{PerSentiment, Sentence, Sentiment, SentimentState};
use crate::util::log2_prob;
use crate::vocabulary::tokenize_sentence;

/// Result of decoding one review.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub predicted: Vec<Sentiment>,
    pub ground_truth: Vec<Sentiment>,
    /// Base-2 log-probability of the best path, `0.0` for an empty review.
    pub log_prob: f64,
}

/// First maximal candidate in `Sentiment::ALL` order.
fn best_of(mut score: impl FnMut(Sentiment) -> f64) -> (Sentiment, f64) {
    let mut best = (Sentiment::Negative, f64::NEG_INFINITY);
    for sentiment in Sentiment::ALL {
        let candidate = score(sentiment);
        if candidate > best.1 {
            best = (sentiment, candidate);
        }
    }
    best
}

/// Most likely sentiment sequence for a review whose sentence `i` scores
/// `emissions[i][s]` under sentiment `s`. Paths start in `<r>` and end in
/// `</r>`; ties go to the earlier sentiment in `neg, neu, pos` order.
pub fn viterbi(transitions: &TransitionMatrix, emissions: &[PerSentiment<f64>]) -> Result<(Vec<Sentiment>, f64)> {
    let num_sentences = emissions.len();
    if num_sentences == 0 {
        return Ok((Vec::new(), 0.0));
    }
    let log_a = |from: SentimentState, to: SentimentState| log2_prob(transitions.prob(from, to));

    let mut viterbi_prob: Vec<PerSentiment<f64>> = Vec::with_capacity(num_sentences);
    let mut backpointer: Vec<PerSentiment<Sentiment>> = Vec::with_capacity(num_sentences - 1);

    viterbi_prob.push(PerSentiment::from_fn(|s| {
        log_a(SentimentState::Start, s.state()) + emissions[0][s]
    }));

    for t in 1..num_sentences {
        let prev = &viterbi_prob[t - 1];
        let steps = PerSentiment::from_fn(|s| {
            let (from, score) = best_of(|s_prev| prev[s_prev] + log_a(s_prev.state(), s.state()));
            (from, score + emissions[t][s])
        });
        viterbi_prob.push(PerSentiment::from_fn(|s| steps[s].1));
        backpointer.push(PerSentiment::from_fn(|s| steps[s].0));
    }

    let last = &viterbi_prob[num_sentences - 1];
    let (mut current, best_score) = best_of(|s| last[s] + log_a(s.state(), SentimentState::End));
    if best_score == f64::NEG_INFINITY {
        return Err(ClassifierError::DegenerateDecodePath { sentences: num_sentences });
    }

    let mut path = Vec::with_capacity(num_sentences);
    path.push(current);
    for pointers in backpointer.iter().rev() {
        current = pointers[current];
        path.push(current);
    }
    path.reverse();
    Ok((path, best_score))
}

impl HiddenMarkovModel {
    /// Tokenizes `text` at the model's order and replaces out-of-vocabulary
    /// tokens with `<unk>`.
    pub fn prepare_sentence(&self, text: &str) -> Sentence {
        self.vocabulary().map_unknown(tokenize_sentence(text, self.config().order.n()))
    }

    /// Emission scores for each sentence under every sentiment.
    pub fn emission_scores(&self, sentences: &[Sentence]) -> Vec<PerSentiment<f64>> {
        let emission = self.emission();
        sentences
            .iter()
            .map(|sentence| PerSentiment::from_fn(|s| emission.log_prob(s, sentence)))
            .collect()
    }

    pub fn decode(&self, review: &Review) -> Result<Decoded> {
        let sentences: Vec<Sentence> = review
            .sentences
            .iter()
            .map(|labeled| self.prepare_sentence(&labeled.text))
            .collect();
        let (predicted, log_prob) = viterbi(self.transitions(), &self.emission_scores(&sentences))?;
        debug!(review = %review.header(), ?predicted, log_prob, "decoded review");
        Ok(Decoded {
            predicted,
            ground_truth: review.ground_truth(),
            log_prob,
        })
    }

    /// Parses and decodes a single review block.
    pub fn decode_block(&self, block: &str) -> Result<Decoded> {
        self.decode(&Review::parse(block)?)
    }
}
