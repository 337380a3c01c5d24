use tracing::info;

pub mod file;

use crate::error::{ClassifierError, Result};
use crate::markov_chain::TransitionMatrix;
use crate::types::{SentencesBySentiment, Sentiment, SentimentState};
use crate::vocabulary::{split_line, tokenize_sentence, Vocabulary, VocabularyBuilder};

/// One sentiment-tagged sentence of a review, untokenized.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSentence {
    pub sentiment: Sentiment,
    pub text: String,
}

/// A review record: a `category_label_id` header followed by tagged sentences.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub category: String,
    pub label: String,
    pub id: String,
    pub sentences: Vec<LabeledSentence>,
}

impl Review {
    pub fn parse(block: &str) -> Result<Review> {
        let mut lines = block.lines().filter(|l| !l.trim().is_empty());
        let header = lines.next().ok_or_else(|| ClassifierError::MalformedRecord {
            line: block.to_string(),
            reason: "review has no header line".to_string(),
        })?;

        let fields: Vec<&str> = header.trim().split('_').collect();
        let [category, label, id] = fields.as_slice() else {
            return Err(ClassifierError::MalformedRecord {
                line: header.to_string(),
                reason: format!("header needs three underscore-separated fields, found {}", fields.len()),
            });
        };

        let sentences = lines
            .map(|line| {
                let (sentiment, text) = split_line(line)?;
                Ok(LabeledSentence { sentiment, text: text.to_string() })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Review {
            category: category.to_string(),
            label: label.to_string(),
            id: id.to_string(),
            sentences,
        })
    }

    pub fn ground_truth(&self) -> Vec<Sentiment> {
        self.sentences.iter().map(|s| s.sentiment).collect()
    }

    /// The review's state path including the `<r>` / `</r>` boundaries.
    pub fn state_path(&self) -> Vec<SentimentState> {
        let mut path = Vec::with_capacity(self.sentences.len() + 2);
        path.push(SentimentState::Start);
        path.extend(self.sentences.iter().map(|s| s.sentiment.state()));
        path.push(SentimentState::End);
        path
    }

    pub fn header(&self) -> String {
        format!("{}_{}_{}", self.category, self.label, self.id)
    }
}

pub fn parse_reviews<S: AsRef<str>>(blocks: &[S]) -> Result<Vec<Review>> {
    blocks.iter().map(|b| Review::parse(b.as_ref())).collect()
}

/// Everything the corpus parser produces in one pass.
#[derive(Debug, Clone)]
pub struct ParsedCorpus {
    pub transitions: TransitionMatrix,
    pub sentences_by_sentiment: SentencesBySentiment,
    pub vocabulary: Vocabulary,
}

/// Walks the corpus once: counts sentiment transitions, routes every tokenized
/// sentence to its class and grows the vocabulary along the way.
pub fn parse_corpus(reviews: &[Review], order: usize) -> ParsedCorpus {
    let mut transitions = TransitionMatrix::new();
    let mut sentences_by_sentiment = SentencesBySentiment::default();
    let mut vocabulary = VocabularyBuilder::new();

    for review in reviews {
        for labeled in &review.sentences {
            let sentence = vocabulary.observe(tokenize_sentence(&labeled.text, order));
            sentences_by_sentiment[labeled.sentiment].push(sentence);
        }
        for step in review.state_path().windows(2) {
            transitions.feed(step[0], step[1]);
        }
    }

    info!(
        reviews = reviews.len(),
        vocabulary = vocabulary.len(),
        "parsed training corpus"
    );
    ParsedCorpus {
        transitions: transitions.normalize(),
        sentences_by_sentiment,
        vocabulary: vocabulary.finish(),
    }
}
