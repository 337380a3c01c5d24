use std::ops::Add;

use tracing::{info, warn};

use crate::corpus::file::PredictionRow;
use crate::corpus::Review;
use crate::error::{ClassifierError, Result};
use crate::hidden_markov_model::HiddenMarkovModel;
use crate::util::{get_percent, multi_thread_process_list};

/// Sentence-level agreement counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub total: usize,
}

impl Tally {
    pub fn accuracy(self) -> Result<f64> {
        if self.total == 0 {
            return Err(ClassifierError::EmptyCorpus);
        }
        Ok(self.correct as f64 / self.total as f64)
    }
}

impl Add for Tally {
    type Output = Tally;

    fn add(self, other: Tally) -> Tally {
        Tally {
            correct: self.correct + other.correct,
            total: self.total + other.total,
        }
    }
}

impl HiddenMarkovModel {
    /// Decodes every review and counts sentence-level matches.
    pub fn tally(&self, reviews: &[Review]) -> Result<Tally> {
        let mut tally = Tally::default();
        for review in reviews {
            let decoded = self.decode(review).inspect_err(|e| {
                warn!(review = %review.header(), error = %e, "failed to decode review");
            })?;
            tally.total += decoded.ground_truth.len();
            tally.correct += decoded
                .predicted
                .iter()
                .zip(&decoded.ground_truth)
                .filter(|(predicted, actual)| predicted == actual)
                .count();
        }
        Ok(tally)
    }

    /// Fraction of sentences whose decoded sentiment matches the label.
    pub fn evaluate(&self, reviews: &[Review]) -> Result<f64> {
        let accuracy = self.tally(reviews)?.accuracy()?;
        info!(reviews = reviews.len(), accuracy = get_percent(accuracy), "evaluated model");
        Ok(accuracy)
    }

    /// Same result as [`HiddenMarkovModel::evaluate`], with reviews split
    /// across `num_threads` scoped threads sharing the model.
    pub fn evaluate_parallel(&self, reviews: &[Review], num_threads: usize) -> Result<f64> {
        let tally = multi_thread_process_list(reviews, self, num_threads, |model, chunk| model.tally(chunk))
            .into_iter()
            .try_fold(Tally::default(), |acc, chunk| chunk.map(|t| acc + t))?;
        let accuracy = tally.accuracy()?;
        info!(
            reviews = reviews.len(),
            threads = num_threads,
            accuracy = get_percent(accuracy),
            "evaluated model"
        );
        Ok(accuracy)
    }

    /// One row per decoded sentence, in corpus order.
    pub fn predictions(&self, reviews: &[Review]) -> Result<Vec<PredictionRow>> {
        let mut rows = Vec::new();
        for review in reviews {
            let decoded = self.decode(review)?;
            let header = review.header();
            rows.extend(
                decoded
                    .predicted
                    .into_iter()
                    .zip(decoded.ground_truth)
                    .enumerate()
                    .map(|(sentence, (predicted, actual))| PredictionRow {
                        review: header.clone(),
                        sentence,
                        predicted,
                        actual,
                    }),
            );
        }
        Ok(rows)
    }
}
