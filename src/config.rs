use std::{fmt::Display, fs, path::Path, str::FromStr};

use json::{parse, JsonValue};

use crate::error::{ClassifierError, Result};

/*
Config file structure, every key optional:
{
    "order": 1,                     n-gram order used for emissions (1 or 2)
    "cutoff": 5,                    Good-Turing cutoff k
    "transition_smoothing": 0.0,    flattens the transition matrix, x >= 0
    "chi_square_threshold": 5.0,    admissibility threshold c
    "chi_square_smoother": 0.0      additive smoother folded into the contingency table
}
*/

fn get_json<T>(obj: &JsonValue, k: &str, def: T) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    if !obj.has_key(k) {
        return Ok(def);
    }
    obj[k]
        .dump()
        .parse::<T>()
        .map_err(|e| ClassifierError::InvalidConfig(format!("{}: {}", k, e)))
}

/// Which language model drives the sentence emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NGramOrder {
    Unigram,
    Bigram,
}

impl NGramOrder {
    pub fn n(self) -> usize {
        match self {
            NGramOrder::Unigram => 1,
            NGramOrder::Bigram => 2,
        }
    }
}

impl TryFrom<usize> for NGramOrder {
    type Error = ClassifierError;

    fn try_from(n: usize) -> Result<Self> {
        match n {
            1 => Ok(NGramOrder::Unigram),
            2 => Ok(NGramOrder::Bigram),
            other => Err(ClassifierError::InvalidConfig(format!(
                "n-gram order must be 1 or 2, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub order: NGramOrder,
    // counts above the cutoff are trusted as-is
    pub cutoff: u64,
    pub transition_smoothing: f64,
    pub chi_square_threshold: f64,
    pub chi_square_smoother: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            order: NGramOrder::Unigram,
            cutoff: 5,
            transition_smoothing: 0.0,
            chi_square_threshold: 5.0,
            chi_square_smoother: 0.0,
        }
    }
}

impl ClassifierConfig {
    pub fn from_json(obj: &JsonValue) -> Result<ClassifierConfig> {
        let defaults = ClassifierConfig::default();
        let order = get_json::<usize>(obj, "order", defaults.order.n())?;
        let config = ClassifierConfig {
            order: NGramOrder::try_from(order)?,
            cutoff: get_json(obj, "cutoff", defaults.cutoff)?,
            transition_smoothing: get_json(obj, "transition_smoothing", defaults.transition_smoothing)?,
            chi_square_threshold: get_json(obj, "chi_square_threshold", defaults.chi_square_threshold)?,
            chi_square_smoother: get_json(obj, "chi_square_smoother", defaults.chi_square_smoother)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn read(file_name: impl AsRef<Path>) -> Result<ClassifierConfig> {
        let file_contents = fs::read_to_string(file_name)?;
        if file_contents.trim().is_empty() {
            return Ok(ClassifierConfig::default());
        }
        ClassifierConfig::from_json(&parse(&file_contents)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cutoff == 0 {
            return Err(ClassifierError::InvalidConfig(
                "Good-Turing cutoff must be a positive integer".to_string(),
            ));
        }
        if !(self.transition_smoothing >= 0.0) {
            return Err(ClassifierError::InvalidConfig(format!(
                "transition smoothing must be >= 0, got {}",
                self.transition_smoothing
            )));
        }
        if !self.chi_square_threshold.is_finite() {
            return Err(ClassifierError::InvalidConfig(format!(
                "chi-square threshold must be finite, got {}",
                self.chi_square_threshold
            )));
        }
        if !(self.chi_square_smoother >= 0.0) {
            return Err(ClassifierError::InvalidConfig(format!(
                "chi-square smoother must be >= 0, got {}",
                self.chi_square_smoother
            )));
        }
        Ok(())
    }
}
