use thiserror::Error;

/// Errors raised while training, decoding or evaluating the review model
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Malformed record '{line}': {reason}")]
    MalformedRecord { line: String, reason: String },

    #[error("Insufficient smoothing statistics: order-{order} frequency of frequency N({value}) is missing or zero")]
    InsufficientSmoothingStatistics { order: usize, value: u64 },

    #[error("Every decode path collapsed to zero probability for a review of {sentences} sentence(s)")]
    DegenerateDecodePath { sentences: usize },

    #[error("Cannot evaluate an empty corpus")]
    EmptyCorpus,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
