use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{ClassifierError, Result};

pub type Token = String;
pub type Sentence = Vec<Token>;

// sentiment -> every training sentence tagged with it, in corpus order
pub type SentencesBySentiment = PerSentiment<Vec<Sentence>>;

/// A sentence-level sentiment tag. These are the emitting states of the HMM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Fixed enumeration order. Viterbi ties resolve to the earliest entry.
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    pub fn index(self) -> usize {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Sentiment::Negative => "neg",
            Sentiment::Neutral => "neu",
            Sentiment::Positive => "pos",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Sentiment> {
        match tag {
            "neg" => Ok(Sentiment::Negative),
            "neu" => Ok(Sentiment::Neutral),
            "pos" => Ok(Sentiment::Positive),
            other => Err(ClassifierError::MalformedRecord {
                line: tag.to_string(),
                reason: format!("unknown sentiment tag '{}'", other),
            }),
        }
    }

    pub fn state(self) -> SentimentState {
        match self {
            Sentiment::Negative => SentimentState::Negative,
            Sentiment::Neutral => SentimentState::Neutral,
            Sentiment::Positive => SentimentState::Positive,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Hidden alphabet of the review model. `Start` and `End` bracket every review
/// and never emit a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentState {
    Start,
    Negative,
    Neutral,
    Positive,
    End,
}

impl SentimentState {
    pub const COUNT: usize = 5;

    pub const ALL: [SentimentState; SentimentState::COUNT] = [
        SentimentState::Start,
        SentimentState::Negative,
        SentimentState::Neutral,
        SentimentState::Positive,
        SentimentState::End,
    ];

    pub fn index(self) -> usize {
        match self {
            SentimentState::Start => 0,
            SentimentState::Negative => 1,
            SentimentState::Neutral => 2,
            SentimentState::Positive => 3,
            SentimentState::End => 4,
        }
    }

    /// Symbolic name as used by the review markers.
    pub fn name(self) -> &'static str {
        match self {
            SentimentState::Start => "<r>",
            SentimentState::Negative => "neg",
            SentimentState::Neutral => "neu",
            SentimentState::Positive => "pos",
            SentimentState::End => "</r>",
        }
    }
}

impl fmt::Display for SentimentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Sentiment> for SentimentState {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.state()
    }
}

/// One value per sentiment class, indexed by [`Sentiment`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerSentiment<T>([T; 3]);

impl<T> PerSentiment<T> {
    pub fn from_fn(mut f: impl FnMut(Sentiment) -> T) -> Self {
        PerSentiment([
            f(Sentiment::Negative),
            f(Sentiment::Neutral),
            f(Sentiment::Positive),
        ])
    }

    pub fn try_from_fn<E>(mut f: impl FnMut(Sentiment) -> std::result::Result<T, E>) -> std::result::Result<Self, E> {
        Ok(PerSentiment([
            f(Sentiment::Negative)?,
            f(Sentiment::Neutral)?,
            f(Sentiment::Positive)?,
        ]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sentiment, &T)> {
        Sentiment::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T> Index<Sentiment> for PerSentiment<T> {
    type Output = T;

    fn index(&self, sentiment: Sentiment) -> &T {
        &self.0[sentiment.index()]
    }
}

impl<T> IndexMut<Sentiment> for PerSentiment<T> {
    fn index_mut(&mut self, sentiment: Sentiment) -> &mut T {
        &mut self.0[sentiment.index()]
    }
}
