use crate::types::SentimentState;

const N: usize = SentimentState::COUNT;

pub type StateTotals = [[f64; N]; N];

/// Sentiment transition probabilities, rows = source state, columns =
/// destination state.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    states: StateTotals,
}

impl Default for TransitionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionMatrix {
    /// An empty count table. `end -> end` starts at one so the terminal row
    /// normalizes cleanly.
    pub fn new() -> TransitionMatrix {
        let mut states = [[0.0; N]; N];
        states[SentimentState::End.index()][SentimentState::End.index()] = 1.0;
        TransitionMatrix { states }
    }

    pub fn feed(&mut self, from_state: SentimentState, to_state: SentimentState) {
        self.states[from_state.index()][to_state.index()] += 1.0;
    }

    /// Divides every row by its sum. Rows that were never visited stay zero.
    pub fn normalize(mut self) -> TransitionMatrix {
        for row in self.states.iter_mut() {
            let from_total: f64 = row.iter().sum();
            if from_total == 0.0 {
                continue;
            }
            for prob in row.iter_mut() {
                *prob /= from_total;
            }
        }
        self
    }

    /// Flattens the sentiment-to-sentiment block toward uniform. Transitions
    /// into `end` are left alone and each row keeps its total mass.
    pub fn smooth(mut self, x: f64) -> TransitionMatrix {
        if x <= 0.0 {
            return self;
        }
        let emitting = [SentimentState::Negative, SentimentState::Neutral, SentimentState::Positive];
        for from_state in [SentimentState::Negative, SentimentState::Neutral, SentimentState::Positive, SentimentState::Start] {
            let row = &mut self.states[from_state.index()];
            let total_prob: f64 = emitting.iter().map(|s| row[s.index()]).sum();
            for to_state in emitting {
                let prob = &mut row[to_state.index()];
                *prob = total_prob * (*prob + 0.1 * x) / (total_prob + 0.3 * x);
            }
        }
        self
    }

    pub fn prob(&self, from_state: SentimentState, to_state: SentimentState) -> f64 {
        self.states[from_state.index()][to_state.index()]
    }

    pub fn row_sum(&self, from_state: SentimentState) -> f64 {
        self.states[from_state.index()].iter().sum()
    }
}
