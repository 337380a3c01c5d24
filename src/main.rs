use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sentiment_hmm::config::{ClassifierConfig, NGramOrder};
use sentiment_hmm::corpus::file::{load_reviews, save_predictions, split_holdout};
use sentiment_hmm::hidden_markov_model::HiddenMarkovModel;
use sentiment_hmm::util::get_percent;

/// Train a sentence-level sentiment HMM on tagged reviews and score it.
#[derive(Parser, Debug)]
#[command(name = "sentiment-hmm", version)]
struct Cli {
    /// Training corpus, reviews separated by blank lines
    #[arg(long)]
    train: PathBuf,

    /// Held-out corpus to evaluate on
    #[arg(long, conflicts_with = "holdout")]
    test: Option<PathBuf>,

    /// Fraction of the training corpus to hold out instead of --test
    #[arg(long)]
    holdout: Option<f64>,

    /// JSON config file; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    order: Option<usize>,

    /// Good-Turing cutoff
    #[arg(long)]
    cutoff: Option<u64>,

    /// Transition smoothing weight
    #[arg(long)]
    smoothing: Option<f64>,

    /// Chi-square admissibility threshold
    #[arg(long)]
    threshold: Option<f64>,

    #[arg(long, default_value = "1")]
    threads: usize,

    /// Write per-sentence predictions to this CSV file
    #[arg(long)]
    predictions: Option<PathBuf>,

    /// Shuffle seed for --holdout
    #[arg(long, default_value = "0")]
    seed: u64,
}

impl Cli {
    fn classifier_config(&self) -> Result<ClassifierConfig> {
        let mut config = match &self.config {
            Some(path) => ClassifierConfig::read(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ClassifierConfig::default(),
        };
        if let Some(order) = self.order {
            config.order = NGramOrder::try_from(order)?;
        }
        if let Some(cutoff) = self.cutoff {
            config.cutoff = cutoff;
        }
        if let Some(smoothing) = self.smoothing {
            config.transition_smoothing = smoothing;
        }
        if let Some(threshold) = self.threshold {
            config.chi_square_threshold = threshold;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.classifier_config()?;

    let reviews = load_reviews(&cli.train).with_context(|| format!("loading {}", cli.train.display()))?;
    let (train, test) = match (&cli.test, cli.holdout) {
        (Some(path), _) => (reviews, load_reviews(path).with_context(|| format!("loading {}", path.display()))?),
        (None, Some(fraction)) => split_holdout(reviews, fraction, cli.seed),
        (None, None) => bail!("pass either --test or --holdout"),
    };
    info!(train = train.len(), test = test.len(), "loaded reviews");

    let model = HiddenMarkovModel::train(&train, &config)?;
    let accuracy = if cli.threads > 1 {
        model.evaluate_parallel(&test, cli.threads)?
    } else {
        model.evaluate(&test)?
    };
    info!("Final result: {}%", get_percent(accuracy));

    if let Some(path) = &cli.predictions {
        let rows = model.predictions(&test)?;
        save_predictions(path, &rows)?;
        info!(file = %path.display(), rows = rows.len(), "wrote predictions");
    }
    Ok(())
}
