use std::{fs, path::Path, sync::OnceLock};

use csv::Writer;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use regex::Regex;
use tracing::info;

use crate::corpus::{parse_reviews, Review};
use crate::error::Result;
use crate::types::Sentiment;

fn block_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\r?\n[ \t]*\r?\n(?:[ \t]*\r?\n)*").expect("valid regex"))
}

/// Splits corpus text into review blocks on blank lines.
pub fn split_blocks(file_contents: &str) -> Vec<String> {
    block_separator()
        .split(file_contents)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(String::from)
        .collect()
}

pub fn load_blocks(file_name: impl AsRef<Path>) -> Result<Vec<String>> {
    let file_contents = fs::read_to_string(file_name.as_ref())?;
    let blocks = split_blocks(&file_contents);
    info!(file = %file_name.as_ref().display(), blocks = blocks.len(), "loaded corpus blocks");
    Ok(blocks)
}

pub fn load_reviews(file_name: impl AsRef<Path>) -> Result<Vec<Review>> {
    parse_reviews(&load_blocks(file_name)?)
}

/// Deterministically shuffles `reviews` and holds out `fraction` of them.
/// Returns `(train, test)`.
pub fn split_holdout(mut reviews: Vec<Review>, fraction: f64, seed: u64) -> (Vec<Review>, Vec<Review>) {
    let mut rng = StdRng::seed_from_u64(seed);
    reviews.shuffle(&mut rng);
    let num_test = (reviews.len() as f64 * fraction.clamp(0.0, 1.0)).round() as usize;
    let train = reviews.split_off(num_test);
    (train, reviews)
}

/// One decoded sentence next to its ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    pub review: String,
    pub sentence: usize,
    pub predicted: Sentiment,
    pub actual: Sentiment,
}

pub fn save_predictions(file_name: impl AsRef<Path>, rows: &[PredictionRow]) -> Result<()> {
    let mut writer = Writer::from_path(file_name)?;
    writer.write_record(["review", "sentence", "predicted", "actual"])?;
    for row in rows {
        let sentence = row.sentence.to_string();
        writer.write_record([
            row.review.as_str(),
            sentence.as_str(),
            row.predicted.tag(),
            row.actual.tag(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
