use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::model::{BaselineCurve, Dataset};

/// Display convention for the y axis. Values outside the window are clipped
/// visually, never altered in the data.
pub const WIN_RATE_AXIS: (f64, f64) = (0.4, 0.7);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("no cards remain after land filtering")]
    EmptyDataset,
    #[error("baseline has no entry for turn {turn}")]
    MissingBaseline { turn: u32 },
}

/// A single card's win-rate-by-turn curve, sorted ascending by turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSeries {
    pub card_name: String,
    pub points: Vec<(u32, f64)>,
}

/// Everything a backend needs to draw one comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub card_name: String,
    pub card_points: Vec<(u32, f64)>,
    pub baseline_points: Vec<(u32, f64)>,
    pub x_max: u32,
    pub y_range: (f64, f64),
}

/// Pick one card uniformly at random and extract its sorted series.
pub fn sample_card<R: Rng>(dataset: &Dataset, rng: &mut R) -> Result<CardSeries, SampleError> {
    let names = dataset.card_names();
    if names.is_empty() {
        return Err(SampleError::EmptyDataset);
    }

    let card_name = names[rng.gen_range(0..names.len())].to_string();
    let points = dataset.series_for(&card_name);

    Ok(CardSeries { card_name, points })
}

/// Pair a sampled series with the baseline over the same x domain.
///
/// The baseline is derived from the same filtered dataset, so every turn in
/// the series must resolve; a miss is an invariant violation reported as
/// `MissingBaseline`, never silently dropped.
pub fn chart_spec(series: &CardSeries, baseline: &BaselineCurve) -> Result<ChartSpec, SampleError> {
    for &(turn, _) in &series.points {
        if !baseline.contains(turn) {
            return Err(SampleError::MissingBaseline { turn });
        }
    }

    let x_max = series.points.last().map(|&(turn, _)| turn).unwrap_or(0);
    let baseline_points: Vec<(u32, f64)> = baseline
        .iter()
        .filter(|&(turn, _)| turn <= x_max)
        .collect();

    Ok(ChartSpec {
        title: format!("Win Rate of {} Over Turns", series.card_name),
        card_name: series.card_name.clone(),
        card_points: series.points.clone(),
        baseline_points,
        x_max,
        y_range: WIN_RATE_AXIS,
    })
}

/// One full trigger cycle: sample a card, then build its chart spec.
pub fn sample_chart<R: Rng>(
    dataset: &Dataset,
    baseline: &BaselineCurve,
    rng: &mut R,
) -> Result<ChartSpec, SampleError> {
    let series = sample_card(dataset, rng)?;
    chart_spec(&series, baseline)
}
