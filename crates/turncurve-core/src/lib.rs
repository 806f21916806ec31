#![deny(warnings)]
pub mod model;
pub mod prepare;
pub mod sample;

pub use model::{BASIC_LANDS, BaselineCurve, Dataset, WinRateRecord};
pub use prepare::{PreparedData, prepare};
pub use sample::{CardSeries, ChartSpec, SampleError, chart_spec, sample_card, sample_chart};
