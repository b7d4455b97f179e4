use thiserror::Error;
use time::Date;

/// Errors raised while turning a series into a calendar plot
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PlotError {
    #[error("multiple entries for {date}; resample by day with an aggregation method")]
    DuplicateDay { date: Date },

    #[error("series contains no data")]
    NoData,

    #[error("year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),

    #[error("expected {expected} {what} labels, got {found}")]
    LabelCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("vmin ({vmin}) is greater than vmax ({vmax})")]
    InvertedBounds { vmin: f64, vmax: f64 },

    #[error("tick index {index} is out of range for {len} labels")]
    TickIndex { index: usize, len: usize },
}
