use crate::error::PlotError;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, PrimitiveDateTime};

/// A sequence of timestamped observations.  Timestamps may be finer than
/// daily and may repeat; NaN values count as missing observations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<(PrimitiveDateTime, f64)>,
}

impl TimeSeries {
    pub fn new() -> TimeSeries {
        TimeSeries::default()
    }

    pub fn push(&mut self, when: PrimitiveDateTime, value: f64) {
        self.points.push((when, value));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (PrimitiveDateTime, f64)> {
        self.points.iter()
    }

    /// The earliest calendar year with an entry, counting entries whose value
    /// is missing
    pub fn first_year(&self) -> Option<i32> {
        self.points.iter().map(|(when, _)| when.year()).min()
    }

    /// The distinct calendar years with at least one entry, ascending
    pub fn years(&self) -> Vec<i32> {
        self.points
            .iter()
            .map(|(when, _)| when.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<(PrimitiveDateTime, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (PrimitiveDateTime, f64)>>(iter: I) -> Self {
        TimeSeries {
            points: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(Date, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (Date, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(date, value)| (date.midnight(), value))
            .collect()
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a (PrimitiveDateTime, f64);
    type IntoIter = std::slice::Iter<'a, (PrimitiveDateTime, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// How to reduce several same-day observations to one value
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Aggregation {
    Sum,
    Mean,
    Median,
    Min,
    Max,
    Count,
    First,
    Last,
    Std,
}

impl Aggregation {
    const ALL: [Aggregation; 9] = [
        Aggregation::Sum,
        Aggregation::Mean,
        Aggregation::Median,
        Aggregation::Min,
        Aggregation::Max,
        Aggregation::Count,
        Aggregation::First,
        Aggregation::Last,
        Aggregation::Std,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Count => "count",
            Aggregation::First => "first",
            Aggregation::Last => "last",
            Aggregation::Std => "std",
        }
    }

    /// Reduce the non-NaN observations of one day.  Returns `None` when the
    /// reduction is undefined, which leaves the day masked.
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        match self {
            Aggregation::Sum => Some(values.iter().sum()),
            Aggregation::Count => Some(values.len() as f64),
            Aggregation::Mean => {
                (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
            }
            Aggregation::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                match sorted.len() {
                    0 => None,
                    n if n % 2 == 1 => sorted.get(mid).copied(),
                    _ => Some((sorted.get(mid - 1)? + sorted.get(mid)?) / 2.0),
                }
            }
            Aggregation::Min => values.iter().copied().reduce(f64::min),
            Aggregation::Max => values.iter().copied().reduce(f64::max),
            Aggregation::First => values.first().copied(),
            Aggregation::Last => values.last().copied(),
            Aggregation::Std => {
                // Sample standard deviation, as with one degree of freedom
                if values.len() < 2 {
                    return None;
                }
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
                Some((ss / (n - 1.0)).sqrt())
            }
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aggregation {
    type Err = ParseAggregationError;

    fn from_str(s: &str) -> Result<Aggregation, ParseAggregationError> {
        Aggregation::ALL
            .into_iter()
            .find(|how| how.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseAggregationError(s.to_owned()))
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown aggregation method {0:?}")]
pub struct ParseAggregationError(String);

/// A series with at most one value per calendar day
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DailySeries(BTreeMap<Date, f64>);

impl DailySeries {
    pub fn get(&self, date: Date) -> Option<f64> {
        self.0.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.0.iter().map(|(&date, &value)| (date, value))
    }

    pub fn years(&self) -> Vec<i32> {
        self.0
            .keys()
            .map(|d| d.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Smallest daily value, or `None` for an empty series
    pub fn min(&self) -> Option<f64> {
        self.0.values().copied().reduce(f64::min)
    }

    /// Largest daily value, or `None` for an empty series
    pub fn max(&self) -> Option<f64> {
        self.0.values().copied().reduce(f64::max)
    }
}

impl FromIterator<(Date, f64)> for DailySeries {
    fn from_iter<I: IntoIterator<Item = (Date, f64)>>(iter: I) -> Self {
        DailySeries(
            iter.into_iter()
                .filter(|(_, value)| !value.is_nan())
                .collect(),
        )
    }
}

/// Collapse `series` to one value per calendar day.
///
/// With `how = None` the series is taken to be sampled by day already, and a
/// second entry for any day is an error.
pub fn resample(series: &TimeSeries, how: Option<Aggregation>) -> Result<DailySeries, PlotError> {
    let daily = match how {
        None => {
            let mut seen = BTreeSet::new();
            let mut days = BTreeMap::new();
            for &(when, value) in series {
                let date = when.date();
                if !seen.insert(date) {
                    return Err(PlotError::DuplicateDay { date });
                }
                if !value.is_nan() {
                    days.insert(date, value);
                }
            }
            DailySeries(days)
        }
        Some(how) => {
            let mut groups = BTreeMap::<Date, Vec<f64>>::new();
            for &(when, value) in series {
                let day = groups.entry(when.date()).or_default();
                if !value.is_nan() {
                    day.push(value);
                }
            }
            groups
                .into_iter()
                .filter_map(|(date, values)| how.apply(&values).map(|v| (date, v)))
                .collect()
        }
    };
    tracing::debug!(
        entries = series.len(),
        days = daily.len(),
        how = how.map_or("none", Aggregation::name),
        "resampled series by day"
    );
    Ok(daily)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_sum_by_day() {
        let series = TimeSeries::from_iter([
            (datetime!(2020-03-01 08:00), 1.0),
            (datetime!(2020-03-01 17:30), 2.5),
            (datetime!(2020-03-03 00:00), 4.0),
        ]);
        let daily = resample(&series, Some(Aggregation::Sum)).unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily.get(date!(2020 - 03 - 01)), Some(3.5));
        assert_eq!(daily.get(date!(2020 - 03 - 02)), None);
        assert_eq!(daily.get(date!(2020 - 03 - 03)), Some(4.0));
    }

    #[test]
    fn test_mean_and_count() {
        let series = TimeSeries::from_iter([
            (datetime!(2021-01-05 01:00), 2.0),
            (datetime!(2021-01-05 02:00), 4.0),
            (datetime!(2021-01-05 03:00), f64::NAN),
        ]);
        let mean = resample(&series, Some(Aggregation::Mean)).unwrap();
        assert_eq!(mean.get(date!(2021 - 01 - 05)), Some(3.0));
        let count = resample(&series, Some(Aggregation::Count)).unwrap();
        assert_eq!(count.get(date!(2021 - 01 - 05)), Some(2.0));
    }

    #[test]
    fn test_all_nan_day() {
        let series = TimeSeries::from_iter([(datetime!(2021-06-01 12:00), f64::NAN)]);
        let sum = resample(&series, Some(Aggregation::Sum)).unwrap();
        assert_eq!(sum.get(date!(2021 - 06 - 01)), Some(0.0));
        let mean = resample(&series, Some(Aggregation::Mean)).unwrap();
        assert!(mean.is_empty());
    }

    #[test]
    fn test_median_and_std() {
        assert_eq!(Aggregation::Median.apply(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(Aggregation::Median.apply(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(Aggregation::Median.apply(&[]), None);
        assert_eq!(Aggregation::Std.apply(&[1.0]), None);
        assert_eq!(Aggregation::Std.apply(&[2.0, 4.0]), Some(2.0_f64.sqrt()));
        assert_eq!(Aggregation::First.apply(&[7.0, 8.0]), Some(7.0));
        assert_eq!(Aggregation::Last.apply(&[7.0, 8.0]), Some(8.0));
    }

    #[test]
    fn test_already_daily() {
        let series = TimeSeries::from_iter([
            (date!(2019 - 12 - 31), 1.0),
            (date!(2020 - 01 - 01), 2.0),
        ]);
        let daily = resample(&series, None).unwrap();
        assert_eq!(daily.years(), vec![2019, 2020]);
        assert_eq!(daily.min(), Some(1.0));
        assert_eq!(daily.max(), Some(2.0));
    }

    #[test]
    fn test_already_daily_rejects_duplicates() {
        let series = TimeSeries::from_iter([
            (datetime!(2020-02-02 09:00), 1.0),
            (datetime!(2020-02-02 10:00), 2.0),
        ]);
        assert_eq!(
            resample(&series, None),
            Err(PlotError::DuplicateDay {
                date: date!(2020 - 02 - 02)
            })
        );
    }

    #[test]
    fn test_empty_reductions() {
        let daily = resample(&TimeSeries::new(), Some(Aggregation::Sum)).unwrap();
        assert!(daily.is_empty());
        assert_eq!(daily.min(), None);
        assert_eq!(daily.max(), None);
        assert_eq!(TimeSeries::new().first_year(), None);
    }

    #[test]
    fn test_parse_aggregation() {
        assert_eq!("sum".parse::<Aggregation>(), Ok(Aggregation::Sum));
        assert_eq!("Mean".parse::<Aggregation>(), Ok(Aggregation::Mean));
        assert_eq!("std".parse::<Aggregation>(), Ok(Aggregation::Std));
        assert!("average".parse::<Aggregation>().is_err());
        assert_eq!(Aggregation::Median.to_string(), "median");
    }
}
