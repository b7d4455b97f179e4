//! Reading time series from CSV
use crate::series::TimeSeries;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use thiserror::Error;
use time::{macros::format_description, Date, PrimitiveDateTime, Time};

/// Read a series from CSV with a header row, timestamps in the first column
/// and values in the second.  Empty values are read as NaN, i.e., missing.
pub fn read_series<R: Read>(reader: R) -> Result<TimeSeries, InputError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut series = TimeSeries::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let (Some(when), Some(value)) = (record.get(0), record.get(1)) else {
            return Err(InputError::MissingColumn { line });
        };
        let Some(when) = parse_timestamp(when) else {
            return Err(InputError::Timestamp {
                line,
                value: when.to_owned(),
            });
        };
        let value = if value.is_empty() {
            f64::NAN
        } else {
            value.parse::<f64>().map_err(|_| InputError::Value {
                line,
                value: value.to_owned(),
            })?
        };
        series.push(when, value);
    }
    Ok(series)
}

/// Parse `YYYY-MM-DD`, optionally followed by `T` or a space and `HH:MM` or
/// `HH:MM:SS`
pub fn parse_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    let (date, time) = match s.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (s, None),
    };
    let date = Date::parse(date, format_description!("[year]-[month]-[day]")).ok()?;
    let time = match time {
        Some(time) => Time::parse(time, format_description!("[hour]:[minute]:[second]"))
            .or_else(|_| Time::parse(time, format_description!("[hour]:[minute]")))
            .ok()?,
        None => Time::MIDNIGHT,
    };
    Some(PrimitiveDateTime::new(date, time))
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read CSV input")]
    Csv(#[from] csv::Error),
    #[error("line {line}: invalid timestamp {value:?}")]
    Timestamp { line: u64, value: String },
    #[error("line {line}: invalid value {value:?}")]
    Value { line: u64, value: String },
    #[error("line {line}: expected a date column and a value column")]
    MissingColumn { line: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("2020-02-29"),
            Some(datetime!(2020 - 02 - 29 0:00))
        );
        assert_eq!(
            parse_timestamp("2020-02-29T13:45"),
            Some(datetime!(2020 - 02 - 29 13:45))
        );
        assert_eq!(
            parse_timestamp("2020-02-29 13:45:10"),
            Some(datetime!(2020 - 02 - 29 13:45:10))
        );
        assert_eq!(parse_timestamp("2021-02-29"), None);
        assert_eq!(parse_timestamp("29/02/2020"), None);
        assert_eq!(parse_timestamp("2020-02-29T25:00"), None);
    }

    #[test]
    fn test_read_series() {
        let csv = "date,value\n2020-01-01, 3\n2020-01-01T12:30,1.5\n2020-01-02 08:00:05,\n";
        let series = read_series(csv.as_bytes()).unwrap();
        assert_eq!(series.len(), 3);
        let points = series.iter().collect::<Vec<_>>();
        assert_eq!(*points[0], (date!(2020 - 01 - 01).midnight(), 3.0));
        assert_eq!(*points[1], (datetime!(2020 - 01 - 01 12:30), 1.5));
        assert_eq!(points[2].0, datetime!(2020 - 01 - 02 8:00:05));
        assert!(points[2].1.is_nan());
    }

    #[test]
    fn test_read_series_errors() {
        let err = read_series("date,value\n2020-01-01,1\nyesterday,2\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            InputError::Timestamp { line: 3, ref value } if value == "yesterday"
        ));
        let err = read_series("date,value\n2020-01-01,lots\n".as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::Value { line: 2, .. }));
        let err = read_series("date\n2020-01-01\n".as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn { line: 2 }));
        let err = read_series("date,value\n2020-01-01,1,extra\n".as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::Csv(_)));
    }
}
