//! Aggregate queries over the climate tables
//!
//! Every function here is pure: it takes rows already read from a
//! [`ClimateStore`](crate::db::ClimateStore) and computes a result set.
//!
//! Two boundary conventions coexist and are both part of the API contract:
//! the "last year" queries keep rows strictly after `max_date - 365 days`,
//! while [`temperature_stats`] keeps rows inclusively between the
//! caller's start and end dates.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::db::{Measurement, PrecipitationSeries, Station, TemperatureStats, TobsEntry};

/// Length of the trailing window served by the last-year endpoints
pub const LAST_YEAR_DAYS: i64 = 365;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid date '{input}' ({reason}); expected YYYY-MM-DD")]
    InvalidDate { input: String, reason: String },
    #[error("No temperature observations found {}", describe_range(.start, .end))]
    NotFound {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
}

fn describe_range(start: &NaiveDate, end: &Option<NaiveDate>) -> String {
    match end {
        Some(end) => format!("between {} and {}", format_date(*start), format_date(*end)),
        None => format!("on or after {}", format_date(*start)),
    }
}

/// Date range used to filter measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    /// `None` means through the latest record
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Last-year membership test. The lower bound is exclusive, so a window
    /// ending 2017-08-23 keeps 2016-08-24 but not 2016-08-23.
    pub fn contains_last_year(&self, date: NaiveDate) -> bool {
        date > self.start
    }

    /// Inclusive membership test used for caller-supplied ranges
    pub fn contains_inclusive(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.map_or(true, |end| date <= end)
    }
}

/// Parse a `YYYY-MM-DD` date
///
/// The input must have exactly three dash-separated numeric segments that
/// form a real calendar date. Segments need not be zero padded.
pub fn parse_date(input: &str) -> Result<NaiveDate, QueryError> {
    let invalid = |reason: &str| QueryError::InvalidDate {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 3 {
        return Err(invalid("expected three dash-separated parts"));
    }

    if parts
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid("date parts must be numeric"));
    }

    let year: i32 = parts[0].parse().map_err(|_| invalid("year out of range"))?;
    let month: u32 = parts[1].parse().map_err(|_| invalid("month out of range"))?;
    let day: u32 = parts[2].parse().map_err(|_| invalid("day out of range"))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("no such calendar date"))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Window covering the year before the latest measurement
///
/// Returns `None` when there are no measurements.
pub fn max_date_window(measurements: &[Measurement]) -> Option<DateWindow> {
    let max_date = measurements.iter().map(|m| m.date).max()?;
    Some(window_ending(max_date))
}

/// Last-year window for a known maximum date
pub fn window_ending(max_date: NaiveDate) -> DateWindow {
    DateWindow {
        start: max_date - Duration::days(LAST_YEAR_DAYS),
        end: Some(max_date),
    }
}

/// Precipitation by date over the last year
///
/// When several stations report on the same date the row iterated last
/// wins.
pub fn precipitation_series(measurements: &[Measurement]) -> PrecipitationSeries {
    let Some(window) = max_date_window(measurements) else {
        return PrecipitationSeries::new();
    };

    measurements
        .iter()
        .filter(|m| window.contains_last_year(m.date))
        .map(|m| (format_date(m.date), m.precipitation))
        .collect()
}

pub fn station_list(stations: &[Station]) -> Vec<Station> {
    stations.to_vec()
}

/// Temperature observations over the last year joined to station names
///
/// Measurements whose station code has no station row are dropped.
pub fn tobs_series(measurements: &[Measurement], stations: &[Station]) -> Vec<TobsEntry> {
    let Some(window) = max_date_window(measurements) else {
        return Vec::new();
    };

    let names: HashMap<&str, &str> = stations
        .iter()
        .map(|s| (s.station_code.as_str(), s.name.as_str()))
        .collect();

    measurements
        .iter()
        .filter(|m| window.contains_last_year(m.date))
        .filter_map(|m| {
            names.get(m.station_code.as_str()).map(|name| TobsEntry {
                station: m.station_code.clone(),
                temp: m.temperature_observation,
                name: name.to_string(),
            })
        })
        .collect()
}

/// Max, min and average temperature for `start <= date <= end`
///
/// An absent `end` leaves the range open. An empty selection is
/// [`QueryError::NotFound`].
pub fn temperature_stats(
    measurements: &[Measurement],
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<TemperatureStats, QueryError> {
    let window = DateWindow { start, end };

    let mut count = 0usize;
    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;

    for m in measurements.iter().filter(|m| window.contains_inclusive(m.date)) {
        let tobs = m.temperature_observation;
        count += 1;
        sum += tobs;
        max = max.max(tobs);
        min = min.min(tobs);
    }

    if count == 0 {
        return Err(QueryError::NotFound { start, end });
    }

    Ok(TemperatureStats {
        max,
        min,
        avg: round_one_decimal(sum / count as f64),
    })
}

/// Round to one decimal place from the exact binary value
///
/// Precision formatting rounds the stored value itself, so 70.35 (stored
/// as 70.3499...) becomes 70.3. Exact ties such as 70.25 go to even.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
