use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::db::DbError;
use crate::query::parse_date;

// Database entity models
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub station_code: String,
    pub date: NaiveDate,
    pub precipitation: Option<f64>,
    pub temperature_observation: f64,
}

/// Raw `measurement` row; dates are stored as `YYYY-MM-DD` text.
#[derive(Debug, Clone, FromRow)]
pub struct MeasurementRow {
    pub station: String,
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: f64,
}

impl TryFrom<MeasurementRow> for Measurement {
    type Error = DbError;

    fn try_from(row: MeasurementRow) -> Result<Self, Self::Error> {
        let date = parse_date(&row.date).map_err(|_| DbError::InvalidStoredDate {
            value: row.date.clone(),
        })?;

        Ok(Measurement {
            station_code: row.station,
            date,
            precipitation: row.prcp,
            temperature_observation: row.tobs,
        })
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
pub struct Station {
    pub id: i64,
    #[sqlx(rename = "station")]
    #[serde(rename = "station")]
    pub station_code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

// API response DTOs (shared by the query engine, services and api modules)

/// Date string (`YYYY-MM-DD`) to precipitation reading, sorted by date.
pub type PrecipitationSeries = BTreeMap<String, Option<f64>>;

/// One temperature observation joined with its station's name
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TobsEntry {
    pub station: String,
    pub temp: f64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TemperatureStats {
    pub max: f64,
    pub min: f64,
    /// Mean temperature rounded to one decimal place
    pub avg: f64,
}
