use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::db::{ClimateRepository, ClimateStore, DbError, Measurement, Station};

/// In-memory copy of the climate tables, loaded once and never mutated
#[derive(Debug, Clone, Default)]
pub struct ClimateSnapshot {
    measurements: Arc<Vec<Measurement>>,
    stations: Arc<Vec<Station>>,
    max_date: Option<NaiveDate>,
}

impl ClimateSnapshot {
    pub fn new(measurements: Vec<Measurement>, stations: Vec<Station>) -> Self {
        let max_date = measurements.iter().map(|m| m.date).max();
        Self {
            measurements: Arc::new(measurements),
            stations: Arc::new(stations),
            max_date,
        }
    }

    #[instrument(skip(repo))]
    pub async fn load(repo: &ClimateRepository) -> Result<Self, DbError> {
        let measurements = repo.find_all_measurements().await?;
        let stations = repo.find_all_stations().await?;

        let snapshot = Self::new(measurements, stations);
        info!(
            "Loaded climate snapshot: {} measurements, {} stations, latest date {:?}",
            snapshot.measurements.len(),
            snapshot.stations.len(),
            snapshot.max_date
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl ClimateStore for ClimateSnapshot {
    async fn measurements(&self) -> Result<Arc<Vec<Measurement>>, DbError> {
        Ok(Arc::clone(&self.measurements))
    }

    async fn stations(&self) -> Result<Arc<Vec<Station>>, DbError> {
        Ok(Arc::clone(&self.stations))
    }

    async fn max_date(&self) -> Result<Option<NaiveDate>, DbError> {
        Ok(self.max_date)
    }
}
