use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::db::{ClimateStore, DbError, Measurement, MeasurementRow, Station};
use crate::query::parse_date;

/// Reads the `measurement` and `station` tables on every call
#[derive(Clone)]
pub struct ClimateRepository {
    pool: SqlitePool,
}

impl ClimateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn find_all_measurements(&self) -> Result<Vec<Measurement>, DbError> {
        debug!("Querying all measurements");

        let rows = sqlx::query_as::<_, MeasurementRow>(
            r#"
            SELECT station, date, prcp, tobs
            FROM measurement
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let measurements = rows
            .into_iter()
            .map(Measurement::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Found {} measurements", measurements.len());
        Ok(measurements)
    }

    #[instrument(skip(self))]
    pub async fn find_all_stations(&self) -> Result<Vec<Station>, DbError> {
        debug!("Querying all stations");

        let stations = sqlx::query_as::<_, Station>(
            r#"
            SELECT id, station, name, latitude, longitude, elevation
            FROM station
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} stations", stations.len());
        Ok(stations)
    }

    /// Latest measurement date computed by the database
    #[instrument(skip(self))]
    pub async fn find_max_date(&self) -> Result<Option<NaiveDate>, DbError> {
        debug!("Querying latest measurement date");

        let max_date: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        match max_date {
            Some(value) => {
                let date =
                    parse_date(&value).map_err(|_| DbError::InvalidStoredDate { value })?;
                debug!("Latest measurement date is {}", date);
                Ok(Some(date))
            }
            None => {
                debug!("No measurements found in database");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ClimateStore for ClimateRepository {
    async fn measurements(&self) -> Result<Arc<Vec<Measurement>>, DbError> {
        Ok(Arc::new(self.find_all_measurements().await?))
    }

    async fn stations(&self) -> Result<Arc<Vec<Station>>, DbError> {
        Ok(Arc::new(self.find_all_stations().await?))
    }

    async fn max_date(&self) -> Result<Option<NaiveDate>, DbError> {
        self.find_max_date().await
    }
}
