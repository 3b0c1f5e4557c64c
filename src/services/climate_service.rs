use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{debug, instrument};

use crate::db::{
    ClimateStore, DbError, PrecipitationSeries, Station, TemperatureStats, TobsEntry,
};
use crate::query::{self, DateWindow, QueryError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidDate(QueryError),
    #[error("{0}")]
    NotFound(QueryError),
    #[error("Climate data store unavailable: {0}")]
    DataStoreUnavailable(#[from] DbError),
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidDate { .. } => ServiceError::InvalidDate(err),
            QueryError::NotFound { .. } => ServiceError::NotFound(err),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::DataStoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Clone)]
pub struct ClimateService {
    store: Arc<dyn ClimateStore>,
}

impl ClimateService {
    pub fn new(store: Arc<dyn ClimateStore>) -> Self {
        Self { store }
    }

    /// Trailing one-year window ending at the latest measurement
    #[instrument(skip(self))]
    pub async fn last_year_window(&self) -> Result<Option<DateWindow>, ServiceError> {
        let max_date = self.store.max_date().await?;
        debug!("Latest measurement date: {:?}", max_date);
        Ok(max_date.map(query::window_ending))
    }

    #[instrument(skip(self))]
    pub async fn precipitation(&self) -> Result<PrecipitationSeries, ServiceError> {
        let measurements = self.store.measurements().await?;
        Ok(query::precipitation_series(&measurements))
    }

    #[instrument(skip(self))]
    pub async fn stations(&self) -> Result<Vec<Station>, ServiceError> {
        let stations = self.store.stations().await?;
        Ok(query::station_list(&stations))
    }

    #[instrument(skip(self))]
    pub async fn tobs(&self) -> Result<Vec<TobsEntry>, ServiceError> {
        let measurements = self.store.measurements().await?;
        let stations = self.store.stations().await?;
        Ok(query::tobs_series(&measurements, &stations))
    }

    /// Temperature statistics for `start..=end`, or from `start` onward
    ///
    /// Dates are validated before the store is read.
    #[instrument(skip(self))]
    pub async fn temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, ServiceError> {
        let start = query::parse_date(start)?;
        let end = end.map(query::parse_date).transpose()?;

        let measurements = self.store.measurements().await?;
        Ok(query::temperature_stats(&measurements, start, end)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ClimateSnapshot, Measurement};
    use chrono::NaiveDate;

    fn service() -> ClimateService {
        let measurements = vec![Measurement {
            station_code: "USC00519397".to_string(),
            date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
            precipitation: Some(0.0),
            temperature_observation: 70.0,
        }];
        ClimateService::new(Arc::new(ClimateSnapshot::new(measurements, vec![])))
    }

    #[test]
    fn test_status_codes() {
        let invalid: ServiceError = QueryError::InvalidDate {
            input: "x".to_string(),
            reason: "bad".to_string(),
        }
        .into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let not_found: ServiceError = QueryError::NotFound {
            start: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            end: None,
        }
        .into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let unavailable = ServiceError::DataStoreUnavailable(DbError::InvalidStoredDate {
            value: "garbage".to_string(),
        });
        assert_eq!(
            unavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_temperature_stats_rejects_bad_end_date() {
        let err = service()
            .temperature_stats("2017-01-01", Some("2017-01-xx"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn test_temperature_stats_single_row() {
        let stats = service()
            .temperature_stats("2017-01-01", Some("2017-01-01"))
            .await
            .unwrap();
        assert_eq!(stats.max, 70.0);
        assert_eq!(stats.min, 70.0);
        assert_eq!(stats.avg, 70.0);
    }

    #[tokio::test]
    async fn test_last_year_window() {
        let window = service().last_year_window().await.unwrap().unwrap();
        // 2016 is a leap year, so 365 days back lands on January 2nd
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2016, 1, 2).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2017, 1, 1));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let service = ClimateService::new(Arc::new(ClimateSnapshot::default()));

        assert_eq!(service.last_year_window().await.unwrap(), None);
        assert!(service.precipitation().await.unwrap().is_empty());
        assert!(service.tobs().await.unwrap().is_empty());
        assert!(service.stations().await.unwrap().is_empty());
        assert!(matches!(
            service.temperature_stats("2017-01-01", None).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
