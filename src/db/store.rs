use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::db::{DbError, Measurement, Station};

/// Read accessor over the climate tables
///
/// Rows are returned in store iteration order behind an `Arc`, so an
/// in-memory store can hand out its rows without copying them. Nothing in
/// this crate writes through a store.
#[async_trait]
pub trait ClimateStore: Send + Sync {
    async fn measurements(&self) -> Result<Arc<Vec<Measurement>>, DbError>;

    async fn stations(&self) -> Result<Arc<Vec<Station>>, DbError>;

    /// Latest measurement date, `None` when there are no measurements
    async fn max_date(&self) -> Result<Option<NaiveDate>, DbError> {
        let measurements = self.measurements().await?;
        Ok(measurements.iter().map(|m| m.date).max())
    }
}
