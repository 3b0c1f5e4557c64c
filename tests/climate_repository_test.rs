// Tests for ClimateRepository and ClimateSnapshot against an in-memory
// SQLite database built from the migrations

mod common;

use chrono::NaiveDate;
use climate_api::db::{ClimateRepository, ClimateSnapshot, ClimateStore, DbError};
use common::{insert_measurement, seeded_pool, test_pool, KANEOHE, ORPHAN, WAIKIKI};

#[tokio::test]
async fn test_find_all_measurements_in_id_order() {
    let pool = seeded_pool().await;
    let repo = ClimateRepository::new(pool);

    let measurements = repo.find_all_measurements().await.unwrap();

    assert_eq!(measurements.len(), 7);
    assert_eq!(measurements[0].station_code, WAIKIKI);
    assert_eq!(
        measurements[0].date,
        NaiveDate::from_ymd_opt(2016, 8, 22).unwrap()
    );
    assert_eq!(measurements[0].precipitation, Some(0.5));
    assert_eq!(measurements[0].temperature_observation, 75.0);

    // NULL prcp comes back as None
    assert_eq!(measurements[4].station_code, ORPHAN);
    assert_eq!(measurements[4].precipitation, None);
}

#[tokio::test]
async fn test_find_all_stations() {
    let pool = seeded_pool().await;
    let repo = ClimateRepository::new(pool);

    let stations = repo.find_all_stations().await.unwrap();

    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].id, 1);
    assert_eq!(stations[0].station_code, WAIKIKI);
    assert_eq!(stations[0].name, "WAIKIKI 717.2, HI US");
    assert_eq!(stations[1].station_code, KANEOHE);
    assert_eq!(stations[1].latitude, 21.2716);
    assert_eq!(stations[1].longitude, -157.8168);
    assert_eq!(stations[1].elevation, 3.0);
}

#[tokio::test]
async fn test_find_max_date() {
    let pool = seeded_pool().await;
    let repo = ClimateRepository::new(pool);

    assert_eq!(
        repo.find_max_date().await.unwrap(),
        NaiveDate::from_ymd_opt(2017, 8, 23)
    );
}

#[tokio::test]
async fn test_find_max_date_empty_table() {
    let pool = test_pool().await;
    let repo = ClimateRepository::new(pool);

    assert_eq!(repo.find_max_date().await.unwrap(), None);
    assert!(repo.find_all_measurements().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_stored_date_is_store_error() {
    let pool = test_pool().await;
    insert_measurement(&pool, WAIKIKI, "08/23/2017", Some(0.1), 80.0).await;
    let repo = ClimateRepository::new(pool);

    let result = repo.find_all_measurements().await;

    match result {
        Err(DbError::InvalidStoredDate { value }) => assert_eq!(value, "08/23/2017"),
        other => panic!("Expected InvalidStoredDate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_tables_is_sqlx_error() {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let repo = ClimateRepository::new(pool);

    assert!(matches!(
        repo.find_all_stations().await,
        Err(DbError::SqlxError(_))
    ));
}

#[tokio::test]
async fn test_snapshot_matches_repository() {
    let pool = seeded_pool().await;
    let repo = ClimateRepository::new(pool);

    let snapshot = ClimateSnapshot::load(&repo).await.unwrap();

    assert_eq!(
        snapshot.measurements().await.unwrap(),
        repo.measurements().await.unwrap()
    );
    assert_eq!(
        snapshot.stations().await.unwrap(),
        repo.stations().await.unwrap()
    );
    assert_eq!(
        snapshot.max_date().await.unwrap(),
        repo.max_date().await.unwrap()
    );
}
