#![allow(dead_code)]

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub const WAIKIKI: &str = "USC00519397";
pub const KANEOHE: &str = "USC00513117";
/// Reports measurements but has no station row
pub const ORPHAN: &str = "USC00599999";

/// Fresh in-memory database with the climate schema applied
///
/// A single connection that never expires keeps the in-memory database
/// alive for the lifetime of the pool.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn insert_station(pool: &SqlitePool, id: i64, code: &str, name: &str) {
    sqlx::query(
        r#"
        INSERT INTO station (id, station, name, latitude, longitude, elevation)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(code)
    .bind(name)
    .bind(21.2716)
    .bind(-157.8168)
    .bind(3.0)
    .execute(pool)
    .await
    .expect("Failed to insert station");
}

pub async fn insert_measurement(
    pool: &SqlitePool,
    station: &str,
    date: &str,
    prcp: Option<f64>,
    tobs: f64,
) {
    sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
        .bind(station)
        .bind(date)
        .bind(prcp)
        .bind(tobs)
        .execute(pool)
        .await
        .expect("Failed to insert measurement");
}

/// Two stations plus measurements around the 2016-08-23 window boundary
///
/// Latest date is 2017-08-23, so the last-year window starts (exclusively)
/// at 2016-08-23.
pub async fn seeded_pool() -> SqlitePool {
    let pool = test_pool().await;

    insert_station(&pool, 1, WAIKIKI, "WAIKIKI 717.2, HI US").await;
    insert_station(&pool, 2, KANEOHE, "KANEOHE 838.1, HI US").await;

    insert_measurement(&pool, WAIKIKI, "2016-08-22", Some(0.5), 75.0).await;
    insert_measurement(&pool, WAIKIKI, "2016-08-23", Some(0.7), 76.0).await;
    insert_measurement(&pool, WAIKIKI, "2016-08-24", Some(0.08), 79.0).await;
    insert_measurement(&pool, KANEOHE, "2016-08-24", Some(2.15), 78.0).await;
    insert_measurement(&pool, ORPHAN, "2017-01-01", None, 62.0).await;
    insert_measurement(&pool, KANEOHE, "2017-01-01", Some(0.0), 66.0).await;
    insert_measurement(&pool, WAIKIKI, "2017-08-23", Some(0.0), 81.0).await;

    pool
}
