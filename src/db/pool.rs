use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, instrument};

use crate::db::DbError;

/// Open the climate database without write access
#[instrument]
pub async fn connect_read_only(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, DbError> {
    debug!("Opening read-only SQLite pool");
    let options = SqliteConnectOptions::from_str(database_url)?
        .read_only(true)
        .create_if_missing(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}
