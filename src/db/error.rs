#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("Stored measurement date is not YYYY-MM-DD: {value}")]
    InvalidStoredDate { value: String },
}
