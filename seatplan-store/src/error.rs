use seatplan_core::LayoutError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

impl From<StoreError> for LayoutError {
    fn from(err: StoreError) -> Self {
        LayoutError::PersistenceFailure(err.to_string())
    }
}
