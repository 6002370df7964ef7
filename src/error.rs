use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall { field: String, min: i64, value: i64 },

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type SupResult<T> = Result<T, SupError>;
