/// Connector-level errors surfaced while bootstrapping or probing a database.
///
/// Domain crates keep their own error enums; this one only covers connection
/// lifecycle concerns.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Index creation failed: {0}")]
    IndexError(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
