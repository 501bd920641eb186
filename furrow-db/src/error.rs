/// Structured error types for furrow-db.
///
/// Uses `thiserror` so consumers get matchable, composable errors.
/// The driver's own errors pass through transparently.
use thiserror::Error;

/// Main error type for furrow-db operations
#[derive(Error, Debug)]
pub enum DbError {
    /// No connection URL found in the environment
    #[error("no database URL configured: tried {}", .candidates.join(", "))]
    MissingConfig { candidates: Vec<String> },

    /// Pool settings failed validation
    #[error("invalid pool settings: {reason}")]
    Config { reason: String },

    /// The pool produced no usable connection within the attempt bound
    #[error("could not get a connection to {pool} after {attempts} attempts")]
    ConnectionExhausted { pool: String, attempts: u32 },

    /// A column could not be materialized as a document value
    #[error("unsupported column type {type_name} for column '{column}'")]
    UnsupportedColumn { column: String, type_name: String },

    /// Error from the underlying driver
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Result type alias for furrow-db operations
pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    /// Create a missing-configuration error from the keys that were tried
    pub fn missing_config(candidates: Vec<String>) -> Self {
        Self::MissingConfig { candidates }
    }

    /// Create a settings validation error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a connection-exhausted error naming the pool
    pub fn connection_exhausted(pool: impl Into<String>, attempts: u32) -> Self {
        Self::ConnectionExhausted {
            pool: pool.into(),
            attempts,
        }
    }

    /// Create an unsupported-column error
    pub fn unsupported_column(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedColumn {
            column: column.into(),
            type_name: type_name.into(),
        }
    }
}
