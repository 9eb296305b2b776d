use thiserror::Error;

pub use sqlx::Error as SqlxError;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// An insert pointed at a row that does not exist (e.g. a post for a missing user).
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::ForeignKeyViolation(db_err.message().to_string())
            }
            _ => DbError::Query(err),
        }
    }
}
