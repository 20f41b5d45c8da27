use core_types::ValidationErrors;
use thiserror::Error;

/// The closed set of failures a store operation can produce.
///
/// Callers at the HTTP boundary map these onto response codes: `NotFound` →
/// 404, `EditConflict` → 409, `Validation` → 422, `Timeout` and `Database` →
/// 5xx. `ConstraintViolation` carries the driver's message unmodified;
/// translating it into a user-facing validation message (e.g. a duplicate
/// title) is the caller's job.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("failed to load environment variables for database connection: {0}")]
    ConnectionConfig(String),

    #[error("record validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("the requested record could not be found")]
    NotFound,

    #[error("unable to update the record due to an edit conflict")]
    EditConflict,

    #[error("storage constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("the database operation did not complete within its deadline")]
    Timeout,

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        // Uniqueness violations are part of the error taxonomy; everything
        // else the driver reports passes through opaquely.
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return DbError::ConstraintViolation(db_err.message().to_string());
            }
        }
        DbError::Database(err)
    }
}
