use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("access to this resource is forbidden")]
    Forbidden,
}

impl DatabaseError {
    /// True when the underlying driver rejected an insert because of a
    /// uniqueness constraint. The completion path relies on this to turn a
    /// duplicate insert into a conflict instead of a storage failure.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::SqlxError(e)
                if e.as_database_error().is_some_and(|d| d.is_unique_violation())
        )
    }
}
