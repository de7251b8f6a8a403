use thiserror::Error;
use uuid::Uuid;

use crate::model::DatabaseError;

pub type ProgressResult<T> = std::result::Result<T, ProgressError>;

#[derive(Debug, Error)]
pub enum ProgressError {
    /// The (user, lesson) pair already has a completion row. Expected
    /// outcome for a re-submitted lesson, not a storage failure.
    #[error("lesson {lesson_id} already completed")]
    AlreadyCompleted { lesson_id: Uuid },

    #[error("lesson {lesson_id} not found")]
    LessonNotFound { lesson_id: Uuid },

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}
