use serde::Serialize;
use uuid::Uuid;

use crate::engine::CompletionOutcome;
use crate::model::entity::{LessonCompletion, LessonWithStatusRow, UserProgress};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LessonResponse {
    id: Uuid,
    module_id: Uuid,
    title: String,
    content: String,
    experience_points: i32,
    completed: bool,
}

impl From<LessonWithStatusRow> for LessonResponse {
    fn from(row: LessonWithStatusRow) -> Self {
        Self {
            id: row.id,
            module_id: row.module_id,
            title: row.title,
            content: row.content,
            experience_points: row.experience_points,
            completed: row.completed,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CompleteLessonResponse {
    pub progress: UserProgress,
    pub completion: LessonCompletion,
    pub experience_gained: i32,
}

impl From<CompletionOutcome> for CompleteLessonResponse {
    fn from(outcome: CompletionOutcome) -> Self {
        Self {
            progress: outcome.progress,
            completion: outcome.completion,
            experience_gained: outcome.experience_gained,
        }
    }
}
