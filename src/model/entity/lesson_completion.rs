use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};

/// One immutable record of a learner finishing a lesson. Rows are only ever
/// inserted (inside the completion transaction) or bulk-deleted by an admin
/// reset; there is no update path.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct LessonCompletion {
    id: Uuid,
    user_id: Uuid,
    lesson_id: Uuid,
    completed_at: DateTime<Utc>,
    score: Option<i32>,
    time_spent_seconds: Option<i32>,
}

#[derive(Debug)]
pub struct LessonCompletionCreate {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub score: Option<i32>,
    pub time_spent_seconds: Option<i32>,
}

impl ResourceTyped for LessonCompletion {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::LessonCompletion
    }
}

impl LessonCompletion {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn score(&self) -> Option<i32> {
        self.score
    }

    pub fn time_spent_seconds(&self) -> Option<i32> {
        self.time_spent_seconds
    }
}

impl LessonCompletion {
    /// Inserts inside the caller's transaction. The UNIQUE (user_id,
    /// lesson_id) constraint is the idempotency gate: a duplicate attempt
    /// surfaces as a unique violation, never as a second row.
    pub async fn insert(
        conn: &mut PgConnection,
        data: LessonCompletionCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO lesson_completions (id, user_id, lesson_id, completed_at, score, time_spent_seconds)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING id, user_id, lesson_id, completed_at, score, time_spent_seconds
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.lesson_id)
        .bind(data.completed_at)
        .bind(data.score)
        .bind(data.time_spent_seconds)
        .fetch_one(conn)
        .await?;

        Ok(row)
    }

    pub async fn delete_all_for(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM lesson_completions WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_for(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM lesson_completions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(mm.executor())
                .await?;

        Ok(result)
    }

    /// Mean over the scored rows only; NULL when the user has no scored
    /// completion at all.
    pub async fn average_score(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Option<f64>> {
        let result: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(score)::float8 FROM lesson_completions WHERE user_id = $1 AND score IS NOT NULL",
        )
        .bind(user_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }

    /// Every completion timestamp of the user, oldest first. The streak
    /// scanner collapses them to calendar days on its side.
    pub async fn completion_times(
        mm: &ModelManager,
        user_id: Uuid,
    ) -> DatabaseResult<Vec<DateTime<Utc>>> {
        let result = sqlx::query_scalar(
            "SELECT completed_at FROM lesson_completions WHERE user_id = $1 ORDER BY completed_at",
        )
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(result)
    }
}
