use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};

/// The single mutable per-learner row. Created lazily with the defaults
/// below the first time anything asks for it; every mutation goes through
/// one of the associated functions here, nothing is cached in process.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserProgress {
    user_id: Uuid,
    experience_points: i32,
    lives_current: i32,
    streak_current: i32,
    last_completed_lesson_id: Option<Uuid>,
    last_activity_date: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl ResourceTyped for UserProgress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UserProgress
    }
}

impl UserProgress {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn experience_points(&self) -> i32 {
        self.experience_points
    }

    pub fn lives_current(&self) -> i32 {
        self.lives_current
    }

    pub fn streak_current(&self) -> i32 {
        self.streak_current
    }

    pub fn last_completed_lesson_id(&self) -> Option<Uuid> {
        self.last_completed_lesson_id
    }

    pub fn last_activity_date(&self) -> Option<DateTime<Utc>> {
        self.last_activity_date
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl UserProgress {
    /// Read path: returns the row, creating it with defaults if missing.
    pub async fn get_or_create(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Self> {
        sqlx::query("INSERT INTO user_progress (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(mm.executor())
            .await?;

        let row = sqlx::query_as("SELECT * FROM user_progress WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(mm.executor())
            .await?;

        Ok(row)
    }

    /// Write path: same lazy creation, but inside the caller's transaction
    /// and with the row locked until commit. Concurrent completions for one
    /// user serialize here.
    pub async fn lock_or_create(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<Self> {
        sqlx::query("INSERT INTO user_progress (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let row = sqlx::query_as("SELECT * FROM user_progress WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(conn)
            .await?;

        Ok(row)
    }

    /// Applies the outcome of one lesson completion. Must run in the same
    /// transaction as the completion insert.
    pub async fn apply_completion(
        conn: &mut PgConnection,
        user_id: Uuid,
        experience_gained: i32,
        new_streak: i32,
        lesson_id: Uuid,
        now: DateTime<Utc>,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            UPDATE user_progress
            SET experience_points = experience_points + $2,
                streak_current = $3,
                last_completed_lesson_id = $4,
                last_activity_date = $5,
                updated_at = $5
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(experience_gained)
        .bind(new_streak)
        .bind(lesson_id)
        .bind(now)
        .fetch_one(conn)
        .await?;

        Ok(row)
    }

    /// Admin bonus: bumps experience without touching streak or completion
    /// history. Creates the row when the target has never been active.
    pub async fn add_experience(
        mm: &ModelManager,
        user_id: Uuid,
        points: i32,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_progress (user_id, experience_points, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE
            SET experience_points = user_progress.experience_points + $2,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(points)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    /// Signed delta on lives, clamped to [0, 10] in one statement so
    /// concurrent adjustments can't escape the bounds.
    pub async fn adjust_lives(
        mm: &ModelManager,
        user_id: Uuid,
        lives_change: i32,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_progress (user_id, lives_current, updated_at)
            VALUES ($1, LEAST(10, GREATEST(0, 5 + $2)), now())
            ON CONFLICT (user_id) DO UPDATE
            SET lives_current = LEAST(10, GREATEST(0, user_progress.lives_current + $2)),
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(lives_change)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    /// Back to creation defaults. Runs in the reset transaction together
    /// with the completion wipe.
    pub async fn reset(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_progress (user_id, updated_at)
            VALUES ($1, now())
            ON CONFLICT (user_id) DO UPDATE
            SET experience_points = 0,
                lives_current = 5,
                streak_current = 0,
                last_completed_lesson_id = NULL,
                last_activity_date = NULL,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(conn)
        .await?;

        Ok(row)
    }
}
