//! Read-only view of the content hierarchy, as the engine consumes it.
//!
//! The engine never writes content; it only needs to resolve a lesson's XP
//! value, know the global lesson count for the completion percentage, and
//! roll completions up to courses for the summary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{DatabaseResult, ModelManager};

#[derive(Debug, Clone, Copy, Default)]
pub struct CourseRollup {
    pub courses_started: i64,
    pub courses_completed: i64,
}

#[async_trait]
pub trait ContentLookup {
    /// Base XP of the lesson, or None when the lesson doesn't exist.
    async fn lesson_xp_value(&self, lesson_id: Uuid) -> DatabaseResult<Option<i32>>;

    async fn lesson_exists(&self, lesson_id: Uuid) -> DatabaseResult<bool> {
        Ok(self.lesson_xp_value(lesson_id).await?.is_some())
    }

    /// Denominator of the completion percentage: every lesson on the
    /// platform, across all courses.
    async fn total_lesson_count(&self) -> DatabaseResult<i64>;

    /// Courses the user has touched / fully finished.
    async fn course_rollup(&self, user_id: Uuid) -> DatabaseResult<CourseRollup>;
}

#[async_trait]
impl ContentLookup for ModelManager {
    async fn lesson_xp_value(&self, lesson_id: Uuid) -> DatabaseResult<Option<i32>> {
        let result = sqlx::query_scalar("SELECT experience_points FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(self.executor())
            .await?;

        Ok(result)
    }

    async fn total_lesson_count(&self) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(self.executor())
            .await?;

        Ok(result)
    }

    async fn course_rollup(&self, user_id: Uuid) -> DatabaseResult<CourseRollup> {
        let courses_started: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT m.course_id)
            FROM lesson_completions lc
            JOIN lessons l ON l.id = lc.lesson_id
            JOIN modules m ON m.id = l.module_id
            WHERE lc.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(self.executor())
        .await?;

        // a course counts as completed when every one of its lessons has a
        // completion row for this user
        let courses_completed: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM (
                SELECT m.course_id
                FROM lessons l
                JOIN modules m ON m.id = l.module_id
                LEFT JOIN lesson_completions lc
                    ON lc.lesson_id = l.id AND lc.user_id = $1
                GROUP BY m.course_id
                HAVING COUNT(*) = COUNT(lc.id)
            ) AS done
            "#,
        )
        .bind(user_id)
        .fetch_one(self.executor())
        .await?;

        Ok(CourseRollup {
            courses_started,
            courses_completed,
        })
    }
}
