//! Progress & gamification engine.
//!
//! Records lesson completions at most once per (user, lesson), computes
//! score-weighted experience, keeps the daily streak and lives, and derives
//! the analytics summary. The engine is the only writer of the
//! `user_progress` and `lesson_completions` tables; the shared Postgres
//! store is the single source of truth, nothing is cached per process.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod admin;
mod content;
pub use content::{ContentLookup, CourseRollup};

mod error;
pub use error::{ProgressError, ProgressResult};

mod streak;
mod summary;
pub use summary::{ProgressSummary, summary};

mod xp;

use crate::model::entity::{LessonCompletion, LessonCompletionCreate, UserProgress};
use crate::model::{DatabaseError, ModelManager};
use crate::web::AuthenticatedUser;

#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::ToSchema)]
pub struct CompletionInput {
    pub score: Option<i32>,
    pub time_spent_seconds: Option<i32>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompletionOutcome {
    pub progress: UserProgress,
    pub completion: LessonCompletion,
    pub experience_gained: i32,
}

/// Records one lesson completion for the acting user.
///
/// The completion insert and the progress update commit together or not at
/// all. Idempotency rides on the UNIQUE (user_id, lesson_id) constraint:
/// when two requests race, the storage layer lets exactly one insert through
/// and the loser surfaces as [`ProgressError::AlreadyCompleted`].
pub async fn complete_lesson(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    lesson_id: Uuid,
    input: CompletionInput,
) -> ProgressResult<CompletionOutcome> {
    let user_id = actor.user_id();

    let base_xp = mm
        .lesson_xp_value(lesson_id)
        .await?
        .ok_or(ProgressError::LessonNotFound { lesson_id })?;

    let experience_gained = xp::experience_for(base_xp, input.score);
    let now = Utc::now();

    let mut tx = mm.executor().begin().await.map_err(DatabaseError::from)?;

    let completion = match LessonCompletion::insert(
        &mut tx,
        LessonCompletionCreate {
            user_id,
            lesson_id,
            completed_at: now,
            score: input.score,
            time_spent_seconds: input.time_spent_seconds,
        },
    )
    .await
    {
        Ok(row) => row,
        // dropped tx rolls back, nothing was granted
        Err(e) if e.is_unique_violation() => {
            return Err(ProgressError::AlreadyCompleted { lesson_id });
        }
        Err(e) => return Err(e.into()),
    };

    let current = UserProgress::lock_or_create(&mut tx, user_id).await?;
    let new_streak = streak::advance(current.last_activity_date(), current.streak_current(), now);

    let progress =
        UserProgress::apply_completion(&mut tx, user_id, experience_gained, new_streak, lesson_id, now)
            .await?;

    tx.commit().await.map_err(DatabaseError::from)?;

    tracing::debug!(
        user = %user_id,
        lesson = %lesson_id,
        experience_gained,
        streak = new_streak,
        "lesson completed"
    );

    Ok(CompletionOutcome {
        progress,
        completion,
        experience_gained,
    })
}

/// Applies a signed delta to the acting user's lives, clamped to [0, 10].
/// Whether running out of lives blocks anything is a policy for the API
/// layer, not this engine.
pub async fn adjust_lives(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    lives_change: i32,
) -> ProgressResult<UserProgress> {
    let progress = UserProgress::adjust_lives(mm, actor.user_id(), lives_change).await?;
    Ok(progress)
}
