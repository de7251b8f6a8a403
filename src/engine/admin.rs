//! Privileged adjustments. Role checks happen at the web boundary; these
//! functions assume the caller is already authorized.

use uuid::Uuid;

use crate::engine::error::ProgressResult;
use crate::model::entity::{LessonCompletion, UserProgress};
use crate::model::{DatabaseError, ModelManager};
use crate::web::AuthenticatedUser;

/// Adds `bonus_points` to the target's experience without creating a
/// completion row, so lesson counts and score averages stay untouched.
/// The reason lands in the audit log only.
pub async fn grant_bonus(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    target_user_id: Uuid,
    bonus_points: i32,
    reason: &str,
) -> ProgressResult<UserProgress> {
    let progress = UserProgress::add_experience(mm, target_user_id, bonus_points).await?;

    tracing::info!(
        admin = %actor.user_id(),
        target = %target_user_id,
        bonus_points,
        reason,
        "experience bonus granted"
    );

    Ok(progress)
}

/// Wipes the target's completion history and puts the progress row back to
/// its creation defaults. Destructive; both writes share one transaction.
pub async fn reset_progress(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    target_user_id: Uuid,
) -> ProgressResult<UserProgress> {
    let mut tx = mm.executor().begin().await.map_err(DatabaseError::from)?;

    let removed = LessonCompletion::delete_all_for(&mut tx, target_user_id).await?;
    let progress = UserProgress::reset(&mut tx, target_user_id).await?;

    tx.commit().await.map_err(DatabaseError::from)?;

    tracing::info!(
        admin = %actor.user_id(),
        target = %target_user_id,
        completions_removed = removed,
        "progress reset"
    );

    Ok(progress)
}
