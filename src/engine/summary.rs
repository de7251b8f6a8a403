//! Read-side aggregation over the completion history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::content::ContentLookup;
use crate::engine::error::ProgressResult;
use crate::engine::streak;
use crate::model::ModelManager;
use crate::model::entity::{LessonCompletion, UserProgress};
use crate::web::AuthenticatedUser;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProgressSummary {
    pub user_id: Uuid,
    pub experience_points: i32,
    pub lives_current: i32,
    pub streak_current: i32,
    pub lessons_completed: i64,
    pub completion_percentage: f64,
    pub average_score: f64,
    pub longest_streak: i32,
    pub last_activity_date: Option<DateTime<Utc>>,
    pub courses_started: i64,
    pub courses_completed: i64,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub async fn summary(mm: &ModelManager, actor: &AuthenticatedUser) -> ProgressResult<ProgressSummary> {
    let user_id = actor.user_id();

    let progress = UserProgress::get_or_create(mm, user_id).await?;

    let (lessons_completed, average_score, completion_times, total_lessons, rollup) = tokio::try_join!(
        LessonCompletion::count_for(mm, user_id),
        LessonCompletion::average_score(mm, user_id),
        LessonCompletion::completion_times(mm, user_id),
        mm.total_lesson_count(),
        mm.course_rollup(user_id),
    )?;

    // an empty catalog yields 0%, not a division error
    let completion_percentage = if total_lessons == 0 {
        0.0
    } else {
        round1(lessons_completed as f64 / total_lessons as f64 * 100.0)
    };

    Ok(ProgressSummary {
        user_id,
        experience_points: progress.experience_points(),
        lives_current: progress.lives_current(),
        streak_current: progress.streak_current(),
        lessons_completed,
        completion_percentage,
        average_score: average_score.map(round2).unwrap_or(0.0),
        longest_streak: streak::longest_run(&completion_times),
        last_activity_date: progress.last_activity_date(),
        courses_started: rollup.courses_started,
        courses_completed: rollup.courses_completed,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rounding_helpers() {
        assert_eq!(round1(33.333_333), 33.3);
        assert_eq!(round1(66.666_666), 66.7);
        assert_eq!(round2(83.333_333), 83.33);
        assert_eq!(round2(80.0), 80.0);
    }
}
