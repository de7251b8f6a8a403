mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{
    Action, Flow, complete_lesson_action, seed_admin, seed_course, setup_server, setup_test_db,
    signin_action, signin_admin_action, signup_action, summary_action,
};

fn bonus_body(target: Uuid, points: i64, reason: &str) -> serde_json::Value {
    json!({
        "target_user_id": target,
        "bonus_points": points,
        "reason": reason,
    })
}

#[tokio::test]
async fn route_admin_bonus_test() {
    let pool = setup_test_db().await;
    seed_admin(&pool).await;
    let content = seed_course(&pool, &[("intro", 10)]).await;
    let mut server = setup_server(&pool).await;

    let lesson = content.lesson_ids[0];

    Flow::new()
        .step(signup_action("pupil", "password").with_save_as("pupil"))
        .step(complete_lesson_action("complete_one", lesson, json!({"score": 70})))
        // a regular user cannot grant bonuses, not even to themselves
        .step(
            Action::new("bonus_forbidden", "POST", "/api/v1/admin/bonus")
                .with_dyn_body(|ctx| {
                    let id: Uuid = serde_json::from_value(ctx.get("pupil")["id"].clone()).unwrap();
                    bonus_body(id, 50, "nice try")
                })
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(signin_admin_action().with_clear_cookies(true))
        .step(
            Action::new("bonus_negative", "POST", "/api/v1/admin/bonus")
                .with_dyn_body(|ctx| {
                    let id: Uuid = serde_json::from_value(ctx.get("pupil")["id"].clone()).unwrap();
                    bonus_body(id, -5, "rollback attempt")
                })
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("bonus_unknown_user", "POST", "/api/v1/admin/bonus")
                .with_body(bonus_body(Uuid::new_v4(), 50, "ghost"))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("bonus_grant", "POST", "/api/v1/admin/bonus")
                .with_dyn_body(|ctx| {
                    let id: Uuid = serde_json::from_value(ctx.get("pupil")["id"].clone()).unwrap();
                    bonus_body(id, 50, "tournament winner")
                })
                .assert_json(|v| {
                    // 10 from the lesson, 50 from the bonus
                    assert_eq!(v["experience_points"], 60);
                }),
        )
        // the bonus left no completion record behind
        .step(
            signin_action("pupil", "password").with_clear_cookies(true),
        )
        .step(summary_action("summary_after_bonus").assert_json(|v| {
            assert_eq!(v["experience_points"], 60);
            assert_eq!(v["lessons_completed"], 1);
            assert_eq!(v["average_score"], 70.0);
        }))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_admin_reset_test() {
    let pool = setup_test_db().await;
    seed_admin(&pool).await;
    let content = seed_course(&pool, &[("a", 10), ("b", 20)]).await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signup_action("resettee", "password").with_save_as("resettee"))
        .step(complete_lesson_action(
            "complete_a",
            content.lesson_ids[0],
            json!({"score": 90}),
        ))
        .step(complete_lesson_action(
            "complete_b",
            content.lesson_ids[1],
            json!({}),
        ))
        .step(signin_admin_action().with_clear_cookies(true))
        .step(
            Action::new("reset", "POST", "/api/v1/admin/reset")
                .with_dyn_body(|ctx| {
                    let id: Uuid =
                        serde_json::from_value(ctx.get("resettee")["id"].clone()).unwrap();
                    json!({ "target_user_id": id })
                })
                .assert_json(|v| {
                    assert_eq!(v["experience_points"], 0);
                    assert_eq!(v["lives_current"], 5);
                    assert_eq!(v["streak_current"], 0);
                }),
        )
        // back as the learner: everything is at creation defaults again
        .step(signin_action("resettee", "password").with_clear_cookies(true))
        .step(summary_action("summary_after_reset").assert_json(|v| {
            assert_eq!(v["experience_points"], 0);
            assert_eq!(v["lives_current"], 5);
            assert_eq!(v["streak_current"], 0);
            assert_eq!(v["lessons_completed"], 0);
            assert_eq!(v["average_score"], 0.0);
            assert_eq!(v["longest_streak"], 0);
            assert_eq!(v["completion_percentage"], 0.0);
        }))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_admin_reset_requires_role_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signup_action("plain", "password").with_save_as("plain"))
        .step(
            Action::new("reset_forbidden", "POST", "/api/v1/admin/reset")
                .with_dyn_body(|ctx| {
                    let id: Uuid = serde_json::from_value(ctx.get("plain")["id"].clone()).unwrap();
                    json!({ "target_user_id": id })
                })
                .with_expect(StatusCode::FORBIDDEN),
        )
        .run(&mut server, pool)
        .await;
}
