mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{
    Action, Flow, adjust_lives_action, complete_lesson_action, seed_course, setup_server,
    setup_test_db, signup_action, summary_action,
};

#[tokio::test]
async fn route_complete_lesson_test() {
    let pool = setup_test_db().await;
    let content = seed_course(&pool, &[("greetings", 10), ("numbers", 10)]).await;
    let mut server = setup_server(&pool).await;

    let lesson = content.lesson_ids[0];
    let other_lesson = content.lesson_ids[1];

    Flow::new()
        .step(signup_action("learner", "password"))
        .step(
            complete_lesson_action("complete_scored", lesson, json!({"score": 95, "time_spent_seconds": 120}))
                .assert_json(|v| {
                    assert_eq!(v["experience_gained"], 12);
                    assert_eq!(v["progress"]["experience_points"], 12);
                    assert_eq!(v["progress"]["streak_current"], 1);
                    assert_eq!(v["completion"]["score"], 95);
                    assert_eq!(v["completion"]["time_spent_seconds"], 120);
                }),
        )
        // resubmission conflicts and grants nothing
        .step(
            complete_lesson_action("complete_again", lesson, json!({"score": 100}))
                .with_expect(StatusCode::CONFLICT)
                .assert_body(|body| {
                    assert!(body.contains("already completed"));
                }),
        )
        // unknown lesson
        .step(
            complete_lesson_action("complete_unknown", Uuid::new_v4(), json!({}))
                .with_expect(StatusCode::NOT_FOUND),
        )
        // score outside 0..=100 is rejected before the engine runs
        .step(
            complete_lesson_action("complete_bad_score", other_lesson, json!({"score": 150}))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        // unscored completion, same calendar day: base xp, streak stays
        .step(
            complete_lesson_action("complete_unscored", other_lesson, json!({}))
                .assert_json(|v| {
                    assert_eq!(v["experience_gained"], 10);
                    assert_eq!(v["progress"]["experience_points"], 22);
                    assert_eq!(v["progress"]["streak_current"], 1);
                    assert_eq!(v["completion"]["score"], serde_json::Value::Null);
                }),
        )
        .step(summary_action("summary").assert_json(|v| {
            assert_eq!(v["lessons_completed"], 2);
            assert_eq!(v["completion_percentage"], 100.0);
            // the unscored row is excluded from the average entirely
            assert_eq!(v["average_score"], 95.0);
            assert_eq!(v["longest_streak"], 1);
            assert_eq!(v["streak_current"], 1);
            assert_eq!(v["experience_points"], 22);
            assert_eq!(v["courses_started"], 1);
            assert_eq!(v["courses_completed"], 1);
        }))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_experience_bands_test() {
    let pool = setup_test_db().await;
    let content = seed_course(
        &pool,
        &[
            ("l1", 10),
            ("l2", 10),
            ("l3", 10),
            ("l4", 10),
            ("l5", 10),
        ],
    )
    .await;
    let mut server = setup_server(&pool).await;

    let expectations: [(Uuid, Option<i64>, i64); 5] = [
        (content.lesson_ids[0], Some(95), 12),
        (content.lesson_ids[1], Some(85), 11),
        (content.lesson_ids[2], Some(70), 10),
        (content.lesson_ids[3], Some(45), 8),
        (content.lesson_ids[4], None, 10),
    ];

    let mut flow = Flow::new().step(signup_action("bander", "password"));
    for (lesson, score, gained) in expectations {
        let body = match score {
            Some(score) => json!({"score": score}),
            None => json!({}),
        };
        flow = flow.step(
            complete_lesson_action("complete_band", lesson, body).assert_json(move |v| {
                assert_eq!(v["experience_gained"], gained);
            }),
        );
    }

    flow.step(summary_action("summary_total").assert_json(|v| {
        assert_eq!(v["experience_points"], 51);
        assert_eq!(v["lessons_completed"], 5);
    }))
    .run(&mut server, pool)
    .await;
}

#[tokio::test]
async fn route_lives_clamped_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signup_action("cat", "password"))
        // defaults to 5, clamped at the top
        .step(adjust_lives_action("overfill", 20).assert_json(|v| {
            assert_eq!(v["lives_current"], 10);
        }))
        .step(adjust_lives_action("drain", -100).assert_json(|v| {
            assert_eq!(v["lives_current"], 0);
        }))
        .step(adjust_lives_action("refill_some", 3).assert_json(|v| {
            assert_eq!(v["lives_current"], 3);
        }))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_summary_empty_catalog_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    // no lessons exist at all; the percentage must be 0, not a division error
    Flow::new()
        .step(signup_action("fresh", "password"))
        .step(summary_action("summary_empty").assert_json(|v| {
            assert_eq!(v["lessons_completed"], 0);
            assert_eq!(v["completion_percentage"], 0.0);
            assert_eq!(v["average_score"], 0.0);
            assert_eq!(v["longest_streak"], 0);
            assert_eq!(v["experience_points"], 0);
            assert_eq!(v["lives_current"], 5);
            assert_eq!(v["streak_current"], 0);
            assert_eq!(v["courses_started"], 0);
            assert_eq!(v["courses_completed"], 0);
        }))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_summary_partial_completion_test() {
    let pool = setup_test_db().await;
    let content = seed_course(&pool, &[("a", 10), ("b", 10), ("c", 10)]).await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signup_action("onethird", "password"))
        .step(complete_lesson_action(
            "complete_one",
            content.lesson_ids[0],
            json!({"score": 80}),
        ))
        .step(summary_action("summary_third").assert_json(|v| {
            // 1 of 3 -> 33.3 after rounding to one decimal
            assert_eq!(v["completion_percentage"], 33.3);
            assert_eq!(v["average_score"], 80.0);
            assert_eq!(v["courses_started"], 1);
            assert_eq!(v["courses_completed"], 0);
        }))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_progress_requires_auth_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(
            Action::new("summary_anon", "GET", "/api/v1/progress/")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .run(&mut server, pool)
        .await;
}
