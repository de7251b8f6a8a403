use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{extract::State, middleware, response::IntoResponse, routing::get, Router};
use uuid::Uuid;

use crate::engine::{self, CompletionInput};
use crate::model::ResourceTyped;
use crate::model::entity::{Lesson, LessonWithStatusRow};
use crate::web::dto::lessons::{CompleteLessonResponse, LessonResponse};
use crate::web::error::ErrorResponse;
use crate::web::{AppState, RequestContext, WebError, WebResult, middlewares};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}", get(lessons_get_handler))
        .route("/{id}/complete", post(lessons_complete_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{lesson_id}",
    description = "Fetch comprehensive info about lesson including its content",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to get")
    ),
    responses(
        (status = 200, description = "Lesson found", body = LessonResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub(crate) async fn lessons_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let lesson = LessonWithStatusRow::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    Ok((StatusCode::OK, Json(LessonResponse::from(lesson))))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/{lesson_id}/complete",
    description = "Record a completion of this lesson for the current user and award experience",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to complete")
    ),
    request_body = CompletionInput,
    responses(
        (status = 200, description = "Completion recorded", body = CompleteLessonResponse),
        (status = 400, description = "Score or time out of range", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 409, description = "Lesson was already completed", body = ErrorResponse),
        (status = 401, description = "You're not allowed to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub(crate) async fn lessons_complete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(input): Json<CompletionInput>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if let Some(score) = input.score
        && !(0..=100).contains(&score)
    {
        return Err(WebError::validation_failed("score must be within 0..=100"));
    }

    if let Some(time) = input.time_spent_seconds
        && time < 0
    {
        return Err(WebError::validation_failed(
            "time_spent_seconds must be non-negative",
        ));
    }

    let outcome = engine::complete_lesson(state.pool(), user, id, input).await?;

    Ok((StatusCode::OK, Json(CompleteLessonResponse::from(outcome))))
}
