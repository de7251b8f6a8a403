use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::{get, post},
};

use crate::{
    engine,
    web::{
        AppState, RequestContext, WebResult, dto::progress::AdjustLivesRequest,
        error::ErrorResponse, middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(progress_summary_handler))
        .route("/lives", post(progress_adjust_lives_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/progress/",
    description = "Get the current user's progress summary",
    responses(
        (status = 200, description = "Summary computed", body = engine::ProgressSummary),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("cookie" = [])
    )
)]
pub(crate) async fn progress_summary_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let summary = engine::summary(state.pool(), user).await?;

    Ok((StatusCode::OK, Json(summary)))
}

#[utoipa::path(
    post,
    path = "/api/v1/progress/lives",
    description = "Apply a signed delta to the current user's lives (clamped to 0..=10)",
    request_body = AdjustLivesRequest,
    responses(
        (status = 200, description = "Lives adjusted, returns the updated progress"),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("cookie" = [])
    )
)]
pub(crate) async fn progress_adjust_lives_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(req): Json<AdjustLivesRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let progress = engine::adjust_lives(state.pool(), user, req.lives_change).await?;

    Ok((StatusCode::OK, Json(progress)))
}
