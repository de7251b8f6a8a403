use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::post,
};

use crate::{
    engine,
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::admin::{GrantBonusRequest, ResetProgressRequest},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/bonus", post(admin_grant_bonus_handler))
        .route("/reset", post(admin_reset_progress_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/bonus",
    description = "Grant bonus experience to a user without creating a completion record",
    request_body = GrantBonusRequest,
    responses(
        (status = 200, description = "Bonus granted, returns the updated progress"),
        (status = 400, description = "Negative bonus", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Target user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("cookie" = [])
    )
)]
pub(crate) async fn admin_grant_bonus_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(req): Json<GrantBonusRequest>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    if req.bonus_points < 0 {
        return Err(WebError::validation_failed(
            "bonus_points must be non-negative",
        ));
    }

    ensure_user_exists(&state, admin, req.target_user_id).await?;

    let progress = engine::admin::grant_bonus(
        state.pool(),
        admin,
        req.target_user_id,
        req.bonus_points,
        &req.reason,
    )
    .await?;

    Ok((StatusCode::OK, Json(progress)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/reset",
    description = "Destructively reset a user's progress and completion history",
    request_body = ResetProgressRequest,
    responses(
        (status = 200, description = "Progress reset, returns the fresh progress row"),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Target user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("cookie" = [])
    )
)]
pub(crate) async fn admin_reset_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(req): Json<ResetProgressRequest>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    ensure_user_exists(&state, admin, req.target_user_id).await?;

    let progress = engine::admin::reset_progress(state.pool(), admin, req.target_user_id).await?;

    Ok((StatusCode::OK, Json(progress)))
}

async fn ensure_user_exists(
    state: &AppState,
    admin: &AuthenticatedUser,
    user_id: uuid::Uuid,
) -> WebResult<()> {
    let found = UserEntity::find_by_id(state.pool(), admin, user_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    if found.is_none() {
        return Err(WebError::resource_not_found(UserEntity::get_resource_type()));
    }

    Ok(())
}
