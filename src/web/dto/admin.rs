use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GrantBonusRequest {
    pub target_user_id: Uuid,
    pub bonus_points: i32,
    pub reason: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ResetProgressRequest {
    pub target_user_id: Uuid,
}
