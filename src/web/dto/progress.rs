use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AdjustLivesRequest {
    pub lives_change: i32,
}
