/// `GET /v1/me`: the signed-in user and their tenant resolution

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    tenant::CurrentTenant,
};
use axum::{extract::State, Json};
use serde::Serialize;
use shift_shared::models::user::{User, UserProfile};
use shift_shared::tenancy::TenantResolution;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
    pub tenant: TenantResolution,
}

pub async fn me(State(state): State<AppState>, tenant: CurrentTenant) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(state.store.as_ref(), &tenant.auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user: UserProfile::from(&user),
        tenant: tenant.resolution,
    }))
}
