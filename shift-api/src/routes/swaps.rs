/// `GET /v1/swaps?employee_id=`: incoming and outgoing swap requests
///
/// Shifts and swap requests come from the bundled sample schedule; employee
/// names are joined from the caller's company when it resolves.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    tenant::CurrentTenant,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shift_shared::models::employee::Employee;
use shift_shared::sample;
use shift_shared::swaps::SwapBoard;

#[derive(Debug, Deserialize)]
pub struct SwapQuery {
    pub employee_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBoardResponse {
    pub tenant_resolved: bool,
    #[serde(flatten)]
    pub board: SwapBoard,
}

pub async fn swap_board(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Query(query): Query<SwapQuery>,
) -> ApiResult<Json<SwapBoardResponse>> {
    let employee_id = query
        .employee_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("employee_id is required".to_string()))?;

    let employees = match tenant.id() {
        Some(company_id) => Employee::list(state.store.as_ref(), company_id).await?,
        None => Vec::new(),
    };

    let board = SwapBoard::build(
        &employee_id,
        &sample::swap_requests(),
        &sample::shifts(),
        &employees,
    );

    Ok(Json(SwapBoardResponse {
        tenant_resolved: tenant.is_resolved(),
        board,
    }))
}
