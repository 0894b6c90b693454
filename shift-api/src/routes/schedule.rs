/// `GET /v1/schedule`: the weekly grid and scheduled hours per employee

use crate::{app::AppState, error::ApiResult, tenant::CurrentTenant};
use axum::{extract::State, Json};
use serde::Serialize;
use shift_shared::models::employee::Employee;
use shift_shared::sample;
use shift_shared::schedule::{team_hours, ScheduleGrid, TeamHours};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub tenant_resolved: bool,
    pub grid: ScheduleGrid,
    pub team_hours: Vec<TeamHours>,
}

pub async fn schedule(
    State(state): State<AppState>,
    tenant: CurrentTenant,
) -> ApiResult<Json<ScheduleResponse>> {
    let employees = match tenant.id() {
        Some(company_id) => Employee::list(state.store.as_ref(), company_id).await?,
        None => Vec::new(),
    };
    let shifts = sample::shifts();

    Ok(Json(ScheduleResponse {
        tenant_resolved: tenant.is_resolved(),
        grid: ScheduleGrid::build(&shifts, &employees),
        team_hours: team_hours(&shifts, &employees),
    }))
}
