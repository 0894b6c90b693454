/// Time-off endpoints
///
/// - `GET /v1/time-off` - every request for the company
/// - `GET /v1/time-off/pending` - pending requests joined to their employee
/// - `GET /v1/time-off/balances?employee_id=` - approved days per leave type

use super::ListResponse;
use crate::{app::AppState, error::ApiResult, tenant::CurrentTenant};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shift_shared::leave::{self, LeaveBalance, PendingRequest};
use shift_shared::models::employee::Employee;
use shift_shared::models::time_off::TimeOffRequest;
use shift_shared::store::Record;

#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    /// Omit for company-wide totals
    pub employee_id: Option<String>,
}

pub async fn list_requests(
    State(state): State<AppState>,
    tenant: CurrentTenant,
) -> ApiResult<Json<ListResponse<Record<TimeOffRequest>>>> {
    let Some(company_id) = tenant.id() else {
        return Ok(Json(ListResponse::unresolved()));
    };

    let requests = TimeOffRequest::list(state.store.as_ref(), company_id).await?;
    Ok(Json(ListResponse::new(true, requests)))
}

pub async fn pending(
    State(state): State<AppState>,
    tenant: CurrentTenant,
) -> ApiResult<Json<ListResponse<PendingRequest>>> {
    let Some(company_id) = tenant.id() else {
        return Ok(Json(ListResponse::unresolved()));
    };

    let (requests, employees) = tokio::try_join!(
        TimeOffRequest::list(state.store.as_ref(), company_id),
        Employee::list(state.store.as_ref(), company_id),
    )?;

    Ok(Json(ListResponse::new(
        true,
        leave::pending_requests(&requests, &employees),
    )))
}

/// Unresolved tenants still get the three balances, all unused
pub async fn balances(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<Json<ListResponse<LeaveBalance>>> {
    let requests = match tenant.id() {
        Some(company_id) => TimeOffRequest::list(state.store.as_ref(), company_id).await?,
        None => Vec::new(),
    };

    Ok(Json(ListResponse::new(
        tenant.is_resolved(),
        leave::balances(&requests, query.employee_id.as_deref()),
    )))
}
