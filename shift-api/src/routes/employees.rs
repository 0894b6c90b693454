/// Employee endpoints, scoped to the caller's company
///
/// - `GET /v1/employees`
/// - `POST /v1/employees`
/// - `PUT /v1/employees/:id`
/// - `DELETE /v1/employees/:id`
///
/// Request bodies use the employee form shape `{name, email, role}` and are
/// validated with the same rules as the dashboard form; invalid input is a
/// 422 and nothing is written.

use super::ListResponse;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    tenant::CurrentTenant,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shift_shared::forms::{EmployeeForm, FormInput};
use shift_shared::models::employee::Employee;
use shift_shared::store::Record;

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Employee {} not found", id))
}

pub async fn list_employees(
    State(state): State<AppState>,
    tenant: CurrentTenant,
) -> ApiResult<Json<ListResponse<Record<Employee>>>> {
    let Some(company_id) = tenant.id() else {
        return Ok(Json(ListResponse::unresolved()));
    };

    let employees = Employee::list(state.store.as_ref(), company_id).await?;
    Ok(Json(ListResponse::new(true, employees)))
}

pub async fn create_employee(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Json(form): Json<EmployeeForm>,
) -> ApiResult<(StatusCode, Json<Record<Employee>>)> {
    let company = tenant.require()?;
    let details = form.parse()?;

    let employee = Employee::create(state.store.as_ref(), &company.id, details).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Replaces name, email and role; id and avatar are kept
pub async fn update_employee(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Path(id): Path<String>,
    Json(form): Json<EmployeeForm>,
) -> ApiResult<Json<Record<Employee>>> {
    let company = tenant.require()?;
    let details = form.parse()?;

    if Employee::find_by_id(state.store.as_ref(), &company.id, &id)
        .await?
        .is_none()
    {
        return Err(not_found(&id));
    }

    Employee::update(state.store.as_ref(), &company.id, &id, details).await?;

    let updated = Employee::find_by_id(state.store.as_ref(), &company.id, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(updated))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let company = tenant.require()?;

    if Employee::delete(state.store.as_ref(), &company.id, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}
