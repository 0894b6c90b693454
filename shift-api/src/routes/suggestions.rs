/// `POST /v1/suggestions`: AI shift-plan suggestions
///
/// ```json
/// {
///   "employeeAvailability": "[{\"name\":\"Ada\",\"days\":[\"Mon\",\"Tue\"]}]",
///   "demandForecast": "{\"Mon\":\"high\"}",
///   "laborCosts": "{\"Ada\":25}",
///   "optimizationPreferences": "minimize overtime"
/// }
/// ```
///
/// The response carries the raw text and its parsed form:
///
/// ```json
/// { "shiftSuggestions": "{...}", "plan": { ... } }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: no company
/// - `422 Unprocessable Entity`: a required field is empty
/// - `502 Bad Gateway`: the generator failed or returned something other than JSON
/// - `503 Service Unavailable`: no generator configured
/// - `504 Gateway Timeout`: the generator did not answer in time

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    tenant::CurrentTenant,
};
use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use shift_assistant::SuggestionRequest;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub shift_suggestions: String,
    pub plan: Value,
}

pub async fn suggest_shifts(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Json(req): Json<SuggestionRequest>,
) -> ApiResult<Json<SuggestionResponse>> {
    let company = tenant.require()?;

    let suggester = state.suggester.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("AI suggestions are not configured".to_string())
    })?;

    let suggestions = suggester.suggest(&req).await?;
    let plan = suggestions.plan()?;

    info!(company_id = %company.id, "Shift suggestions returned");

    Ok(Json(SuggestionResponse {
        shift_suggestions: suggestions.shift_suggestions,
        plan,
    }))
}
