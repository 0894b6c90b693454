/// Shift-suggestion prompt
///
/// The three data blobs are free-form text (usually JSON) and are inserted
/// into the template verbatim.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[validate(length(min = 1, message = "Employee availability is required."))]
    pub employee_availability: String,

    #[validate(length(min = 1, message = "Demand forecast is required."))]
    pub demand_forecast: String,

    #[validate(length(min = 1, message = "Labor costs are required."))]
    pub labor_costs: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_preferences: Option<String>,
}

/// Renders the request into the prompt sent to the generator
pub fn render_prompt(request: &SuggestionRequest) -> String {
    format!(
        "You are an AI assistant designed to generate shift plan suggestions based on employee availability, demand, and labor costs.\n\
         \n\
         Employee Availability: {}\n\
         Demand Forecast: {}\n\
         Labor Costs: {}\n\
         Optimization Preferences: {}\n\
         \n\
         Generate a shift plan suggestion in JSON format.\n\
         Ensure that the shift plan meets the demand forecast, respects employee availability, and minimizes labor costs.\n\
         Return only valid JSON.",
        request.employee_availability,
        request.demand_forecast,
        request.labor_costs,
        request.optimization_preferences.as_deref().unwrap_or(""),
    )
}
