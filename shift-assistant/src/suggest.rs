/// Shift-suggestion request flow
///
/// Validates the request, renders the prompt, calls the generator under a
/// timeout and wraps the raw text. Parsing the text into JSON is left to
/// [`ShiftSuggestions::plan`] so callers can still show unparseable output.
///
/// # Example
///
/// ```no_run
/// use shift_assistant::generators::MockGenerator;
/// use shift_assistant::prompt::SuggestionRequest;
/// use shift_assistant::suggest::ShiftSuggester;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let suggester = ShiftSuggester::new(Arc::new(MockGenerator::replying("{}")));
/// let suggestions = suggester
///     .suggest(&SuggestionRequest {
///         employee_availability: "[]".to_string(),
///         demand_forecast: "{}".to_string(),
///         labor_costs: "{}".to_string(),
///         optimization_preferences: None,
///     })
///     .await?;
/// println!("{}", suggestions.plan()?);
/// # Ok(())
/// # }
/// ```

use crate::generators::{GeneratorError, TextGenerator};
use crate::prompt::{render_prompt, SuggestionRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("Invalid suggestion request")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Suggestion request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Suggestion is not valid JSON: {0}")]
    Unparseable(String),
}

/// Raw generator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSuggestions {
    pub shift_suggestions: String,
}

impl ShiftSuggestions {
    /// Parses the suggestion as JSON
    ///
    /// Models often wrap JSON in a Markdown code fence; the fence is removed
    /// before parsing.
    pub fn plan(&self) -> Result<Value, SuggestionError> {
        serde_json::from_str(strip_code_fence(&self.shift_suggestions))
            .map_err(|e| SuggestionError::Unparseable(e.to_string()))
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

pub struct ShiftSuggester {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl ShiftSuggester {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn suggest(&self, request: &SuggestionRequest) -> Result<ShiftSuggestions, SuggestionError> {
        request.validate()?;

        let prompt = render_prompt(request);
        let started = Instant::now();

        let text = match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
            Ok(result) => result.map_err(|e| {
                warn!(generator = self.generator.name(), error = %e, "Suggestion request failed");
                e
            })?,
            Err(_) => {
                warn!(generator = self.generator.name(), timeout = ?self.timeout, "Suggestion request timed out");
                return Err(SuggestionError::Timeout(self.timeout));
            }
        };

        info!(
            generator = self.generator.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Shift suggestions generated"
        );

        Ok(ShiftSuggestions {
            shift_suggestions: text,
        })
    }
}
