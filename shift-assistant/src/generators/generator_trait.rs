/// Core generator trait and error types

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The request never produced a response
    #[error("Generator request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status
    #[error("Generator returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response had no candidate text
    #[error("Generator returned no text")]
    EmptyResponse,

    #[error("Generator is not configured: {0}")]
    NotConfigured(String),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Produces text from a prompt
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> GeneratorResult<String>;
}
