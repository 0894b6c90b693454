/// Canned generator for tests and offline development
///
/// Replies with fixed text, fails with a fixed error, or stalls past any
/// timeout. Every prompt it receives is recorded.

use super::{GeneratorError, GeneratorResult, TextGenerator};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    Fail(String),
    Stall(Duration),
}

#[derive(Debug)]
pub struct MockGenerator {
    behavior: Behavior,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with(Behavior::Reply(text.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with(Behavior::Fail(message.into()))
    }

    /// Sleeps for `delay` before replying with an empty object
    pub fn stalling(delay: Duration) -> Self {
        Self::with(Behavior::Stall(delay))
    }

    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> GeneratorResult<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(message) => Err(GeneratorError::Transport(message.clone())),
            Behavior::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("{}".to_string())
            }
        }
    }
}
