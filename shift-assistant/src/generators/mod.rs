/// Text generators behind the shift-suggestion request
///
/// A generator turns a rendered prompt into raw model output. The HTTP
/// generator talks to a hosted generative-language endpoint; the mock
/// generator returns canned text for tests and offline development.
///
/// # Example
///
/// ```no_run
/// use shift_assistant::generators::{MockGenerator, TextGenerator};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = MockGenerator::replying(r#"{"monday": []}"#);
/// let text = generator.generate("Plan next week").await?;
/// println!("{}: {}", generator.name(), text);
/// # Ok(())
/// # }
/// ```

pub mod generator_trait;
pub mod http;
pub mod mock;

pub use generator_trait::{GeneratorError, GeneratorResult, TextGenerator};
pub use http::{HttpGeneratorConfig, HttpTextGenerator};
pub use mock::MockGenerator;
