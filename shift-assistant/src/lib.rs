//! # Shift Assistant
//!
//! AI shift-plan suggestions: a fixed prompt template filled from employee
//! availability, demand and labor cost data, sent to a text generator under
//! a timeout.
//!
//! ## Modules
//!
//! - `prompt`: request type and prompt rendering
//! - `generators`: the `TextGenerator` trait with HTTP and mock implementations
//! - `suggest`: the request flow and response parsing
//!
//! ## Example
//!
//! ```no_run
//! use shift_assistant::generators::{HttpGeneratorConfig, HttpTextGenerator};
//! use shift_assistant::suggest::ShiftSuggester;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = HttpTextGenerator::new(HttpGeneratorConfig::new("api-key"))?;
//! let suggester = ShiftSuggester::new(Arc::new(generator));
//! println!("Using {}", suggester.generator_name());
//! # Ok(())
//! # }
//! ```

pub mod generators;
pub mod prompt;
pub mod suggest;

pub use prompt::SuggestionRequest;
pub use suggest::{ShiftSuggester, ShiftSuggestions, SuggestionError};
