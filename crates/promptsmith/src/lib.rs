//! Platform-aware prompt enhancement.
//!
//! `promptsmith` takes a user's raw prompt and a target platform, looks up
//! that platform's knowledge document (prompting principles, structural
//! guidance, anti-patterns, task-specific guides), and builds a
//! *meta-prompt*: an instruction that tells a text-generation model how to
//! rewrite the user's prompt. The instruction is sent as the system message
//! and the raw prompt as the user message; the model's reply is the
//! enhanced prompt.
//!
//! # Getting started
//!
//! ```ignore
//! use promptsmith::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EnhanceError> {
//!     let api_key = std::env::var("OPENROUTER_KEY").unwrap();
//!     let client = OpenRouterClient::new(api_key)?
//!         .with_config(GatewayConfig::new("anthropic/claude-sonnet-4").with_retries(2));
//!
//!     let enhancer = Enhancer::new(
//!         Arc::new(DirectoryGuides::new("guides")),
//!         Arc::new(client),
//!     );
//!
//!     let result = enhancer
//!         .enhance(&EnhanceRequest::new("write a poem about rust", "claude"))
//!         .await?;
//!     println!("{}", result.enhanced_prompt);
//!     Ok(())
//! }
//! ```
//!
//! The instruction can be built without any I/O:
//!
//! ```
//! use promptsmith::{KnowledgeDocument, TaskCategory, build_instruction};
//!
//! let doc = KnowledgeDocument::default();
//! let instruction = build_instruction("analyze this code", &doc);
//! assert_eq!(instruction.task, TaskCategory::CodeGeneration);
//! assert!(instruction.principles.is_empty());
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`knowledge`] | [`KnowledgeDocument`], [`Principle`](knowledge::Principle), [`TaskCategory`] |
//! | [`selector`] | [`select_principles`](selector::select_principles): match, rank, fill |
//! | [`classifier`] | [`classify`](classifier::classify) over the keyword rule table |
//! | [`prompt`] | [`InstructionBuilder`](prompt::InstructionBuilder), [`compose`](prompt::compose), [`build_instruction`] |
//! | [`guides`] | [`GuideRepository`](guides::GuideRepository) trait, in-memory and directory stores |
//! | [`gateway`] | [`CompletionGateway`](gateway::CompletionGateway) trait, OpenRouter client, retry policy |
//! | [`enhancer`] | [`Enhancer`]: the end-to-end pipeline |
//! | [`error`] | [`EnhanceError`], [`GuideError`](error::GuideError), [`CompletionError`](error::CompletionError) |

pub mod classifier;
pub mod enhancer;
pub mod error;
pub mod gateway;
pub mod guides;
pub mod knowledge;
pub mod prelude;
pub mod prompt;
pub mod selector;

pub use enhancer::{EnhanceRequest, Enhancement, Enhancer, Preview};
pub use error::EnhanceError;
pub use knowledge::{KnowledgeDocument, TaskCategory};
pub use prompt::build_instruction;

/// JSON Schema of a guide file, pretty-printed. Published by
/// `promptsmith --schema` so guide authors can validate their files.
///
/// ```
/// let schema: serde_json::Value =
///     serde_json::from_str(&promptsmith::guide_schema().unwrap()).unwrap();
/// assert_eq!(schema["title"], "KnowledgeDocument");
/// assert!(schema["properties"]["principles"].is_object());
/// assert!(schema["definitions"]["Principle"].is_object());
/// ```
pub fn guide_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schemars::schema_for!(KnowledgeDocument))
}
