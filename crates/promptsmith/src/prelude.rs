//! Convenience re-exports for common `promptsmith` types.
//!
//! ```ignore
//! use promptsmith::prelude::*;
//! ```
//!
//! Pulls in the [`Enhancer`] and its request/response types, both
//! repository implementations, the OpenRouter client and its config, and
//! the error types. Pure building blocks (selector, classifier, composer)
//! are imported from their modules directly.

// ── Pipeline ────────────────────────────────────────────────────────
pub use crate::enhancer::{EnhanceRequest, Enhancement, Enhancer, Preview};
pub use crate::knowledge::{KnowledgeDocument, TaskCategory};
pub use crate::{build_instruction, guide_schema};

// ── Collaborators ───────────────────────────────────────────────────
pub use crate::gateway::{
    Completion, CompletionFuture, CompletionGateway, GatewayConfig, OpenRouterClient, RetryPolicy,
};
pub use crate::guides::{DirectoryGuides, GuideFuture, GuideRepository, StaticGuides};

// ── Errors ──────────────────────────────────────────────────────────
pub use crate::error::{CompletionError, EnhanceError, GuideError};
