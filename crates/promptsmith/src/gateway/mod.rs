//! Text-generation backends.
//!
//! The enhancer only needs one call: send an instruction as the system
//! message and the user's raw prompt as the user message, get text back.
//! [`CompletionGateway`] is that seam; [`OpenRouterClient`] is the
//! production implementation.
//!
//! - [`openrouter`]: async client for the OpenRouter chat completions API.
//! - [`retry`]: backoff policy for transient upstream failures.

pub mod openrouter;
pub mod retry;

pub use openrouter::{GatewayConfig, OpenRouterClient};
pub use retry::RetryPolicy;

use crate::error::CompletionError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`CompletionGateway::complete`].
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Completion, CompletionError>> + Send + 'a>>;

/// A backend that turns (system text, user text) into generated text.
///
/// Errors are passed through to the caller unchanged.
pub trait CompletionGateway: Send + Sync {
    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> CompletionFuture<'a>;
}

/// Generated text and what the backend reported about producing it.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Completion {
    pub text: String,
    /// Model that served the request, when the backend reports it.
    pub model: Option<String>,
    pub usage: Option<UsageInfo>,
}

/// Token usage statistics.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}
