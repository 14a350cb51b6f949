//! The enhancement pipeline: validate, look up the guide, build the
//! meta-prompt, call the completion backend.
//!
//! [`Enhancer`] holds no per-request state. It is shared across requests
//! behind an `Arc` and every call works on its own freshly fetched
//! [`KnowledgeDocument`].

use crate::error::EnhanceError;
use crate::gateway::{CompletionGateway, UsageInfo};
use crate::guides::GuideRepository;
use crate::knowledge::{KnowledgeDocument, TaskCategory};
use crate::prompt::{Instruction, build_instruction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A user's raw prompt and the platform it targets.
///
/// Missing fields deserialize as empty strings so they surface as
/// [`EnhanceError::MissingRequest`] / [`EnhanceError::MissingPlatform`].
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EnhanceRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub platform: String,
}

impl EnhanceRequest {
    pub fn new(prompt: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            platform: platform.into(),
        }
    }

    fn validate(&self) -> Result<(), EnhanceError> {
        if self.platform.trim().is_empty() {
            return Err(EnhanceError::MissingPlatform);
        }
        if self.prompt.trim().is_empty() {
            return Err(EnhanceError::MissingRequest);
        }
        Ok(())
    }
}

/// The instruction that would be sent upstream, without sending it.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Preview {
    pub instruction: String,
    pub platform: String,
    pub guide_version: String,
    pub task: TaskCategory,
    pub principles: Vec<String>,
}

/// Result of a successful enhancement.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Enhancement {
    pub enhanced_prompt: String,
    pub platform: String,
    pub guide_version: String,
    pub task: TaskCategory,
    pub principles: Vec<String>,
    pub model: Option<String>,
    pub usage: Option<UsageInfo>,
    pub created_at: DateTime<Utc>,
}

/// Guide lookup plus completion backend.
#[derive(Clone)]
pub struct Enhancer {
    guides: Arc<dyn GuideRepository>,
    gateway: Arc<dyn CompletionGateway>,
}

impl std::fmt::Debug for Enhancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enhancer").finish_non_exhaustive()
    }
}

impl Enhancer {
    pub fn new(guides: Arc<dyn GuideRepository>, gateway: Arc<dyn CompletionGateway>) -> Self {
        Self { guides, gateway }
    }

    /// Validate the request, fetch its guide, and build the instruction.
    async fn prepare(
        &self,
        request: &EnhanceRequest,
    ) -> Result<(KnowledgeDocument, Instruction), EnhanceError> {
        request.validate()?;

        let document = self
            .guides
            .get_guide(&request.platform)
            .await?
            .ok_or_else(|| EnhanceError::GuideNotFound(request.platform.clone()))?;

        let instruction = build_instruction(&request.prompt, &document);
        debug!(
            "Instruction for {}: task={}, principles={:?}, {} chars",
            request.platform,
            instruction.task,
            instruction.principles,
            instruction.text.len()
        );
        Ok((document, instruction))
    }

    /// Build the instruction for `request` without calling the backend.
    pub async fn preview(&self, request: &EnhanceRequest) -> Result<Preview, EnhanceError> {
        let (document, instruction) = self.prepare(request).await?;
        Ok(Preview {
            instruction: instruction.text,
            platform: document.platform,
            guide_version: document.version,
            task: instruction.task,
            principles: instruction.principles,
        })
    }

    /// Run the full pipeline and return the enhanced prompt.
    pub async fn enhance(&self, request: &EnhanceRequest) -> Result<Enhancement, EnhanceError> {
        let start = Instant::now();
        let (document, instruction) = self.prepare(request).await?;

        let completion = self
            .gateway
            .complete(&instruction.text, &request.prompt)
            .await?;

        info!(
            "Enhanced prompt for {} (task={}, {} principles) in {:.1}s",
            document.platform,
            instruction.task,
            instruction.principles.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(Enhancement {
            enhanced_prompt: completion.text,
            platform: document.platform,
            guide_version: document.version,
            task: instruction.task,
            principles: instruction.principles,
            model: completion.model,
            usage: completion.usage,
            created_at: Utc::now(),
        })
    }

    /// Platforms the guide store can serve.
    pub async fn platforms(&self) -> Result<Vec<String>, EnhanceError> {
        Ok(self.guides.list_platforms().await?)
    }
}
