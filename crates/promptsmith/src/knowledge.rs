//! Knowledge documents: the platform-specific prompting guides that feed
//! the meta-prompt engine.
//!
//! A [`KnowledgeDocument`] is deserialized from JSON and treated as an
//! immutable value for the duration of one request. Every list field
//! tolerates being absent or `null`; a guide that omits its anti-patterns
//! is simply a guide with no anti-patterns.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Rank assigned to principles that carry no explicit priority.
///
/// Unprioritized principles sort after every prioritized one and keep their
/// document order among themselves.
pub const UNRANKED_PRIORITY: i64 = 999;

// ── Task categories ────────────────────────────────────────────────

/// Intent of a user request, used to pick task-specific guidance.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    CodeGeneration,
    FormalWriting,
    CreativeWriting,
    DataAnalysis,
    ReasoningAndAnalysis,
    General,
}

impl TaskCategory {
    /// Every category, in classifier precedence order with `General` last.
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::CodeGeneration,
        TaskCategory::FormalWriting,
        TaskCategory::CreativeWriting,
        TaskCategory::DataAnalysis,
        TaskCategory::ReasoningAndAnalysis,
        TaskCategory::General,
    ];

    /// The snake_case key used in guide documents and API responses.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::CodeGeneration => "code_generation",
            TaskCategory::FormalWriting => "formal_writing",
            TaskCategory::CreativeWriting => "creative_writing",
            TaskCategory::DataAnalysis => "data_analysis",
            TaskCategory::ReasoningAndAnalysis => "reasoning_and_analysis",
            TaskCategory::General => "general",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown task category: {s}"))
    }
}

// ── Document types ─────────────────────────────────────────────────

/// A platform's prompting guide.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq)]
pub struct KnowledgeDocument {
    /// Platform identifier this guide applies to (e.g. `"claude"`).
    #[serde(default)]
    pub platform: String,
    /// Free-form guide revision, echoed back to API callers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub principles: Vec<Principle>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub structural_elements: Vec<GuideEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub anti_patterns: Vec<GuideEntry>,
    /// Task-specific guides keyed by task category name.
    ///
    /// Keys are kept as strings so a guide written for a newer category
    /// set still loads; lookups go through [`guides_for`](Self::guides_for).
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_specific_guides: BTreeMap<String, Vec<TaskGuide>>,
}

impl KnowledgeDocument {
    /// Task guides for `task`, or an empty slice when the guide has none.
    pub fn guides_for(&self, task: TaskCategory) -> &[TaskGuide] {
        self.task_specific_guides
            .get(task.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Keys in `task_specific_guides` that do not name a known category.
    pub fn unknown_task_keys(&self) -> Vec<&str> {
        self.task_specific_guides
            .keys()
            .filter(|k| k.parse::<TaskCategory>().is_err())
            .map(String::as_str)
            .collect()
    }
}

/// A prompting principle and the request patterns that make it relevant.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq)]
pub struct Principle {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "invalid_as_default")]
    pub keywords: Vec<String>,
    /// Lowercase substrings; any hit in the request marks the principle as
    /// matched.
    #[serde(default, deserialize_with = "invalid_as_default")]
    pub detection_patterns: Vec<String>,
    /// Lower is more important. Absent or non-integer means
    /// [`UNRANKED_PRIORITY`].
    #[serde(default, deserialize_with = "invalid_as_default")]
    pub priority: Option<i64>,
}

impl Principle {
    /// Sort key for priority ranking.
    pub fn rank(&self) -> i64 {
        self.priority.unwrap_or(UNRANKED_PRIORITY)
    }

    /// Whether any detection pattern occurs in an already-lowercased request.
    pub fn matches(&self, lowered_request: &str) -> bool {
        self.detection_patterns
            .iter()
            .map(|p| p.to_lowercase())
            .any(|p| !p.is_empty() && lowered_request.contains(&p))
    }
}

/// A titled piece of guidance: a structural element or an anti-pattern.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq)]
pub struct GuideEntry {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// Guidance that only applies to one task category.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq)]
pub struct TaskGuide {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Dropped when it lacks either side of the rewrite.
    #[serde(default, deserialize_with = "invalid_as_default")]
    pub example: Option<Example>,
}

/// A before/after rewrite illustrating a task guide.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq)]
pub struct Example {
    pub before: String,
    pub after: String,
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional guide details that don't parse as `T` count as absent. The
/// surrounding document still has to be valid JSON.
fn invalid_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}
