//! In-memory guide store.

use super::{GuideFuture, GuideRepository, PlatformsFuture};
use crate::knowledge::KnowledgeDocument;
use std::collections::BTreeMap;

/// Guides held in memory, keyed by their `platform` field.
///
/// # Example
///
/// ```
/// use promptsmith::guides::StaticGuides;
/// use promptsmith::knowledge::KnowledgeDocument;
///
/// let guides = StaticGuides::new().with_guide(KnowledgeDocument {
///     platform: "claude".into(),
///     ..Default::default()
/// });
/// assert_eq!(guides.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticGuides {
    guides: BTreeMap<String, KnowledgeDocument>,
}

impl StaticGuides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the guide for `document.platform`.
    pub fn with_guide(mut self, document: KnowledgeDocument) -> Self {
        self.insert(document);
        self
    }

    /// Add or replace the guide for `document.platform`.
    pub fn insert(&mut self, document: KnowledgeDocument) {
        self.guides.insert(document.platform.clone(), document);
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }
}

impl GuideRepository for StaticGuides {
    fn get_guide<'a>(&'a self, platform: &'a str) -> GuideFuture<'a> {
        // Hand out a copy: callers own their document for the request.
        let found = self.guides.get(platform).cloned();
        Box::pin(async move { Ok(found) })
    }

    fn list_platforms(&self) -> PlatformsFuture<'_> {
        let platforms = self.guides.keys().cloned().collect();
        Box::pin(async move { Ok(platforms) })
    }
}
