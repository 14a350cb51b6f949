//! File-backed guide store: `<dir>/<platform>.json`.

use super::{GuideFuture, GuideRepository, PlatformsFuture};
use crate::error::GuideError;
use crate::knowledge::KnowledgeDocument;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const GUIDE_EXTENSION: &str = "json";

/// Guides stored as JSON files in a single directory.
///
/// Files are read on every lookup; nothing is cached.
#[derive(Debug, Clone)]
pub struct DirectoryGuides {
    dir: PathBuf,
}

impl DirectoryGuides {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the guide file for `platform`, or `None` if the name could
    /// escape the guide directory.
    pub fn guide_path(&self, platform: &str) -> Option<PathBuf> {
        if !is_safe_platform_name(platform) {
            return None;
        }
        Some(self.dir.join(format!("{platform}.{GUIDE_EXTENSION}")))
    }

    async fn load(&self, platform: &str) -> Result<Option<KnowledgeDocument>, GuideError> {
        let Some(path) = self.guide_path(platform) else {
            debug!("Rejected platform name {platform:?}");
            return Ok(None);
        };

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(GuideError::Io { path, source }),
        };

        let mut document: KnowledgeDocument = serde_json::from_str(&text)
            .map_err(|source| GuideError::Parse {
                path: path.clone(),
                source,
            })?;

        if document.platform.is_empty() {
            document.platform = platform.to_string();
        } else if document.platform != platform {
            warn!(
                "Guide {} declares platform {:?}, serving it for {:?}",
                path.display(),
                document.platform,
                platform
            );
        }

        let unknown = document.unknown_task_keys();
        if !unknown.is_empty() {
            debug!("Guide {} has unknown task keys: {unknown:?}", path.display());
        }

        debug!(
            "Loaded guide {}: {} principles, {} structural, {} anti-patterns",
            path.display(),
            document.principles.len(),
            document.structural_elements.len(),
            document.anti_patterns.len(),
        );
        Ok(Some(document))
    }

    async fn platforms(&self) -> Result<Vec<String>, GuideError> {
        let io_err = |source: std::io::Error| GuideError::Io {
            path: self.dir.clone(),
            source,
        };
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_err)?;

        let mut platforms = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == GUIDE_EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && is_safe_platform_name(stem)
            {
                platforms.push(stem.to_string());
            }
        }
        platforms.sort();
        Ok(platforms)
    }
}

impl GuideRepository for DirectoryGuides {
    fn get_guide<'a>(&'a self, platform: &'a str) -> GuideFuture<'a> {
        Box::pin(self.load(platform))
    }

    fn list_platforms(&self) -> PlatformsFuture<'_> {
        Box::pin(self.platforms())
    }
}

/// Platform names map straight to file names, so reject anything that is
/// not a plain single path component.
fn is_safe_platform_name(platform: &str) -> bool {
    !platform.is_empty()
        && !platform.starts_with('.')
        && !platform.contains(['/', '\\', '\0'])
        && !platform.contains("..")
}
