//! Guide lookup: resolve a platform identifier to its [`KnowledgeDocument`].
//!
//! The [`GuideRepository`] trait is the seam between the enhancer and
//! wherever guides live. Two implementations ship here:
//!
//! - [`StaticGuides`]: an in-memory map, for tests and embedded guides.
//! - [`DirectoryGuides`]: one `<platform>.json` file per platform, re-read
//!   on every lookup so edits take effect without a restart.

pub mod directory;
pub mod memory;

pub use directory::DirectoryGuides;
pub use memory::StaticGuides;

use crate::error::GuideError;
use crate::knowledge::KnowledgeDocument;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`GuideRepository::get_guide`].
pub type GuideFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<KnowledgeDocument>, GuideError>> + Send + 'a>>;

/// Boxed future returned by [`GuideRepository::list_platforms`].
pub type PlatformsFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<String>, GuideError>> + Send + 'a>>;

/// A store of knowledge documents keyed by exact platform name.
///
/// Uses boxed futures so the trait stays dyn-compatible and can be shared
/// as `Arc<dyn GuideRepository>`.
pub trait GuideRepository: Send + Sync {
    /// Fetch the guide for `platform`. `Ok(None)` means no such platform.
    fn get_guide<'a>(&'a self, platform: &'a str) -> GuideFuture<'a>;

    /// Platform identifiers this store can currently serve, sorted.
    fn list_platforms(&self) -> PlatformsFuture<'_>;
}
