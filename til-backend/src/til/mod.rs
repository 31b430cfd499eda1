//! TIL catalog: markdown notes grouped by category directory
//!
//! Notes live under a content root as `<category>/<slug>.md` with optional
//! frontmatter. The store reads them, the cache keeps a timed snapshot, and
//! selection picks or filters entries for the HTTP layer.

pub mod cache;
pub mod frontmatter;
pub mod loader;
#[cfg(test)]
pub mod memory_store;
pub mod selection;
pub mod store;

pub use cache::CatalogCache;
pub use selection::{RandomSource, ThreadRandom};
pub use store::{ContentStore, FsContentStore};
