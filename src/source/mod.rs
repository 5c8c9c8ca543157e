//! Content source abstraction.
//!
//! The renderer never talks to a transport directly: everything it needs
//! comes through the [`BlockSource`] trait, injected as an
//! `Arc<dyn BlockSource>`. That keeps network, auth, and pagination outside
//! this crate and makes test doubles trivial.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{BlockNode, PageMeta};

mod snapshot;

pub use snapshot::SnapshotSource;

/// Serves block trees and page metadata on demand.
///
/// All methods are suspension points; rendering between calls is
/// synchronous. Implementations must be safe to call concurrently.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Fetch a single block by id. Used to resolve synced references.
    async fn fetch_block(&self, block_id: &str) -> Result<BlockNode>;

    /// Fetch the ordered children of a block (or of the page root).
    /// The returned order is authoritative; the renderer never reorders.
    async fn fetch_children(&self, block_id: &str) -> Result<Vec<BlockNode>>;

    /// Fetch metadata for a page, including its title property.
    async fn fetch_page(&self, page_id: &str) -> Result<PageMeta>;
}
