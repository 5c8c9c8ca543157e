//! # unnotion
//!
//! Hierarchical document tree to flat Markdown exporter.
//!
//! This library walks a page's block tree through an async [`BlockSource`],
//! renders each block with CommonMark-safe rich text handling, and merges
//! the fragments into a single Markdown document in source order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use unnotion::{Exporter, SnapshotSource};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> unnotion::Result<()> {
//!     // Load a page snapshot exported as JSON
//!     let source = SnapshotSource::from_path("snapshot.json")?;
//!
//!     // Export a page to Markdown
//!     let exporter = Exporter::new(Arc::new(source));
//!     let markdown = exporter.export("page-id").await?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Broad block coverage**: headings, lists, tables, media, equations,
//!   callouts, synced blocks and more, with a placeholder fallback for
//!   anything unrecognized
//! - **CommonMark-safe rich text**: styling markers never wrap whitespace
//! - **Deterministic output**: sibling subtrees render concurrently but
//!   always merge in source order
//! - **Soft failure**: malformed or unresolvable blocks degrade to empty
//!   fragments instead of aborting the export

pub mod error;
pub mod export;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use export::Exporter;
pub use model::{Block, BlockNode, BlockPayload, PageMeta, RichTextSpan};
pub use render::{BlockRenderer, RenderOptions};
pub use source::{BlockSource, SnapshotSource};

use std::sync::Arc;

/// Export a page to Markdown with default options.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use unnotion::{export_page, SnapshotSource};
///
/// # async fn run() -> unnotion::Result<()> {
/// let source = Arc::new(SnapshotSource::from_path("snapshot.json")?);
/// let markdown = export_page(source, "page-id").await?;
/// # Ok(())
/// # }
/// ```
pub async fn export_page(source: Arc<dyn BlockSource>, page_id: &str) -> Result<String> {
    Exporter::new(source).export(page_id).await
}

/// Export a page to Markdown with custom render options.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use unnotion::{export_page_with_options, RenderOptions, SnapshotSource};
///
/// # async fn run() -> unnotion::Result<()> {
/// let source = Arc::new(SnapshotSource::from_path("snapshot.json")?);
/// let options = RenderOptions::new().with_max_concurrency(4);
/// let markdown = export_page_with_options(source, "page-id", options).await?;
/// # Ok(())
/// # }
/// ```
pub async fn export_page_with_options(
    source: Arc<dyn BlockSource>,
    page_id: &str,
    options: RenderOptions,
) -> Result<String> {
    Exporter::new(source).with_options(options).export(page_id).await
}
