//! Error types for the unnotion library.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for unnotion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during page export.
///
/// Only fetch failures at the page root are fatal to an export. Local
/// conditions inside the tree (partial blocks, unknown kinds, dangling
/// synced references) degrade to empty or placeholder fragments instead
/// of surfacing here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a snapshot or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing snapshot or block JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The block source failed to serve a request.
    #[error("Block source error: {0}")]
    Source(String),

    /// The requested page does not exist in the source.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A block id could not be resolved by the source.
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// The export did not finish within the configured deadline.
    #[error("Export timed out after {0:?}")]
    Timeout(Duration),

    /// The export was canceled before completion.
    #[error("Export canceled")]
    Canceled,

    /// Error assembling the Markdown output.
    #[error("Rendering error: {0}")]
    Render(String),
}
