//! Page-level export orchestration.
//!
//! [`Exporter`] ties a [`BlockSource`] to the renderer: it fetches the page
//! metadata, emits the document title, renders every root block, and merges
//! the fragments into one Markdown string. File output is all-or-nothing;
//! nothing is written until the whole document has rendered.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::render::{render_rich_text, BlockRenderer, RenderOptions};
use crate::source::BlockSource;

/// Exports a single page to flat Markdown.
pub struct Exporter {
    source: Arc<dyn BlockSource>,
    options: RenderOptions,
    timeout: Option<Duration>,
}

impl Exporter {
    /// Create an exporter over the given source with default options.
    pub fn new(source: Arc<dyn BlockSource>) -> Self {
        Self {
            source,
            options: RenderOptions::default(),
            timeout: None,
        }
    }

    /// Replace the render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Bound the whole export; on expiry all in-flight work is dropped and
    /// [`Error::Timeout`] is returned.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Render the page to a Markdown string.
    pub async fn export(&self, page_id: &str) -> Result<String> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.export_inner(page_id))
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => self.export_inner(page_id).await,
        }
    }

    /// Render the page and write it to `path` in one shot.
    pub async fn export_to_file(&self, page_id: &str, path: impl AsRef<Path>) -> Result<()> {
        let markdown = self.export(page_id).await?;
        tokio::fs::write(path, markdown).await?;
        Ok(())
    }

    async fn export_inner(&self, page_id: &str) -> Result<String> {
        let page = self.source.fetch_page(page_id).await?;
        let title = page
            .title_spans()
            .map(render_rich_text)
            .unwrap_or_default();

        let mut output = format!("# {title}\n\n");

        let roots = self.source.fetch_children(page_id).await?;
        log::debug!("exporting page {page_id}: {} root blocks", roots.len());

        let renderer = BlockRenderer::new(Arc::clone(&self.source), self.options.clone());
        output.push_str(&renderer.render_all(roots, 0).await?);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockPayload, PageMeta, TextContent};
    use crate::source::SnapshotSource;

    fn page_source() -> SnapshotSource {
        let mut source = SnapshotSource::new();
        source.insert_page(PageMeta::with_title("page-1", "My Page"));
        source.insert_children(
            "page-1",
            vec![Block::new(
                "b1",
                BlockPayload::Paragraph(TextContent::plain("First line.")),
            )],
        );
        source
    }

    #[tokio::test]
    async fn test_export_title_and_body() {
        let exporter = Exporter::new(Arc::new(page_source()));
        let out = exporter.export("page-1").await.unwrap();
        assert_eq!(out, "# My Page\n\nFirst line.\n\n");
    }

    #[tokio::test]
    async fn test_export_missing_page_is_fatal() {
        let exporter = Exporter::new(Arc::new(SnapshotSource::new()));
        let err = exporter.export("nope").await.unwrap_err();
        assert!(matches!(err, Error::PageNotFound(_)));
    }

    #[tokio::test]
    async fn test_export_untitled_page() {
        let mut source = SnapshotSource::new();
        source.insert_page(PageMeta::new("p"));
        let exporter = Exporter::new(Arc::new(source));
        let out = exporter.export("p").await.unwrap();
        assert_eq!(out, "# \n\n");
    }
}
