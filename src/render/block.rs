//! Recursive block rendering.
//!
//! [`BlockRenderer`] walks a block subtree bottom-up: children are resolved
//! and rendered first (each one indent level deeper), then the parent's
//! kind-specific template combines them. Sibling subtrees render as spawned
//! tasks whose fragments are merged back by original index, never by
//! completion order, so output stays deterministic under concurrency.
//!
//! Failure semantics follow the soft/fatal split: fetch errors propagate,
//! while partial blocks, unknown kinds, depth overruns, and unresolved or
//! cyclic synced references degrade to empty/placeholder fragments with a
//! log line.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{Error, Result};
use crate::model::{Block, BlockNode, BlockPayload, Icon, LinkToPageContent, RichTextSpan};
use crate::source::BlockSource;

use super::options::RenderOptions;
use super::rich_text::render_rich_text;
use super::table::assemble_table;

/// Two spaces per nesting level.
const INDENT: &str = "  ";

type RenderFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;

/// Renders block subtrees into Markdown fragments.
#[derive(Clone)]
pub struct BlockRenderer {
    source: Arc<dyn BlockSource>,
    options: Arc<RenderOptions>,
    fetch_permits: Arc<Semaphore>,
}

/// Per-branch traversal state. Cloned at every fork, so branches share
/// nothing mutable.
#[derive(Debug, Clone, Default)]
struct RenderContext {
    indent: usize,
    depth: usize,
    /// Synced block ids along the active resolution path, for cycle
    /// detection.
    synced_path: Vec<String>,
}

impl RenderContext {
    fn at_indent(indent: usize) -> Self {
        Self {
            indent,
            ..Default::default()
        }
    }

    /// Context for rendering children: one level deeper in both senses.
    fn child(&self) -> Self {
        Self {
            indent: self.indent + 1,
            depth: self.depth + 1,
            synced_path: self.synced_path.clone(),
        }
    }

    /// Context for a resolved synced target: same indent, deeper recursion.
    fn resolved(&self) -> Self {
        Self {
            indent: self.indent,
            depth: self.depth + 1,
            synced_path: self.synced_path.clone(),
        }
    }
}

impl BlockRenderer {
    /// Create a renderer over the given source.
    pub fn new(source: Arc<dyn BlockSource>, options: RenderOptions) -> Self {
        let permits = options.max_concurrency.max(1);
        Self {
            source,
            options: Arc::new(options),
            fetch_permits: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Render one node at the given indent level.
    pub async fn render(&self, node: BlockNode, indent_level: usize) -> Result<String> {
        self.render_node(node, RenderContext::at_indent(indent_level))
            .await
    }

    /// Render sibling nodes at the given indent level, concatenated in
    /// input order.
    pub async fn render_all(&self, nodes: Vec<BlockNode>, indent_level: usize) -> Result<String> {
        let parts = self
            .render_siblings(nodes, RenderContext::at_indent(indent_level))
            .await?;
        Ok(parts.concat())
    }

    // Recursion goes through a boxed future: async fns cannot refer to
    // themselves directly, and spawned siblings need 'static.
    fn render_node(&self, node: BlockNode, ctx: RenderContext) -> RenderFuture {
        let renderer = self.clone();
        Box::pin(async move { renderer.render_node_inner(node, ctx).await })
    }

    async fn render_node_inner(&self, node: BlockNode, ctx: RenderContext) -> Result<String> {
        let block = match node {
            BlockNode::Full(block) => block,
            BlockNode::Partial(partial) => {
                log::debug!("skipping partial block {}", partial.id);
                return Ok(String::new());
            }
        };

        if ctx.depth > self.options.max_depth {
            log::warn!(
                "depth limit {} exceeded at block {}; truncating branch",
                self.options.max_depth,
                block.id
            );
            return Ok(String::new());
        }

        let children = if block.has_children {
            let nodes = self.fetch_children(&block.id).await?;
            self.render_siblings(nodes, ctx.child()).await?
        } else {
            Vec::new()
        };

        self.compose(block, children, &ctx).await
    }

    /// Render siblings concurrently, bounded by the fetch semaphore, and
    /// merge fragments by index.
    async fn render_siblings(
        &self,
        nodes: Vec<BlockNode>,
        ctx: RenderContext,
    ) -> Result<Vec<String>> {
        if nodes.len() <= 1 || self.options.max_concurrency <= 1 {
            let mut parts = Vec::with_capacity(nodes.len());
            for node in nodes {
                parts.push(self.render_node(node, ctx.clone()).await?);
            }
            return Ok(parts);
        }

        let count = nodes.len();
        let mut set = JoinSet::new();
        for (index, node) in nodes.into_iter().enumerate() {
            let renderer = self.clone();
            let ctx = ctx.clone();
            set.spawn(async move { (index, renderer.render_node(node, ctx).await) });
        }

        let mut parts = vec![String::new(); count];
        while let Some(joined) = set.join_next().await {
            let (index, fragment) = joined.map_err(|e| Error::Render(e.to_string()))?;
            parts[index] = fragment?;
        }
        Ok(parts)
    }

    /// Apply the kind-specific template to an already-rendered child list.
    async fn compose(
        &self,
        block: Block,
        children: Vec<String>,
        ctx: &RenderContext,
    ) -> Result<String> {
        let Block { id, payload, .. } = block;
        let indent = INDENT.repeat(ctx.indent);
        let children_md = children.concat();

        let fragment = match payload {
            BlockPayload::Paragraph(content) => {
                let text = render_rich_text(&content.rich_text);
                if text.is_empty() && children_md.is_empty() {
                    String::new()
                } else {
                    let mut out = format!("{indent}{text}\n");
                    if children_md.is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str(&children_md);
                    }
                    out
                }
            }

            BlockPayload::Heading1(content) => heading(&indent, 1, &content, &children_md),
            BlockPayload::Heading2(content) => heading(&indent, 2, &content, &children_md),
            BlockPayload::Heading3(content) => heading(&indent, 3, &content, &children_md),

            BlockPayload::BulletedListItem(content) => {
                let text = render_rich_text(&content.rich_text);
                format!("{indent}- {text}\n{children_md}")
            }
            BlockPayload::NumberedListItem(content) => {
                let text = render_rich_text(&content.rich_text);
                format!("{indent}1. {text}\n{children_md}")
            }
            BlockPayload::ToDo(content) => {
                let mark = if content.checked.unwrap_or(false) { 'x' } else { ' ' };
                let text = render_rich_text(&content.rich_text);
                format!("{indent}- [{mark}] {text}\n{children_md}")
            }

            BlockPayload::Quote(content) => {
                let text = render_rich_text(&content.rich_text);
                quote_prefixed(&indent, &text, &children_md)
            }
            BlockPayload::Callout(content) => {
                let text = render_rich_text(&content.rich_text);
                let first = match content.icon.as_ref().and_then(Icon::emoji) {
                    Some(emoji) => format!("{emoji} {text}"),
                    None => text,
                };
                quote_prefixed(&indent, &first, &children_md)
            }

            BlockPayload::Toggle(content) => {
                let text = render_rich_text(&content.rich_text);
                format!(
                    "{indent}<details>\n{indent}<summary>{text}</summary>\n\n\
                     {children_md}{indent}</details>\n\n"
                )
            }

            BlockPayload::Code(content) => {
                let text = render_rich_text(&content.rich_text);
                // Fence contents stay unindented for parser compatibility.
                format!(
                    "{indent}```{}\n{text}\n{indent}```\n\n{children_md}",
                    content.language
                )
            }
            BlockPayload::Equation(content) => {
                format!(
                    "{indent}$$\n{}\n{indent}$$\n\n{children_md}",
                    content.expression
                )
            }

            BlockPayload::Divider(_) => format!("{indent}---\n\n"),

            // Layout kinds pass their children through verbatim.
            BlockPayload::ColumnList(_) | BlockPayload::Column(_) => children_md,

            BlockPayload::Table(_) => assemble_table(&children, &indent),
            BlockPayload::TableRow(content) => {
                let cells: Vec<String> = content
                    .cells
                    .iter()
                    .map(|cell| render_rich_text(cell))
                    .collect();
                format!("| {} |\n", cells.join(" | "))
            }

            BlockPayload::Image(content) => {
                let caption = render_rich_text(&content.caption);
                let alt = if caption.is_empty() { "image" } else { &caption };
                format!("{indent}![{alt}]({})\n\n{children_md}", content.source.url())
            }
            BlockPayload::Video(content) => {
                media_link(&indent, "Video", "video", &content.caption, content.source.url())
                    + &children_md
            }
            BlockPayload::Audio(content) => {
                media_link(&indent, "Audio", "audio", &content.caption, content.source.url())
                    + &children_md
            }
            BlockPayload::Pdf(content) => {
                media_link(&indent, "PDF", "pdf", &content.caption, content.source.url())
                    + &children_md
            }
            BlockPayload::File(content) => {
                let caption = render_rich_text(&content.caption);
                let display = if !caption.is_empty() {
                    caption.as_str()
                } else if !content.name.is_empty() {
                    content.name.as_str()
                } else {
                    "file"
                };
                format!(
                    "{indent}[File: {display}]({})\n\n{children_md}",
                    content.source.url()
                )
            }

            BlockPayload::Bookmark(content) => {
                media_link(&indent, "Bookmark", &content.url, &content.caption, &content.url)
                    + &children_md
            }
            BlockPayload::Embed(content) => {
                media_link(&indent, "Embed", &content.url, &content.caption, &content.url)
                    + &children_md
            }
            BlockPayload::LinkPreview(content) => {
                format!("{indent}[Link Preview]({})\n\n", content.url)
            }

            BlockPayload::ChildPage(content) => {
                format!("{indent}[Page: {}]\n\n{children_md}", content.title)
            }
            BlockPayload::ChildDatabase(content) => {
                format!("{indent}[Database: {}]\n\n{children_md}", content.title)
            }

            BlockPayload::TableOfContents(_) => format!("{indent}[Table of Contents]\n\n"),
            BlockPayload::Breadcrumb(_) => format!("{indent}[Breadcrumb]\n\n"),

            BlockPayload::Template(content) => {
                let text = render_rich_text(&content.rich_text);
                format!("{indent}{text}\n\n{children_md}")
            }

            BlockPayload::SyncedBlock(content) => match content.synced_from {
                Some(reference) => {
                    self.resolve_synced(&id, &reference.block_id, ctx).await?
                }
                // The original copy owns its content outright.
                None => children_md,
            },

            BlockPayload::LinkToPage(content) => match content {
                LinkToPageContent::PageId { page_id } => {
                    format!("{indent}[Link to Page]({})\n\n", canonical_url(&page_id))
                }
                LinkToPageContent::DatabaseId { database_id } => {
                    format!(
                        "{indent}[Link to Database]({})\n\n",
                        canonical_url(&database_id)
                    )
                }
                LinkToPageContent::CommentId { comment_id } => {
                    format!(
                        "{indent}[Link to Comment]({})\n\n",
                        canonical_url(&comment_id)
                    )
                }
            },

            BlockPayload::Unsupported(_) => {
                format!("{indent}[Unsupported Block]\n\n{children_md}")
            }
            BlockPayload::Unknown { kind } => {
                log::debug!("unknown block kind '{kind}' at {id}");
                format!("{indent}[Unknown Block Type: {kind}]\n\n{children_md}")
            }
        };

        Ok(fragment)
    }

    /// Render a referenced block's subtree in place of the synced duplicate,
    /// at the same indent level. Unresolvable or cyclic references soft-fail
    /// to an empty fragment.
    async fn resolve_synced(
        &self,
        own_id: &str,
        target_id: &str,
        ctx: &RenderContext,
    ) -> Result<String> {
        if target_id == own_id || ctx.synced_path.iter().any(|id| id == target_id) {
            log::warn!("cyclic synced reference {own_id} -> {target_id}; skipping branch");
            return Ok(String::new());
        }

        let target = match self.fetch_block(target_id).await {
            Ok(node) => node,
            Err(err) => {
                log::warn!("unresolved synced reference {own_id} -> {target_id}: {err}");
                return Ok(String::new());
            }
        };

        let mut next = ctx.resolved();
        next.synced_path.push(own_id.to_string());
        self.render_node(target, next).await
    }

    async fn fetch_children(&self, block_id: &str) -> Result<Vec<BlockNode>> {
        let _permit = self
            .fetch_permits
            .acquire()
            .await
            .map_err(|_| Error::Canceled)?;
        self.source.fetch_children(block_id).await
    }

    async fn fetch_block(&self, block_id: &str) -> Result<BlockNode> {
        let _permit = self
            .fetch_permits
            .acquire()
            .await
            .map_err(|_| Error::Canceled)?;
        self.source.fetch_block(block_id).await
    }
}

fn heading(
    indent: &str,
    level: usize,
    content: &crate::model::HeadingContent,
    children_md: &str,
) -> String {
    let hashes = "#".repeat(level);
    let text = render_rich_text(&content.rich_text);
    if content.is_toggleable && !children_md.is_empty() {
        format!(
            "{indent}<details>\n{indent}<summary>{hashes} {text}</summary>\n\n\
             {children_md}{indent}</details>\n\n"
        )
    } else {
        format!("{indent}{hashes} {text}\n\n{children_md}")
    }
}

/// Prefix every non-empty line of the block's own text and its rendered
/// children with `"> "`, followed by a trailing blank line.
fn quote_prefixed(indent: &str, own_text: &str, children_md: &str) -> String {
    let mut out = String::new();
    for line in own_text.lines().chain(children_md.lines()) {
        if line.is_empty() {
            continue;
        }
        out.push_str(indent);
        out.push_str("> ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}

fn media_link(
    indent: &str,
    label: &str,
    fallback: &str,
    caption: &[RichTextSpan],
    url: &str,
) -> String {
    let caption_text = render_rich_text(caption);
    let display = if caption_text.is_empty() {
        fallback
    } else {
        caption_text.as_str()
    };
    format!("{indent}[{label}: {display}]({url})\n\n")
}

/// Canonical share URL for a page, database, or comment id.
fn canonical_url(id: &str) -> String {
    format!("https://notion.so/{}", id.replace('-', ""))
}
