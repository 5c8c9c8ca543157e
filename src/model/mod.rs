//! Document model types for page content representation.
//!
//! This module defines the read-only snapshot types served by a
//! [`BlockSource`](crate::source::BlockSource): blocks with kind-tagged
//! payloads, inline rich text spans, and page metadata. Blocks are fetched
//! on demand, never mutated by the renderer, and discarded once the
//! Markdown string is produced.

mod block;
mod page;
mod rich_text;

pub use block::{
    Block, BlockNode, BlockPayload, CalloutContent, ChildTitleContent, CodeContent, ColumnContent,
    EmptyContent, EquationContent, ExternalFile, FileContent, FileSource, HeadingContent,
    HostedFile, Icon, LinkContent, LinkToPageContent, MediaContent, PartialBlock, SyncedContent,
    SyncedFrom, TableContent, TableRowContent, TextContent, ToDoContent, UrlContent,
};
pub use page::{PageMeta, PageProperty};
pub use rich_text::{Annotations, RichTextSpan, SpanKind};
