//! Block tree types.
//!
//! A [`Block`] is a single node of page content: an id, a `has_children`
//! flag, and exactly one kind-specific payload. The wire format follows the
//! source API convention: the kind is carried in a `"type"` field and the
//! payload sits under a key equal to that kind name. Records without a
//! `"type"` field are metadata-only stubs and deserialize as
//! [`BlockNode::Partial`]; records with an unrecognized kind deserialize as
//! [`BlockPayload::Unknown`] so the renderer can emit a placeholder instead
//! of failing the whole page.

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::rich_text::RichTextSpan;

/// A full content block.
#[derive(Debug, Clone)]
pub struct Block {
    /// Block id
    pub id: String,

    /// Whether the source holds children for this block
    pub has_children: bool,

    /// Kind-specific payload
    pub payload: BlockPayload,
}

impl Block {
    /// Create a block with the given id and payload.
    pub fn new(id: impl Into<String>, payload: BlockPayload) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            payload,
        }
    }

    /// Mark the block as having children in the source.
    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// The wire name of the block's kind.
    pub fn kind(&self) -> &str {
        self.payload.kind()
    }
}

/// A metadata-only stub returned when full content is not resolvable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialBlock {
    /// Block id
    pub id: String,
}

/// A node as returned by a block source: either a full block or a stub.
#[derive(Debug, Clone)]
pub enum BlockNode {
    /// A fully populated block
    Full(Block),
    /// A metadata-only stub, rendered as empty
    Partial(PartialBlock),
}

impl BlockNode {
    /// The node's block id.
    pub fn id(&self) -> &str {
        match self {
            BlockNode::Full(block) => &block.id,
            BlockNode::Partial(partial) => &partial.id,
        }
    }

    /// The full block, if this node is one.
    pub fn as_full(&self) -> Option<&Block> {
        match self {
            BlockNode::Full(block) => Some(block),
            BlockNode::Partial(_) => None,
        }
    }
}

impl From<Block> for BlockNode {
    fn from(block: Block) -> Self {
        BlockNode::Full(block)
    }
}

/// Kind-tagged block payload. Exactly one variant per block.
///
/// Adding a kind here is a compile-time exhaustiveness requirement on the
/// renderer's dispatch match.
#[derive(Debug, Clone)]
pub enum BlockPayload {
    Paragraph(TextContent),
    Heading1(HeadingContent),
    Heading2(HeadingContent),
    Heading3(HeadingContent),
    BulletedListItem(TextContent),
    NumberedListItem(TextContent),
    Quote(TextContent),
    ToDo(ToDoContent),
    Toggle(TextContent),
    Template(TextContent),
    SyncedBlock(SyncedContent),
    ChildPage(ChildTitleContent),
    ChildDatabase(ChildTitleContent),
    Equation(EquationContent),
    Code(CodeContent),
    Callout(CalloutContent),
    Divider(EmptyContent),
    Breadcrumb(EmptyContent),
    TableOfContents(EmptyContent),
    ColumnList(EmptyContent),
    Column(ColumnContent),
    LinkToPage(LinkToPageContent),
    Table(TableContent),
    TableRow(TableRowContent),
    Embed(LinkContent),
    Bookmark(LinkContent),
    Image(MediaContent),
    Video(MediaContent),
    Pdf(MediaContent),
    File(FileContent),
    Audio(MediaContent),
    LinkPreview(UrlContent),
    Unsupported(EmptyContent),
    /// A kind this library does not know. The renderer emits a placeholder
    /// naming the kind and still descends into children.
    Unknown { kind: String },
}

impl BlockPayload {
    /// The wire name of this payload's kind.
    pub fn kind(&self) -> &str {
        match self {
            BlockPayload::Paragraph(_) => "paragraph",
            BlockPayload::Heading1(_) => "heading_1",
            BlockPayload::Heading2(_) => "heading_2",
            BlockPayload::Heading3(_) => "heading_3",
            BlockPayload::BulletedListItem(_) => "bulleted_list_item",
            BlockPayload::NumberedListItem(_) => "numbered_list_item",
            BlockPayload::Quote(_) => "quote",
            BlockPayload::ToDo(_) => "to_do",
            BlockPayload::Toggle(_) => "toggle",
            BlockPayload::Template(_) => "template",
            BlockPayload::SyncedBlock(_) => "synced_block",
            BlockPayload::ChildPage(_) => "child_page",
            BlockPayload::ChildDatabase(_) => "child_database",
            BlockPayload::Equation(_) => "equation",
            BlockPayload::Code(_) => "code",
            BlockPayload::Callout(_) => "callout",
            BlockPayload::Divider(_) => "divider",
            BlockPayload::Breadcrumb(_) => "breadcrumb",
            BlockPayload::TableOfContents(_) => "table_of_contents",
            BlockPayload::ColumnList(_) => "column_list",
            BlockPayload::Column(_) => "column",
            BlockPayload::LinkToPage(_) => "link_to_page",
            BlockPayload::Table(_) => "table",
            BlockPayload::TableRow(_) => "table_row",
            BlockPayload::Embed(_) => "embed",
            BlockPayload::Bookmark(_) => "bookmark",
            BlockPayload::Image(_) => "image",
            BlockPayload::Video(_) => "video",
            BlockPayload::Pdf(_) => "pdf",
            BlockPayload::File(_) => "file",
            BlockPayload::Audio(_) => "audio",
            BlockPayload::LinkPreview(_) => "link_preview",
            BlockPayload::Unsupported(_) => "unsupported",
            BlockPayload::Unknown { kind } => kind,
        }
    }

    fn from_value(kind: &str, value: Value) -> serde_json::Result<Self> {
        let payload = match kind {
            "paragraph" => BlockPayload::Paragraph(serde_json::from_value(value)?),
            "heading_1" => BlockPayload::Heading1(serde_json::from_value(value)?),
            "heading_2" => BlockPayload::Heading2(serde_json::from_value(value)?),
            "heading_3" => BlockPayload::Heading3(serde_json::from_value(value)?),
            "bulleted_list_item" => BlockPayload::BulletedListItem(serde_json::from_value(value)?),
            "numbered_list_item" => BlockPayload::NumberedListItem(serde_json::from_value(value)?),
            "quote" => BlockPayload::Quote(serde_json::from_value(value)?),
            "to_do" => BlockPayload::ToDo(serde_json::from_value(value)?),
            "toggle" => BlockPayload::Toggle(serde_json::from_value(value)?),
            "template" => BlockPayload::Template(serde_json::from_value(value)?),
            "synced_block" => BlockPayload::SyncedBlock(serde_json::from_value(value)?),
            "child_page" => BlockPayload::ChildPage(serde_json::from_value(value)?),
            "child_database" => BlockPayload::ChildDatabase(serde_json::from_value(value)?),
            "equation" => BlockPayload::Equation(serde_json::from_value(value)?),
            "code" => BlockPayload::Code(serde_json::from_value(value)?),
            "callout" => BlockPayload::Callout(serde_json::from_value(value)?),
            "divider" => BlockPayload::Divider(serde_json::from_value(value)?),
            "breadcrumb" => BlockPayload::Breadcrumb(serde_json::from_value(value)?),
            "table_of_contents" => BlockPayload::TableOfContents(serde_json::from_value(value)?),
            "column_list" => BlockPayload::ColumnList(serde_json::from_value(value)?),
            "column" => BlockPayload::Column(serde_json::from_value(value)?),
            "link_to_page" => BlockPayload::LinkToPage(serde_json::from_value(value)?),
            "table" => BlockPayload::Table(serde_json::from_value(value)?),
            "table_row" => BlockPayload::TableRow(serde_json::from_value(value)?),
            "embed" => BlockPayload::Embed(serde_json::from_value(value)?),
            "bookmark" => BlockPayload::Bookmark(serde_json::from_value(value)?),
            "image" => BlockPayload::Image(serde_json::from_value(value)?),
            "video" => BlockPayload::Video(serde_json::from_value(value)?),
            "pdf" => BlockPayload::Pdf(serde_json::from_value(value)?),
            "file" => BlockPayload::File(serde_json::from_value(value)?),
            "audio" => BlockPayload::Audio(serde_json::from_value(value)?),
            "link_preview" => BlockPayload::LinkPreview(serde_json::from_value(value)?),
            "unsupported" => BlockPayload::Unsupported(serde_json::from_value(value)?),
            other => BlockPayload::Unknown {
                kind: other.to_string(),
            },
        };
        Ok(payload)
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            BlockPayload::Paragraph(c) => serde_json::to_value(c),
            BlockPayload::Heading1(c) => serde_json::to_value(c),
            BlockPayload::Heading2(c) => serde_json::to_value(c),
            BlockPayload::Heading3(c) => serde_json::to_value(c),
            BlockPayload::BulletedListItem(c) => serde_json::to_value(c),
            BlockPayload::NumberedListItem(c) => serde_json::to_value(c),
            BlockPayload::Quote(c) => serde_json::to_value(c),
            BlockPayload::ToDo(c) => serde_json::to_value(c),
            BlockPayload::Toggle(c) => serde_json::to_value(c),
            BlockPayload::Template(c) => serde_json::to_value(c),
            BlockPayload::SyncedBlock(c) => serde_json::to_value(c),
            BlockPayload::ChildPage(c) => serde_json::to_value(c),
            BlockPayload::ChildDatabase(c) => serde_json::to_value(c),
            BlockPayload::Equation(c) => serde_json::to_value(c),
            BlockPayload::Code(c) => serde_json::to_value(c),
            BlockPayload::Callout(c) => serde_json::to_value(c),
            BlockPayload::Divider(c) => serde_json::to_value(c),
            BlockPayload::Breadcrumb(c) => serde_json::to_value(c),
            BlockPayload::TableOfContents(c) => serde_json::to_value(c),
            BlockPayload::ColumnList(c) => serde_json::to_value(c),
            BlockPayload::Column(c) => serde_json::to_value(c),
            BlockPayload::LinkToPage(c) => serde_json::to_value(c),
            BlockPayload::Table(c) => serde_json::to_value(c),
            BlockPayload::TableRow(c) => serde_json::to_value(c),
            BlockPayload::Embed(c) => serde_json::to_value(c),
            BlockPayload::Bookmark(c) => serde_json::to_value(c),
            BlockPayload::Image(c) => serde_json::to_value(c),
            BlockPayload::Video(c) => serde_json::to_value(c),
            BlockPayload::Pdf(c) => serde_json::to_value(c),
            BlockPayload::File(c) => serde_json::to_value(c),
            BlockPayload::Audio(c) => serde_json::to_value(c),
            BlockPayload::LinkPreview(c) => serde_json::to_value(c),
            BlockPayload::Unsupported(c) => serde_json::to_value(c),
            BlockPayload::Unknown { .. } => Ok(Value::Object(Map::new())),
        }
    }
}

#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(default)]
    has_children: bool,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl<'de> Deserialize<'de> for BlockNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = RawBlock::deserialize(deserializer)?;
        let kind = match raw.kind {
            Some(kind) => kind,
            // No type tag: a metadata-only stub.
            None => return Ok(BlockNode::Partial(PartialBlock { id: raw.id })),
        };
        let value = raw
            .rest
            .remove(&kind)
            .unwrap_or_else(|| Value::Object(Map::new()));
        let payload = BlockPayload::from_value(&kind, value).map_err(D::Error::custom)?;
        Ok(BlockNode::Full(Block {
            id: raw.id,
            has_children: raw.has_children,
            payload,
        }))
    }
}

impl Serialize for BlockNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = Map::new();
        match self {
            BlockNode::Partial(partial) => {
                map.insert("id".to_string(), Value::String(partial.id.clone()));
            }
            BlockNode::Full(block) => {
                map.insert("id".to_string(), Value::String(block.id.clone()));
                map.insert("has_children".to_string(), Value::Bool(block.has_children));
                let kind = block.payload.kind().to_string();
                map.insert("type".to_string(), Value::String(kind.clone()));
                let payload = block.payload.to_value().map_err(S::Error::custom)?;
                map.insert(kind, payload);
            }
        }
        Value::Object(map).serialize(serializer)
    }
}

/// Rich text body shared by paragraph-like blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextSpan>,

    #[serde(default = "default_color")]
    pub color: String,
}

impl TextContent {
    /// Create a body from a single plain text span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            rich_text: vec![RichTextSpan::text(text)],
            color: default_color(),
        }
    }

    /// Create a body from the given spans.
    pub fn spans(spans: Vec<RichTextSpan>) -> Self {
        Self {
            rich_text: spans,
            color: default_color(),
        }
    }
}

/// Heading body; toggleable headings collapse their children.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadingContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextSpan>,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub is_toggleable: bool,
}

impl HeadingContent {
    /// Create a heading body from plain text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            rich_text: vec![RichTextSpan::text(text)],
            ..Default::default()
        }
    }

    /// Make the heading toggleable.
    pub fn toggleable(mut self) -> Self {
        self.is_toggleable = true;
        self
    }
}

/// To-do item body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToDoContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextSpan>,

    /// Missing checked state counts as unchecked.
    #[serde(default)]
    pub checked: Option<bool>,

    #[serde(default = "default_color")]
    pub color: String,
}

/// Code block body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextSpan>,

    #[serde(default)]
    pub caption: Vec<RichTextSpan>,

    /// Language tag placed on the opening fence.
    #[serde(default)]
    pub language: String,
}

/// Callout body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalloutContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextSpan>,

    #[serde(default)]
    pub icon: Option<Icon>,

    #[serde(default = "default_color")]
    pub color: String,
}

/// A block or page icon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { external: ExternalFile },
    File { file: HostedFile },
}

impl Icon {
    /// The emoji character, if this is an emoji icon.
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Icon::Emoji { emoji } => Some(emoji),
            _ => None,
        }
    }
}

/// Block equation body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationContent {
    /// KaTeX-compatible expression
    #[serde(default)]
    pub expression: String,
}

/// Synced block body: either owns children or references another block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncedContent {
    /// Present on duplicates; absent on the original block.
    #[serde(default)]
    pub synced_from: Option<SyncedFrom>,
}

/// Non-owning reference to the original synced block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncedFrom {
    pub block_id: String,
}

/// Title payload for child pages and child databases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildTitleContent {
    #[serde(default)]
    pub title: String,
}

/// Payload for kinds carrying no renderable fields of their own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyContent {}

/// Column body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnContent {
    /// Fraction of the column list width, when the source provides one.
    #[serde(default)]
    pub width_ratio: Option<f64>,
}

/// Link target for a `link_to_page` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkToPageContent {
    PageId { page_id: String },
    DatabaseId { database_id: String },
    CommentId { comment_id: String },
}

/// Table body. Row content lives in `table_row` children.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableContent {
    #[serde(default)]
    pub table_width: u32,

    #[serde(default)]
    pub has_column_header: bool,

    #[serde(default)]
    pub has_row_header: bool,
}

/// One table row: an ordered list of cells, each a rich text sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRowContent {
    #[serde(default)]
    pub cells: Vec<Vec<RichTextSpan>>,
}

/// Where a media file lives, selected by the file-kind tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileSource {
    External { external: ExternalFile },
    File { file: HostedFile },
}

impl FileSource {
    /// The URL to emit, regardless of where the file lives.
    pub fn url(&self) -> &str {
        match self {
            FileSource::External { external } => &external.url,
            FileSource::File { file } => &file.url,
        }
    }

    /// Convenience constructor for an external URL.
    pub fn external(url: impl Into<String>) -> Self {
        FileSource::External {
            external: ExternalFile { url: url.into() },
        }
    }

    /// Convenience constructor for a source-hosted URL.
    pub fn hosted(url: impl Into<String>) -> Self {
        FileSource::File {
            file: HostedFile {
                url: url.into(),
                expiry_time: None,
            },
        }
    }
}

/// An externally hosted file reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalFile {
    #[serde(default)]
    pub url: String,
}

/// A file hosted by the source, served through an expiring URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostedFile {
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

/// Media payload for image, video, audio, and pdf blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaContent {
    #[serde(flatten)]
    pub source: FileSource,

    #[serde(default)]
    pub caption: Vec<RichTextSpan>,
}

impl MediaContent {
    /// Create a captionless media payload.
    pub fn new(source: FileSource) -> Self {
        Self {
            source,
            caption: Vec::new(),
        }
    }

    /// Attach a caption.
    pub fn with_caption(mut self, caption: Vec<RichTextSpan>) -> Self {
        self.caption = caption;
        self
    }
}

/// File block payload; unlike other media it also carries a display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    #[serde(flatten)]
    pub source: FileSource,

    #[serde(default)]
    pub caption: Vec<RichTextSpan>,

    #[serde(default)]
    pub name: String,
}

/// Payload for bookmark and embed blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkContent {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub caption: Vec<RichTextSpan>,
}

/// Bare URL payload (link previews).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlContent {
    #[serde(default)]
    pub url: String,
}

fn default_color() -> String {
    "default".to_string()
}
