//! Rich text spans and inline formatting annotations.

use serde::{Deserialize, Serialize};

/// A single run of inline text with its own formatting.
///
/// Spans render in array order with no separator; the concatenation of
/// rendered spans is the inline Markdown for a block's text field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RichTextSpan {
    /// What the span carries (plain text, a mention, or an inline equation).
    #[serde(rename = "type", default)]
    pub kind: SpanKind,

    /// The resolved display text, regardless of kind.
    #[serde(default)]
    pub plain_text: String,

    /// Formatting annotations; missing annotations default to off.
    #[serde(default)]
    pub annotations: Annotations,

    /// Optional link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl RichTextSpan {
    /// Create a plain text span.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold span.
    pub fn bold(text: impl Into<String>) -> Self {
        let mut span = Self::text(text);
        span.annotations.bold = true;
        span
    }

    /// Create an italic span.
    pub fn italic(text: impl Into<String>) -> Self {
        let mut span = Self::text(text);
        span.annotations.italic = true;
        span
    }

    /// Create an inline code span.
    pub fn code(text: impl Into<String>) -> Self {
        let mut span = Self::text(text);
        span.annotations.code = true;
        span
    }

    /// Create a plain span linking to `href`.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        let mut span = Self::text(text);
        span.href = Some(href.into());
        span
    }

    /// Check if the span has no text.
    pub fn is_empty(&self) -> bool {
        self.plain_text.is_empty()
    }
}

/// The kind of content a rich text span carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Literal text
    #[default]
    Text,
    /// A user, page, or date mention
    Mention,
    /// An inline equation
    Equation,
}

/// Formatting annotations on a span.
///
/// `underline` and `color` are carried for fidelity with the source records
/// but have no Markdown equivalent and do not affect output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,

    #[serde(default)]
    pub italic: bool,

    #[serde(default)]
    pub strikethrough: bool,

    #[serde(default)]
    pub underline: bool,

    #[serde(default)]
    pub code: bool,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Annotations {
    /// Check if any Markdown-visible annotation is set.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.strikethrough || self.code
    }
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: default_color(),
        }
    }
}

fn default_color() -> String {
    "default".to_string()
}
