//! Page-level metadata types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rich_text::RichTextSpan;

/// Metadata for the root page of an export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page id
    pub id: String,

    /// Named properties; only the `"title"` property is consumed here.
    /// Ordered by name so exports stay deterministic.
    #[serde(default)]
    pub properties: BTreeMap<String, PageProperty>,

    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,

    /// Last edit time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<DateTime<Utc>>,
}

impl PageMeta {
    /// Create empty metadata for a page id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Create metadata with a plain text title property.
    pub fn with_title(id: impl Into<String>, title: impl Into<String>) -> Self {
        let mut meta = Self::new(id);
        meta.properties.insert(
            "title".to_string(),
            PageProperty::title(vec![RichTextSpan::text(title)]),
        );
        meta
    }

    /// The rich text of the first property whose kind is `"title"`,
    /// or `None` if the page has no title property.
    pub fn title_spans(&self) -> Option<&[RichTextSpan]> {
        self.properties
            .values()
            .find(|property| property.kind == "title")
            .map(|property| property.title.as_slice())
    }
}

/// A single page property. Non-title kinds are carried but unused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageProperty {
    /// Property kind tag (e.g. `"title"`, `"select"`)
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Title rich text; empty for non-title properties.
    #[serde(default)]
    pub title: Vec<RichTextSpan>,
}

impl PageProperty {
    /// Create a title property from spans.
    pub fn title(spans: Vec<RichTextSpan>) -> Self {
        Self {
            kind: "title".to_string(),
            title: spans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_spans_found() {
        let meta = PageMeta::with_title("p1", "My Page");
        let spans = meta.title_spans().unwrap();
        assert_eq!(spans[0].plain_text, "My Page");
    }

    #[test]
    fn test_title_spans_ignores_other_kinds() {
        let mut meta = PageMeta::new("p1");
        meta.properties.insert(
            "Status".to_string(),
            PageProperty {
                kind: "select".to_string(),
                title: Vec::new(),
            },
        );
        assert!(meta.title_spans().is_none());

        meta.properties.insert(
            "Name".to_string(),
            PageProperty::title(vec![RichTextSpan::text("Found")]),
        );
        assert_eq!(meta.title_spans().unwrap()[0].plain_text, "Found");
    }

    #[test]
    fn test_page_meta_parse() {
        let json = r#"{
            "id": "p1",
            "properties": {
                "Name": { "type": "title", "title": [{ "plain_text": "Doc" }] }
            },
            "created_time": "2024-01-15T09:00:00Z"
        }"#;
        let meta: PageMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.title_spans().unwrap()[0].plain_text, "Doc");
        assert!(meta.created_time.is_some());
    }
}
