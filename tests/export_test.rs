//! End-to-end export tests over in-memory and JSON snapshots.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use unnotion::model::{
    HeadingContent, SyncedContent, SyncedFrom, TableContent, TableRowContent, TextContent,
};
use unnotion::{
    export_page, Block, BlockNode, BlockPayload, BlockRenderer, BlockSource, Error, Exporter,
    PageMeta, RenderOptions, Result, RichTextSpan, SnapshotSource,
};

fn paragraph(id: &str, text: &str) -> Block {
    Block::new(id, BlockPayload::Paragraph(TextContent::plain(text)))
}

fn bullet(id: &str, text: &str) -> Block {
    Block::new(id, BlockPayload::BulletedListItem(TextContent::plain(text)))
}

#[tokio::test]
async fn test_export_simple_page() {
    let mut source = SnapshotSource::new();
    source.insert_page(PageMeta::with_title("page", "Notes"));
    source.insert_children(
        "page",
        vec![
            Block::new("h", BlockPayload::Heading1(HeadingContent::plain("Intro"))),
            paragraph("p", "Hello world."),
        ],
    );

    let markdown = export_page(Arc::new(source), "page").await.unwrap();
    assert_eq!(markdown, "# Notes\n\n# Intro\n\nHello world.\n\n");
}

#[tokio::test]
async fn test_nested_list_indentation() {
    let mut source = SnapshotSource::new();
    source.insert_page(PageMeta::with_title("page", "List"));
    source.insert_children("page", vec![bullet("outer", "outer").with_children()]);
    source.insert_children("outer", vec![bullet("inner", "inner").with_children()]);
    source.insert_children("inner", vec![bullet("deep", "deep")]);

    let markdown = export_page(Arc::new(source), "page").await.unwrap();
    assert_eq!(
        markdown,
        "# List\n\n- outer\n  - inner\n    - deep\n"
    );
}

#[tokio::test]
async fn test_quote_prefixes_child_lines() {
    let mut source = SnapshotSource::new();
    source.insert_page(PageMeta::with_title("page", "Q"));
    source.insert_children(
        "page",
        vec![Block::new("q", BlockPayload::Quote(TextContent::plain("top line"))).with_children()],
    );
    source.insert_children("q", vec![paragraph("c1", "nested"), bullet("c2", "point")]);

    let markdown = export_page(Arc::new(source), "page").await.unwrap();
    // Every non-empty child line gains the quote marker; blank lines drop out.
    assert_eq!(
        markdown,
        "# Q\n\n> top line\n>   nested\n>   - point\n\n"
    );
}

#[tokio::test]
async fn test_table_header_and_rows() {
    let mut source = SnapshotSource::new();
    source.insert_page(PageMeta::with_title("page", "T"));
    source.insert_children(
        "page",
        vec![Block::new(
            "table",
            BlockPayload::Table(TableContent {
                table_width: 2,
                has_column_header: true,
                has_row_header: false,
            }),
        )
        .with_children()],
    );
    let row = |id: &str, a: &str, b: &str| {
        Block::new(
            id,
            BlockPayload::TableRow(TableRowContent {
                cells: vec![vec![RichTextSpan::text(a)], vec![RichTextSpan::text(b)]],
            }),
        )
    };
    source.insert_children("table", vec![row("r1", "Name", "Age"), row("r2", "Ada", "36")]);

    let markdown = export_page(Arc::new(source), "page").await.unwrap();
    assert_eq!(
        markdown,
        "# T\n\n| Name | Age |\n| --- | --- |\n| Ada | 36 |\n\n"
    );
}

#[tokio::test]
async fn test_synced_matches_direct_render() {
    let mut source = SnapshotSource::new();
    let original = bullet("orig", "shared content").with_children();
    source.insert(original.clone());
    source.insert_children("orig", vec![paragraph("sub", "detail")]);

    let renderer = BlockRenderer::new(Arc::new(source), RenderOptions::default());
    let direct = renderer
        .render(BlockNode::Full(original), 0)
        .await
        .unwrap();

    let duplicate = Block::new(
        "dup",
        BlockPayload::SyncedBlock(SyncedContent {
            synced_from: Some(SyncedFrom {
                block_id: "orig".to_string(),
            }),
        }),
    );
    let via_synced = renderer
        .render(BlockNode::Full(duplicate), 0)
        .await
        .unwrap();

    assert_eq!(via_synced, direct);
    assert_eq!(direct, "- shared content\n  detail\n\n");
}

#[tokio::test]
async fn test_self_referential_synced_is_empty() {
    let mut source = SnapshotSource::new();
    let block = Block::new(
        "loop",
        BlockPayload::SyncedBlock(SyncedContent {
            synced_from: Some(SyncedFrom {
                block_id: "loop".to_string(),
            }),
        }),
    );
    source.insert(block.clone());

    let renderer = BlockRenderer::new(Arc::new(source), RenderOptions::default());
    let out = renderer.render(BlockNode::Full(block), 0).await.unwrap();
    assert_eq!(out, "");
}

#[tokio::test]
async fn test_mutual_synced_cycle_terminates() {
    let synced = |id: &str, target: &str| {
        Block::new(
            id,
            BlockPayload::SyncedBlock(SyncedContent {
                synced_from: Some(SyncedFrom {
                    block_id: target.to_string(),
                }),
            }),
        )
    };
    let mut source = SnapshotSource::new();
    let a = synced("a", "b");
    source.insert(a.clone());
    source.insert(synced("b", "a"));

    let renderer = BlockRenderer::new(Arc::new(source), RenderOptions::default());
    let out = renderer.render(BlockNode::Full(a), 0).await.unwrap();
    assert_eq!(out, "");
}

#[tokio::test]
async fn test_unresolved_synced_is_empty() {
    let block = Block::new(
        "dangling",
        BlockPayload::SyncedBlock(SyncedContent {
            synced_from: Some(SyncedFrom {
                block_id: "missing".to_string(),
            }),
        }),
    );
    let renderer = BlockRenderer::new(Arc::new(SnapshotSource::new()), RenderOptions::default());
    let out = renderer.render(BlockNode::Full(block), 0).await.unwrap();
    assert_eq!(out, "");
}

#[tokio::test]
async fn test_json_snapshot_unknown_and_partial_blocks() {
    let json = r#"{
        "pages": {
            "p": {
                "id": "p",
                "properties": {
                    "title": { "type": "title", "title": [{ "plain_text": "Mixed" }] }
                }
            }
        },
        "blocks": {
            "b1": { "id": "b1", "type": "paragraph",
                    "paragraph": { "rich_text": [{ "plain_text": "kept" }] } },
            "b2": { "id": "b2", "type": "ai_summary", "has_children": true,
                    "ai_summary": { "whatever": 1 } },
            "b3": { "id": "b3" },
            "b4": { "id": "b4", "type": "paragraph",
                    "paragraph": { "rich_text": [{ "plain_text": "inside" }] } }
        },
        "children": { "p": ["b1", "b2", "b3"], "b2": ["b4"] }
    }"#;
    let source = SnapshotSource::from_json(json).unwrap();

    let markdown = export_page(Arc::new(source), "p").await.unwrap();
    // Unknown kinds get a placeholder but keep their subtree; partial
    // blocks vanish without failing the export.
    assert_eq!(
        markdown,
        "# Mixed\n\nkept\n\n[Unknown Block Type: ai_summary]\n\n  inside\n\n"
    );
}

#[tokio::test]
async fn test_sibling_order_preserved_under_concurrency() {
    let mut source = SnapshotSource::new();
    source.insert_page(PageMeta::with_title("page", "Ordered"));
    let blocks: Vec<Block> = (0..40)
        .map(|i| paragraph(&format!("b{i}"), &format!("line {i}")))
        .collect();
    source.insert_children("page", blocks);

    let options = RenderOptions::new().with_max_concurrency(8);
    let exporter = Exporter::new(Arc::new(source)).with_options(options);
    let markdown = exporter.export("page").await.unwrap();

    let mut expected = String::from("# Ordered\n\n");
    for i in 0..40 {
        expected.push_str(&format!("line {i}\n\n"));
    }
    assert_eq!(markdown, expected);
}

/// Source whose child listing never completes in time.
struct SlowSource;

#[async_trait]
impl BlockSource for SlowSource {
    async fn fetch_block(&self, block_id: &str) -> Result<BlockNode> {
        Err(Error::BlockNotFound(block_id.to_string()))
    }

    async fn fetch_children(&self, _block_id: &str) -> Result<Vec<BlockNode>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    async fn fetch_page(&self, page_id: &str) -> Result<PageMeta> {
        Ok(PageMeta::with_title(page_id, "Slow"))
    }
}

#[tokio::test]
async fn test_timeout_aborts_export() {
    let exporter = Exporter::new(Arc::new(SlowSource)).with_timeout(Duration::from_millis(50));
    let err = exporter.export("page").await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
}

#[tokio::test]
async fn test_export_to_file() {
    let mut source = SnapshotSource::new();
    source.insert_page(PageMeta::with_title("page", "Saved"));
    source.insert_children("page", vec![paragraph("p", "on disk")]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.md");
    let exporter = Exporter::new(Arc::new(source));
    exporter.export_to_file("page", &path).await.unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "# Saved\n\non disk\n\n");
}
