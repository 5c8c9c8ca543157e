//! JSON snapshot source.
//!
//! A [`SnapshotSource`] serves a page tree captured ahead of time: three
//! maps (`pages`, `blocks`, `children`) keyed by id. The CLI reads one from
//! a JSON file; tests build one in memory. A block listed under `children`
//! but absent from `blocks` is a snapshot integrity error; a parent with no
//! `children` entry simply has none.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Block, BlockNode, PageMeta};

use super::BlockSource;

/// An in-memory block source backed by captured page data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSource {
    #[serde(default)]
    pages: HashMap<String, PageMeta>,

    #[serde(default)]
    blocks: HashMap<String, BlockNode>,

    #[serde(default)]
    children: HashMap<String, Vec<String>>,
}

impl SnapshotSource {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Insert page metadata.
    pub fn insert_page(&mut self, page: PageMeta) {
        self.pages.insert(page.id.clone(), page);
    }

    /// Insert a block node.
    pub fn insert(&mut self, node: impl Into<BlockNode>) {
        let node = node.into();
        self.blocks.insert(node.id().to_string(), node);
    }

    /// Insert a block and register it as the ordered children of `parent`.
    pub fn insert_children(&mut self, parent: impl Into<String>, blocks: Vec<Block>) {
        let ids = blocks.iter().map(|b| b.id.clone()).collect();
        for block in blocks {
            self.insert(block);
        }
        self.children.insert(parent.into(), ids);
    }

    /// Register child ids for a parent without inserting the blocks.
    pub fn set_children(&mut self, parent: impl Into<String>, ids: Vec<String>) {
        self.children.insert(parent.into(), ids);
    }
}

#[async_trait]
impl BlockSource for SnapshotSource {
    async fn fetch_block(&self, block_id: &str) -> Result<BlockNode> {
        self.blocks
            .get(block_id)
            .cloned()
            .ok_or_else(|| Error::BlockNotFound(block_id.to_string()))
    }

    async fn fetch_children(&self, block_id: &str) -> Result<Vec<BlockNode>> {
        let ids = match self.children.get(block_id) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        ids.iter()
            .map(|id| {
                self.blocks
                    .get(id)
                    .cloned()
                    .ok_or_else(|| Error::BlockNotFound(id.clone()))
            })
            .collect()
    }

    async fn fetch_page(&self, page_id: &str) -> Result<PageMeta> {
        self.pages
            .get(page_id)
            .cloned()
            .ok_or_else(|| Error::PageNotFound(page_id.to_string()))
    }
}
