//! Cluster blocks: operations the cluster currently refuses.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Value};

use crate::xcontent::{object, Object, ToXContent};

/// Operation class a block applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusterBlockLevel {
    Read,
    Write,
    MetadataRead,
    MetadataWrite,
}

impl ClusterBlockLevel {
    pub fn name(self) -> &'static str {
        match self {
            ClusterBlockLevel::Read => "read",
            ClusterBlockLevel::Write => "write",
            ClusterBlockLevel::MetadataRead => "metadata_read",
            ClusterBlockLevel::MetadataWrite => "metadata_write",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterBlock {
    pub id: u32,
    pub description: String,
    pub retryable: bool,
    pub levels: BTreeSet<ClusterBlockLevel>,
}

impl ClusterBlock {
    pub fn new(
        id: u32,
        description: impl Into<String>,
        retryable: bool,
        levels: impl IntoIterator<Item = ClusterBlockLevel>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            retryable,
            levels: levels.into_iter().collect(),
        }
    }
}

impl ToXContent for ClusterBlock {
    fn to_xcontent(&self) -> Value {
        let levels: Vec<&str> = self.levels.iter().map(|l| l.name()).collect();
        object([
            ("description", json!(self.description)),
            ("retryable", json!(self.retryable)),
            ("levels", json!(levels)),
        ])
    }
}

/// Global and per-index blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterBlocks {
    global: Vec<ClusterBlock>,
    indices: BTreeMap<String, Vec<ClusterBlock>>,
}

impl ClusterBlocks {
    pub fn add_global(mut self, block: ClusterBlock) -> Self {
        self.global.push(block);
        self
    }

    pub fn add_index_block(mut self, index: impl Into<String>, block: ClusterBlock) -> Self {
        self.indices.entry(index.into()).or_default().push(block);
        self
    }

    pub fn global(&self) -> &[ClusterBlock] {
        &self.global
    }

    pub fn index_blocks(&self, index: &str) -> &[ClusterBlock] {
        self.indices.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.indices.is_empty()
    }
}

fn blocks_by_id(blocks: &[ClusterBlock]) -> Value {
    Value::Object(
        blocks
            .iter()
            .map(|b| (b.id.to_string(), b.to_xcontent()))
            .collect(),
    )
}

impl ToXContent for ClusterBlocks {
    fn to_xcontent(&self) -> Value {
        let mut doc = Object::new();
        if !self.global.is_empty() {
            doc.insert("global".into(), blocks_by_id(&self.global));
        }
        if !self.indices.is_empty() {
            let indices: Object = self
                .indices
                .iter()
                .map(|(index, blocks)| (index.clone(), blocks_by_id(blocks)))
                .collect();
            doc.insert("indices".into(), Value::Object(indices));
        }
        Value::Object(doc)
    }
}
