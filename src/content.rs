//! Content-tree input model.
//!
//! This is the read-only shape the CMS content layer hands over at export
//! time: per page item, an ordered list of named slots, each holding its
//! blocks in tree-serialization order (parents before descendants, siblings
//! in original order). Block `data` is kept as raw JSON because real block
//! records mix translatable strings with links, flags and nested objects;
//! only string-valued fields ever reach a provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of one source/target page pairing within a request
pub type ItemId = u64;

/// Identifier of one block, unique across an entire export
pub type BlockId = u64;

/// One content/plugin instance within a tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: BlockId,

    /// None for tree roots
    #[serde(default)]
    pub parent_id: Option<BlockId>,

    /// Polymorphic type tag, resolved through the capability registry
    pub plugin_type: String,

    #[serde(default)]
    pub position: u32,

    /// Raw field values as stored by the CMS
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl ContentBlock {
    pub fn new(id: BlockId, plugin_type: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            plugin_type: plugin_type.into(),
            position: 0,
            data: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: BlockId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.data.insert(field.into(), value);
        self
    }

    /// The field's value if it holds a string, None otherwise
    pub fn text_value(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    pub fn set_text(&mut self, field: &str, value: impl Into<String>) {
        self.data
            .insert(field.to_owned(), Value::String(value.into()));
    }
}

/// A named slot and the blocks it holds, in tree-serialization order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub slot: String,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

impl Placeholder {
    pub fn new(slot: impl Into<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            slot: slot.into(),
            blocks,
        }
    }
}

/// The ordered forest of blocks representing one item's content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTree {
    pub placeholders: Vec<Placeholder>,
}

impl ContentTree {
    pub fn new(placeholders: Vec<Placeholder>) -> Self {
        Self { placeholders }
    }

    /// Look up a block anywhere in the tree by id
    pub fn block(&self, id: BlockId) -> Option<&ContentBlock> {
        self.blocks().find(|block| block.id == id)
    }

    /// All blocks across all slots, in traversal order
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.placeholders
            .iter()
            .flat_map(|placeholder| placeholder.blocks.iter())
    }
}
