//! Block-type capabilities.
//!
//! The flattener and merger never hard-code knowledge about concrete block
//! types. Each type may register a schema (used to derive its default
//! translatable fields) and a [`BlockCapability`] implementation (used to
//! enrich content on its way out and split it up again on its way back).
//! Types without a registration silently get the default behavior: fields
//! are exported verbatim and nothing is inline-substituted.

use std::collections::HashMap;

use crate::config::TranslationsConf;
use crate::content::{BlockId, ContentBlock, ContentTree};
use crate::exchange::markers;

/// How a schema field stores its value. Only text-bearing kinds are
/// candidates for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain human text
    Text,
    /// HTML-bearing text that may embed inline markers
    RichText,
    /// Reference to another object (page, file, ...)
    Relation,
    Boolean,
    /// Value constrained to a fixed choice set
    Choice,
}

impl FieldKind {
    pub fn is_text(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::RichText)
    }
}

/// One field in a block type's schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered schema of a block type, as supplied by the type system
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSchema {
    pub fields: Vec<FieldSpec>,
}

impl BlockSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Names of the text-bearing fields, in schema order
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|field| field.kind.is_text())
            .map(|field| field.name.as_str())
    }
}

/// Content produced for one field by [`BlockCapability::export_content`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedContent {
    pub content: String,
    /// Ids of descendant blocks whose text got embedded, deduplicated
    pub inline_refs: Vec<BlockId>,
}

impl ExportedContent {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            inline_refs: Vec::new(),
        }
    }
}

/// Read-only view of one item's tree during an export walk
pub struct TreeContext<'a> {
    blocks: HashMap<BlockId, &'a ContentBlock>,
    conf: &'a TranslationsConf,
}

impl<'a> TreeContext<'a> {
    pub fn new(tree: &'a ContentTree, conf: &'a TranslationsConf) -> Self {
        Self {
            blocks: tree.blocks().map(|block| (block.id, block)).collect(),
            conf,
        }
    }

    pub fn block(&self, id: BlockId) -> Option<&ContentBlock> {
        self.blocks.get(&id).copied()
    }

    /// The inline text of a block: the value of its type's configured
    /// text field, if both exist
    pub fn inline_text(&self, id: BlockId) -> Option<&str> {
        let block = self.block(id)?;
        let field = self.conf.text_field(&block.plugin_type)?;
        block.text_value(field)
    }
}

/// Optional per-type hooks around the export/merge round trip.
///
/// Both methods have defaults, so an implementation only overrides the side
/// it cares about.
pub trait BlockCapability: Send + Sync {
    /// Produce the content sent to the provider for one field, along with
    /// the ids of any descendant blocks embedded into it.
    fn export_content(
        &self,
        field: &str,
        block: &ContentBlock,
        ctx: &TreeContext<'_>,
    ) -> ExportedContent {
        let _ = ctx;
        ExportedContent::plain(block.text_value(field).unwrap_or_default())
    }

    /// Map translated content back onto the embedded descendants: for every
    /// inline-referenced child, the translated text destined for it.
    fn import_content(&self, content: &str, block: &ContentBlock) -> HashMap<BlockId, String> {
        let _ = (content, block);
        HashMap::new()
    }
}

/// The behavior used when a type has registered nothing
struct DefaultCapability;

impl BlockCapability for DefaultCapability {}

/// Capability for types whose text embeds child blocks via inline markers
pub struct RichTextCapability;

impl BlockCapability for RichTextCapability {
    fn export_content(
        &self,
        field: &str,
        block: &ContentBlock,
        ctx: &TreeContext<'_>,
    ) -> ExportedContent {
        let raw = block.text_value(field).unwrap_or_default();
        let (content, inline_refs) = markers::inject_children(raw, ctx);
        ExportedContent {
            content,
            inline_refs,
        }
    }

    fn import_content(&self, content: &str, _block: &ContentBlock) -> HashMap<BlockId, String> {
        markers::extract_children(content)
    }
}

/// Type-tag to schema/capability resolution, built once at startup
pub struct CapabilityRegistry {
    schemas: HashMap<String, BlockSchema>,
    capabilities: HashMap<String, Box<dyn BlockCapability>>,
    fallback: DefaultCapability,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
            capabilities: HashMap::new(),
            fallback: DefaultCapability,
        }
    }

    /// Registry seeded from the operator configuration: every type marked
    /// `rich_text` gets the marker-aware capability.
    pub fn from_conf(conf: &TranslationsConf) -> Self {
        let mut registry = Self::new();
        for (plugin_type, type_conf) in &conf.types {
            if type_conf.rich_text {
                registry.register_capability(plugin_type.clone(), RichTextCapability);
            }
        }
        registry
    }

    pub fn register_schema(&mut self, plugin_type: impl Into<String>, schema: BlockSchema) {
        self.schemas.insert(plugin_type.into(), schema);
    }

    pub fn register_capability(
        &mut self,
        plugin_type: impl Into<String>,
        capability: impl BlockCapability + 'static,
    ) {
        self.capabilities
            .insert(plugin_type.into(), Box::new(capability));
    }

    pub fn schema(&self, plugin_type: &str) -> Option<&BlockSchema> {
        self.schemas.get(plugin_type)
    }

    /// The capability registered for a type, or the default one
    pub fn capability(&self, plugin_type: &str) -> &dyn BlockCapability {
        match self.capabilities.get(plugin_type) {
            Some(capability) => capability.as_ref(),
            None => &self.fallback,
        }
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
