//! The content exchange core.
//!
//! Everything needed to turn CMS plugin trees into provider payloads and
//! back:
//!
//! 1. **Capability layer** - per-type schemas and the export/import hooks
//!    that let rich-text blocks swallow their children into one coherent
//!    piece of text
//! 2. **Field resolution** - which fields of a type are translatable,
//!    memoized per type tag
//! 3. **Export flattener** - trees in, ordered translation groups out
//! 4. **Import merger** - translated groups in, reconstructed trees out
//! 5. **Wire payload** - the bit-exact JSON shape exchanged with providers
//!
//! The flattener and merger share one addressing scheme, the
//! `"{item}:{slot}:{block}"` group key, so every group a provider returns
//! can be traced back to the exact block that produced it.

pub mod capability;
pub mod export;
pub mod fields;
pub mod import;
pub mod key;
pub mod markers;
pub mod wire;


pub use capability::{
    BlockCapability, BlockSchema, CapabilityRegistry, ExportedContent, FieldKind, FieldSpec,
    RichTextCapability, TreeContext,
};
pub use export::{GroupItem, TranslationGroup, flatten};
pub use fields::FieldResolver;
pub use import::merge;
pub use key::GroupKey;
pub use wire::{CONTENT_TYPE_HTML, ProviderPayload, WireGroup, WireItem};
