//! CMS translation-provider connector.
//!
//! Routes CMS page content through third-party translation providers: the
//! export flattener turns nested plugin trees into a flat, addressable list
//! of translation groups, the provider translates them as an opaque black
//! box, and the import merger writes the translated groups back into a
//! reconstructed copy of the original trees, resolving inline references to
//! blocks embedded inside rich text. A [`request::TranslationRequest`]
//! tracks the surrounding quote/order lifecycle and archives responses that
//! cannot be imported.
//!
//! # Example
//!
//! ```ignore
//! use cms_translations::{
//!     CapabilityRegistry, ContentTree, MockMode, MockProvider, ProviderPayload,
//!     TranslationProvider, TranslationsConf, flatten, merge,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let conf = TranslationsConf::from_file("translations.toml")?;
//!     let registry = CapabilityRegistry::from_conf(&conf);
//!
//!     let items: Vec<(u64, ContentTree)> = load_trees_from_cms();
//!     let groups = flatten(&items, &registry, &conf)?;
//!     let payload = ProviderPayload::from_groups("en", "de", &groups)?;
//!
//!     let provider = MockProvider::new(MockMode::Suffix);
//!     let response = provider.translate(&payload).await?;
//!
//!     let merged = merge(&items, &response.into_groups()?, &registry, &conf)?;
//!     write_trees_to_cms(merged);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod exchange;
pub mod provider;
pub mod request;

pub use config::{TranslationsConf, TypeConf};
pub use content::{BlockId, ContentBlock, ContentTree, ItemId, Placeholder};
pub use error::{Result, TranslationsError};
pub use exchange::{
    BlockCapability, BlockSchema, CapabilityRegistry, ExportedContent, FieldKind, FieldSpec,
    GroupItem, GroupKey, ProviderPayload, RichTextCapability, TranslationGroup, flatten, merge,
};
pub use provider::{HttpProvider, MockMode, MockProvider, TranslationProvider};
pub use request::{OrderState, Quote, RequestState, TranslationOrder, TranslationRequest};
