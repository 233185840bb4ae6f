//! The provider boundary.
//!
//! A provider is an opaque translation vendor: it receives the wire payload
//! produced by the flattener and answers with a structurally identical
//! payload carrying translated content. Everything else about a vendor
//! (quoting, ordering, callbacks) happens outside this crate; the trait
//! keeps the core testable against a deterministic mock.

use async_trait::async_trait;

use crate::error::{Result, TranslationsError};
use crate::exchange::wire::ProviderPayload;

pub mod http;
pub mod mock;

pub use http::HttpProvider;
pub use mock::{MockMode, MockProvider};

/// An opaque translation vendor
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Submit a payload and obtain the translated counterpart.
    ///
    /// Implementations must return a payload with the same groups and items
    /// in the same order; only `Content` values change.
    async fn translate(&self, payload: &ProviderPayload) -> Result<ProviderPayload>;

    /// Name used in logs to identify the provider
    fn name(&self) -> &str;
}

/// Strip region/script information from a language code: `de-CH` becomes
/// `de`, `zh-Hans` becomes `zh`, `en` stays `en`.
pub fn normalize_language(code: &str) -> String {
    code.split(['-', '_'])
        .next()
        .unwrap_or(code)
        .to_lowercase()
}

/// Validate that a language code is non-empty and uses only ASCII
/// alphanumerics, hyphens and underscores.
pub fn validate_language(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(TranslationsError::InvalidLanguage(code.to_owned()));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TranslationsError::InvalidLanguage(code.to_owned()));
    }
    Ok(())
}
