//! Crate-wide error type for the export/merge core and the provider boundary.

use thiserror::Error;

use crate::exchange::key::GroupKey;
use crate::request::RequestState;

/// Errors surfaced while flattening, merging, or talking to a provider
#[derive(Error, Debug)]
pub enum TranslationsError {
    /// Slot names travel inside the composite group key and therefore must
    /// not contain the key delimiter
    #[error("invalid slot name {0:?}: slot names must not contain ':'")]
    InvalidSlot(String),

    /// A wire GroupId did not split into item, slot and block components
    #[error("malformed group id {0:?}")]
    MalformedGroupId(String),

    /// Two groups in one export resolved to the same key
    #[error("duplicate group key {0}")]
    DuplicateGroupKey(GroupKey),

    /// A translated group addresses an item, slot or block that is not part
    /// of the export snapshot
    #[error("group {0} does not match any block in the export snapshot")]
    UnknownGroup(GroupKey),

    /// The provider payload could not be read or written as JSON
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Language codes are restricted to ASCII alphanumerics, '-' and '_'
    #[error("invalid language code {0:?}")]
    InvalidLanguage(String),

    /// Operator configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// A lifecycle operation was attempted in a state that does not allow it
    #[error("cannot {action} while the request is {state:?}")]
    InvalidState {
        action: &'static str,
        state: RequestState,
    },

    /// The provider rejected or failed a request
    #[error("provider error: {0}")]
    Provider(String),

    /// Transport-level failure while talking to the provider
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for TranslationsError {
    fn from(error: toml::de::Error) -> Self {
        TranslationsError::Config(error.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TranslationsError>;
