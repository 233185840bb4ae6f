//! Operator configuration.
//!
//! Loaded from TOML, typically one `[types."PluginName"]` table per block
//! type the operator wants to tune:
//!
//! ```toml
//! use_staging = false
//! bulk_batch_size = 50
//!
//! [types."TextPlugin"]
//! rich_text = true
//! fields = ["body"]
//!
//! [types."LinkPlugin"]
//! excluded_fields = ["link_url"]
//! text_field = "label"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-type tuning supplied by the operator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeConf {
    /// Explicit translatable-field list; wins over the registered schema
    #[serde(default)]
    pub fields: Option<Vec<String>>,

    /// Fields removed from whichever list applies
    #[serde(default)]
    pub excluded_fields: Vec<String>,

    /// The single field on this type eligible to receive inline-substituted
    /// text when the block is swallowed into a rich-text parent
    #[serde(default)]
    pub text_field: Option<String>,

    /// Marks types whose fields embed child blocks via inline markers
    #[serde(default)]
    pub rich_text: bool,
}

/// Top-level configuration for the connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationsConf {
    /// Talk to the provider's staging environment instead of live
    #[serde(default = "default_use_staging")]
    pub use_staging: bool,

    /// Number of items submitted per batch for bulk requests
    #[serde(default = "default_bulk_batch_size")]
    pub bulk_batch_size: usize,

    #[serde(default)]
    pub types: HashMap<String, TypeConf>,
}

fn default_use_staging() -> bool {
    true
}

fn default_bulk_batch_size() -> usize {
    100
}

impl Default for TranslationsConf {
    fn default() -> Self {
        Self {
            use_staging: default_use_staging(),
            bulk_batch_size: default_bulk_batch_size(),
            types: HashMap::new(),
        }
    }
}

impl TranslationsConf {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn type_conf(&self, plugin_type: &str) -> Option<&TypeConf> {
        self.types.get(plugin_type)
    }

    /// The configured inline-substitution target field for a type, if any
    pub fn text_field(&self, plugin_type: &str) -> Option<&str> {
        self.type_conf(plugin_type)
            .and_then(|conf| conf.text_field.as_deref())
    }
}
