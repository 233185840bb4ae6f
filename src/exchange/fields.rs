//! Translatable-field resolution.
//!
//! Which fields of a block type go out for translation is a deterministic
//! function of the type tag: an explicit operator-configured field list wins,
//! otherwise the type's registered schema contributes its text-bearing
//! fields, and configured exclusions are removed from either list. Resolution
//! is memoized per type tag in an explicit cache because one export walks
//! many blocks of few distinct types.

use std::collections::HashMap;

use crate::config::TranslationsConf;
use crate::exchange::capability::CapabilityRegistry;

pub struct FieldResolver<'a> {
    registry: &'a CapabilityRegistry,
    conf: &'a TranslationsConf,
    cache: HashMap<String, Vec<String>>,
}

impl<'a> FieldResolver<'a> {
    pub fn new(registry: &'a CapabilityRegistry, conf: &'a TranslationsConf) -> Self {
        Self {
            registry,
            conf,
            cache: HashMap::new(),
        }
    }

    /// The ordered translatable fields of a type. Unknown types resolve to
    /// an empty list.
    pub fn translatable_fields(&mut self, plugin_type: &str) -> &[String] {
        if !self.cache.contains_key(plugin_type) {
            let fields = self.compute(plugin_type);
            self.cache.insert(plugin_type.to_owned(), fields);
        }
        self.cache
            .get(plugin_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn compute(&self, plugin_type: &str) -> Vec<String> {
        let type_conf = self.conf.type_conf(plugin_type);

        let base: Vec<String> = match type_conf.and_then(|conf| conf.fields.clone()) {
            Some(configured) => configured,
            None => self
                .registry
                .schema(plugin_type)
                .map(|schema| schema.text_fields().map(str::to_owned).collect())
                .unwrap_or_default(),
        };

        let excluded: &[String] = type_conf
            .map(|conf| conf.excluded_fields.as_slice())
            .unwrap_or_default();

        base.into_iter()
            .filter(|field| !excluded.contains(field))
            .collect()
    }
}
