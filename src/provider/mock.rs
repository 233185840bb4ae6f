//! Deterministic mock provider for tests and dry runs.
//!
//! Simulates a vendor without network access. Echo mode returns the payload
//! untouched, which is exactly what the round-trip laws need; Suffix mode
//! makes every change visible; Mappings mode supports table-driven tests;
//! Error mode exercises failure paths.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Result, TranslationsError};
use crate::exchange::wire::ProviderPayload;
use crate::provider::TranslationProvider;

/// Behaviors the mock can simulate
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return every content value unchanged
    Echo,
    /// Append `_<target-language>` to every content value
    Suffix,
    /// Translate via a content → content table; unmapped values fall back to
    /// suffixing
    Mappings(HashMap<String, String>),
    /// Fail every submission with the given message
    Error(String),
}

#[derive(Debug, Clone)]
pub struct MockProvider {
    mode: MockMode,
}

impl MockProvider {
    pub fn new(mode: MockMode) -> Self {
        Self { mode }
    }

    fn apply(&self, content: &str, target: &str) -> String {
        match &self.mode {
            MockMode::Echo => content.to_owned(),
            MockMode::Suffix => format!("{content}_{target}"),
            MockMode::Mappings(map) => map
                .get(content)
                .cloned()
                .unwrap_or_else(|| format!("{content}_{target}")),
            // Error mode never reaches here
            MockMode::Error(_) => content.to_owned(),
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(&self, payload: &ProviderPayload) -> Result<ProviderPayload> {
        if let MockMode::Error(message) = &self.mode {
            return Err(TranslationsError::Provider(message.clone()));
        }

        let target = payload
            .target_languages
            .first()
            .map(String::as_str)
            .unwrap_or_default();

        let mut translated = payload.clone();
        for group in &mut translated.groups {
            for item in &mut group.items {
                item.content = self.apply(&item.content, target);
            }
        }
        Ok(translated)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::export::{GroupItem, TranslationGroup};
    use crate::exchange::key::GroupKey;

    fn payload() -> ProviderPayload {
        let groups = vec![TranslationGroup {
            key: GroupKey::new(1, "content", 2).unwrap(),
            items: vec![
                GroupItem {
                    field: "title".to_owned(),
                    content: "Hello".to_owned(),
                },
                GroupItem {
                    field: "body".to_owned(),
                    content: "World".to_owned(),
                },
            ],
        }];
        ProviderPayload::from_groups("en", "de", &groups).unwrap()
    }

    #[tokio::test]
    async fn test_echo_returns_payload_unchanged() {
        let mock = MockProvider::new(MockMode::Echo);
        let input = payload();
        let output = mock.translate(&input).await.unwrap();
        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn test_suffix_marks_every_content() {
        let mock = MockProvider::new(MockMode::Suffix);
        let output = mock.translate(&payload()).await.unwrap();
        let contents: Vec<&str> = output.groups[0]
            .items
            .iter()
            .map(|i| i.content.as_str())
            .collect();
        assert_eq!(contents, vec!["Hello_de", "World_de"]);
    }

    #[tokio::test]
    async fn test_suffix_preserves_ids_and_order() {
        let mock = MockProvider::new(MockMode::Suffix);
        let input = payload();
        let output = mock.translate(&input).await.unwrap();
        assert_eq!(output.groups[0].group_id, input.groups[0].group_id);
        let ids: Vec<&str> = output.groups[0]
            .items
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["title", "body"]);
    }

    #[tokio::test]
    async fn test_mappings_with_fallback() {
        let mut map = HashMap::new();
        map.insert("Hello".to_owned(), "Hallo".to_owned());
        let mock = MockProvider::new(MockMode::Mappings(map));
        let output = mock.translate(&payload()).await.unwrap();
        assert_eq!(output.groups[0].items[0].content, "Hallo");
        assert_eq!(output.groups[0].items[1].content, "World_de");
    }

    #[tokio::test]
    async fn test_error_mode_fails() {
        let mock = MockProvider::new(MockMode::Error("vendor down".to_owned()));
        let err = mock.translate(&payload()).await.unwrap_err();
        assert!(matches!(err, TranslationsError::Provider(_)));
    }
}
