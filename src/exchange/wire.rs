//! The provider wire payload.
//!
//! The JSON shape exchanged with providers is a compatibility contract and
//! is preserved bit-exactly:
//!
//! ```json
//! {
//!   "ContentType": "text/html",
//!   "SourceLang": "en",
//!   "TargetLanguages": ["de"],
//!   "Groups": [
//!     {"GroupId": "1:content:2", "Items": [{"Id": "body", "Content": "..."}]}
//!   ]
//! }
//! ```
//!
//! The response is structurally identical with translated `Content` values.
//! Composite `GroupId` strings exist only here; [`ProviderPayload::into_groups`]
//! parses them into structured keys before anything else touches them.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::exchange::export::{GroupItem, TranslationGroup};
use crate::exchange::key::GroupKey;
use crate::provider::validate_language;

pub const CONTENT_TYPE_HTML: &str = "text/html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderPayload {
    pub content_type: String,
    pub source_lang: String,
    pub target_languages: Vec<String>,
    pub groups: Vec<WireGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireGroup {
    pub group_id: String,
    pub items: Vec<WireItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireItem {
    pub id: String,
    pub content: String,
}

impl ProviderPayload {
    /// Build the outbound payload for one request
    pub fn from_groups(
        source_lang: &str,
        target_language: &str,
        groups: &[TranslationGroup],
    ) -> Result<Self> {
        validate_language(source_lang)?;
        validate_language(target_language)?;

        let groups = groups
            .iter()
            .map(|group| WireGroup {
                group_id: group.key.to_string(),
                items: group
                    .items
                    .iter()
                    .map(|item| WireItem {
                        id: item.field.clone(),
                        content: item.content.clone(),
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            content_type: CONTENT_TYPE_HTML.to_owned(),
            source_lang: source_lang.to_owned(),
            target_languages: vec![target_language.to_owned()],
            groups,
        })
    }

    /// Parse an inbound payload back into structured groups, rejecting
    /// malformed GroupIds
    pub fn into_groups(self) -> Result<Vec<TranslationGroup>> {
        self.groups
            .into_iter()
            .map(|group| {
                let key: GroupKey = group.group_id.parse()?;
                Ok(TranslationGroup {
                    key,
                    items: group
                        .items
                        .into_iter()
                        .map(|item| GroupItem {
                            field: item.id,
                            content: item.content,
                        })
                        .collect(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslationsError;
    use serde_json::json;

    fn sample_groups() -> Vec<TranslationGroup> {
        vec![TranslationGroup {
            key: GroupKey::new(1, "content", 2).unwrap(),
            items: vec![
                GroupItem {
                    field: "title".to_owned(),
                    content: "Hello".to_owned(),
                },
                GroupItem {
                    field: "body".to_owned(),
                    content: "<p>World</p>".to_owned(),
                },
            ],
        }]
    }

    #[test]
    fn test_serialized_shape_is_exact() {
        let payload = ProviderPayload::from_groups("en", "de", &sample_groups()).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "ContentType": "text/html",
                "SourceLang": "en",
                "TargetLanguages": ["de"],
                "Groups": [{
                    "GroupId": "1:content:2",
                    "Items": [
                        {"Id": "title", "Content": "Hello"},
                        {"Id": "body", "Content": "<p>World</p>"},
                    ],
                }],
            })
        );
    }

    #[test]
    fn test_payload_round_trips_through_groups() {
        let groups = sample_groups();
        let payload = ProviderPayload::from_groups("en", "de", &groups).unwrap();
        assert_eq!(payload.into_groups().unwrap(), groups);
    }

    #[test]
    fn test_response_parsing_preserves_item_order() {
        let payload: ProviderPayload = serde_json::from_value(json!({
            "ContentType": "text/html",
            "SourceLang": "en",
            "TargetLanguages": ["fr"],
            "Groups": [{
                "GroupId": "3:footer:9",
                "Items": [
                    {"Id": "b", "Content": "2"},
                    {"Id": "a", "Content": "1"},
                ],
            }],
        }))
        .unwrap();

        let groups = payload.into_groups().unwrap();
        let fields: Vec<&str> = groups[0].items.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "a"]);
        assert_eq!(groups[0].key, GroupKey::new(3, "footer", 9).unwrap());
    }

    #[test]
    fn test_malformed_group_id_is_rejected() {
        let payload: ProviderPayload = serde_json::from_value(json!({
            "ContentType": "text/html",
            "SourceLang": "en",
            "TargetLanguages": ["de"],
            "Groups": [{"GroupId": "not-a-key", "Items": []}],
        }))
        .unwrap();

        assert!(matches!(
            payload.into_groups(),
            Err(TranslationsError::MalformedGroupId(_))
        ));
    }

    #[test]
    fn test_invalid_language_is_rejected() {
        let err = ProviderPayload::from_groups("en us", "de", &[]).unwrap_err();
        assert!(matches!(err, TranslationsError::InvalidLanguage(_)));
    }

    #[test]
    fn test_empty_groups_payload() {
        let payload = ProviderPayload::from_groups("en", "de-CH", &[]).unwrap();
        assert!(payload.groups.is_empty());
        assert_eq!(payload.target_languages, vec!["de-CH"]);
        assert!(payload.into_groups().unwrap().is_empty());
    }
}
