//! The export flattener.
//!
//! Walks the content trees of a request and produces the flat, addressable
//! group list sent to the provider. Group order is a contract, not an
//! accident: identical input yields a byte-identical group sequence, which
//! keeps provider payloads reproducible and diffable.

use std::collections::HashSet;

use crate::config::TranslationsConf;
use crate::content::{BlockId, ContentTree, ItemId};
use crate::error::{Result, TranslationsError};
use crate::exchange::capability::{CapabilityRegistry, TreeContext};
use crate::exchange::fields::FieldResolver;
use crate::exchange::key::GroupKey;

/// One (field, content) pair inside a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupItem {
    pub field: String,
    pub content: String,
}

/// The unit of translation exchanged with a provider: all exported fields of
/// one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationGroup {
    pub key: GroupKey,
    pub items: Vec<GroupItem>,
}

/// Flatten the given content trees into translation groups, one group per
/// block that has exportable text.
///
/// Blocks whose text gets embedded into a rich-text ancestor are swallowed:
/// their ids land in a per-item skip set as soon as an ancestor claims them,
/// and they are not flattened into groups of their own. The skip set is
/// scoped to this call; nothing leaks between invocations.
pub fn flatten(
    items: &[(ItemId, ContentTree)],
    registry: &CapabilityRegistry,
    conf: &TranslationsConf,
) -> Result<Vec<TranslationGroup>> {
    let mut groups = Vec::new();
    let mut seen_keys: HashSet<GroupKey> = HashSet::new();
    let mut resolver = FieldResolver::new(registry, conf);

    for (item_id, tree) in items {
        let ctx = TreeContext::new(tree, conf);
        let mut inlined: HashSet<BlockId> = HashSet::new();

        for placeholder in &tree.placeholders {
            for block in &placeholder.blocks {
                if inlined.contains(&block.id) {
                    tracing::debug!(
                        block = block.id,
                        "block already inlined into an ancestor, skipping"
                    );
                    continue;
                }

                let capability = registry.capability(&block.plugin_type);
                let mut collected = Vec::new();

                for field in resolver.translatable_fields(&block.plugin_type) {
                    let has_raw_text = block
                        .text_value(field)
                        .is_some_and(|value| !value.is_empty());
                    if !has_raw_text {
                        continue;
                    }

                    let exported = capability.export_content(field, block, &ctx);
                    inlined.extend(exported.inline_refs);

                    // Emptiness is judged on the substituted content, not the
                    // stored value.
                    if exported.content.is_empty() {
                        continue;
                    }
                    collected.push(GroupItem {
                        field: field.clone(),
                        content: exported.content,
                    });
                }

                if collected.is_empty() {
                    continue;
                }

                let key = GroupKey::new(*item_id, placeholder.slot.clone(), block.id)?;
                if !seen_keys.insert(key.clone()) {
                    return Err(TranslationsError::DuplicateGroupKey(key));
                }
                groups.push(TranslationGroup {
                    key,
                    items: collected,
                });
            }
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypeConf;
    use crate::content::{ContentBlock, Placeholder};
    use crate::exchange::capability::{BlockSchema, FieldKind, FieldSpec, RichTextCapability};
    use serde_json::json;

    fn link_schema() -> BlockSchema {
        BlockSchema::new(vec![
            FieldSpec::new("label", FieldKind::Text),
            FieldSpec::new("link_url", FieldKind::Text),
            FieldSpec::new("link_page", FieldKind::Relation),
        ])
    }

    fn setup() -> (CapabilityRegistry, TranslationsConf) {
        let mut registry = CapabilityRegistry::new();
        registry.register_schema(
            "TextPlugin",
            BlockSchema::new(vec![FieldSpec::new("body", FieldKind::RichText)]),
        );
        registry.register_capability("TextPlugin", RichTextCapability);
        registry.register_schema("LinkPlugin", link_schema());

        let mut conf = TranslationsConf::default();
        conf.types.insert(
            "LinkPlugin".to_owned(),
            TypeConf {
                excluded_fields: vec!["link_url".to_owned()],
                text_field: Some("label".to_owned()),
                ..TypeConf::default()
            },
        );
        (registry, conf)
    }

    fn item(id: ItemId, tree: ContentTree) -> (ItemId, ContentTree) {
        (id, tree)
    }

    #[test]
    fn test_one_group_per_block_in_traversal_order() {
        let (registry, conf) = setup();
        let tree = ContentTree::new(vec![
            Placeholder::new(
                "content",
                vec![
                    ContentBlock::new(1, "TextPlugin").with_field("body", json!("<p>One</p>")),
                    ContentBlock::new(2, "LinkPlugin").with_field("label", json!("Two")),
                ],
            ),
            Placeholder::new(
                "footer",
                vec![ContentBlock::new(3, "TextPlugin").with_field("body", json!("<p>Three</p>"))],
            ),
        ]);

        let groups = flatten(&[item(9, tree)], &registry, &conf).unwrap();
        let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["9:content:1", "9:content:2", "9:footer:3"]);
        assert_eq!(
            groups[1].items,
            vec![GroupItem {
                field: "label".to_owned(),
                content: "Two".to_owned(),
            }]
        );
    }

    #[test]
    fn test_empty_fields_and_empty_blocks_yield_nothing() {
        let (registry, conf) = setup();
        let tree = ContentTree::new(vec![Placeholder::new(
            "content",
            vec![
                ContentBlock::new(1, "TextPlugin").with_field("body", json!("")),
                ContentBlock::new(2, "LinkPlugin")
                    .with_field("label", json!(""))
                    .with_field("link_url", json!("https://example.org")),
                // No translatable fields registered at all
                ContentBlock::new(3, "SpacerPlugin"),
            ],
        )]);

        let groups = flatten(&[item(1, tree)], &registry, &conf).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_excluded_field_not_exported() {
        let (registry, conf) = setup();
        let tree = ContentTree::new(vec![Placeholder::new(
            "content",
            vec![
                ContentBlock::new(1, "LinkPlugin")
                    .with_field("label", json!("Read more"))
                    .with_field("link_url", json!("https://example.org")),
            ],
        )]);

        let groups = flatten(&[item(1, tree)], &registry, &conf).unwrap();
        assert_eq!(groups.len(), 1);
        let fields: Vec<&str> = groups[0].items.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["label"]);
    }

    #[test]
    fn test_inlined_child_gets_no_own_group() {
        let (registry, conf) = setup();
        let tree = ContentTree::new(vec![Placeholder::new(
            "content",
            vec![
                ContentBlock::new(1, "TextPlugin").with_field(
                    "body",
                    json!("<p>Please <cms-plugin id=\"2\"></cms-plugin> now.</p>"),
                ),
                ContentBlock::new(2, "LinkPlugin")
                    .with_parent(1)
                    .with_field("label", json!("CLICK ON LINK1")),
            ],
        )]);

        let groups = flatten(&[item(5, tree)], &registry, &conf).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key.to_string(), "5:content:1");
        assert_eq!(
            groups[0].items[0].content,
            "<p>Please <cms-plugin id=\"2\">CLICK ON LINK1</cms-plugin> now.</p>"
        );
    }

    #[test]
    fn test_content_reduced_to_nothing_is_not_emitted() {
        // The raw value is non-empty but substitution removes the marker for
        // a block that no longer exists, leaving nothing to translate.
        let (registry, conf) = setup();
        let tree = ContentTree::new(vec![Placeholder::new(
            "content",
            vec![
                ContentBlock::new(1, "TextPlugin")
                    .with_field("body", json!("<cms-plugin id=\"404\"></cms-plugin>")),
            ],
        )]);

        let groups = flatten(&[item(1, tree)], &registry, &conf).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_bulk_items_keep_item_order_and_distinct_keys() {
        let (registry, conf) = setup();
        let make_tree = |block_id: BlockId| {
            ContentTree::new(vec![Placeholder::new(
                "content",
                vec![
                    ContentBlock::new(block_id, "TextPlugin").with_field("body", json!("<p>x</p>")),
                ],
            )])
        };

        let items = vec![
            item(1, make_tree(10)),
            item(2, make_tree(20)),
            item(3, make_tree(30)),
        ];
        let groups = flatten(&items, &registry, &conf).unwrap();
        let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["1:content:10", "2:content:20", "3:content:30"]);
    }

    #[test]
    fn test_duplicate_block_id_in_one_slot_is_rejected() {
        let (registry, conf) = setup();
        let tree = ContentTree::new(vec![Placeholder::new(
            "content",
            vec![
                ContentBlock::new(1, "TextPlugin").with_field("body", json!("<p>a</p>")),
                ContentBlock::new(1, "TextPlugin").with_field("body", json!("<p>b</p>")),
            ],
        )]);

        let err = flatten(&[item(1, tree)], &registry, &conf).unwrap_err();
        assert!(matches!(err, TranslationsError::DuplicateGroupKey(_)));
    }

    #[test]
    fn test_invalid_slot_name_is_rejected() {
        let (registry, conf) = setup();
        let tree = ContentTree::new(vec![Placeholder::new(
            "side:bar",
            vec![ContentBlock::new(1, "TextPlugin").with_field("body", json!("<p>a</p>"))],
        )]);

        let err = flatten(&[item(1, tree)], &registry, &conf).unwrap_err();
        assert!(matches!(err, TranslationsError::InvalidSlot(_)));
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let (registry, conf) = setup();
        let tree = ContentTree::new(vec![Placeholder::new(
            "content",
            vec![
                ContentBlock::new(1, "TextPlugin")
                    .with_field("body", json!("<p><cms-plugin id=\"2\"></cms-plugin></p>")),
                ContentBlock::new(2, "LinkPlugin")
                    .with_parent(1)
                    .with_field("label", json!("Click")),
                ContentBlock::new(3, "LinkPlugin").with_field("label", json!("Other")),
            ],
        )]);
        let items = vec![item(1, tree)];

        let first = flatten(&items, &registry, &conf).unwrap();
        let second = flatten(&items, &registry, &conf).unwrap();
        assert_eq!(first, second);
    }
}
