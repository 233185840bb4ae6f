//! The import merger.
//!
//! Takes the translated groups coming back from a provider and writes their
//! text into a reconstructed copy of the export snapshot. Blocks are located
//! by their structured group key, never by re-walking the tree, and the
//! output preserves original tree order regardless of the order groups
//! arrived in.
//!
//! Unknown group keys abort the whole merge. The surrounding lifecycle
//! archives the raw provider response before this code runs, so aborting
//! loses nothing, while skipping could publish a half-translated page.

use std::collections::{HashMap, HashSet};

use crate::config::TranslationsConf;
use crate::content::{BlockId, ContentTree, ItemId};
use crate::error::{Result, TranslationsError};
use crate::exchange::capability::CapabilityRegistry;
use crate::exchange::export::TranslationGroup;

/// Merge translated groups into mutable copies of the snapshot trees.
///
/// Returns the reconstructed trees in snapshot order, ready for the
/// content-writing layer. The consumed-id set lives and dies with this call.
pub fn merge(
    snapshot: &[(ItemId, ContentTree)],
    groups: &[TranslationGroup],
    registry: &CapabilityRegistry,
    conf: &TranslationsConf,
) -> Result<Vec<(ItemId, ContentTree)>> {
    let mut trees: Vec<(ItemId, ContentTree)> = snapshot.to_vec();

    // Position indexes into `trees`, keyed once over the immutable snapshot.
    let mut by_key: HashMap<(ItemId, &str, BlockId), (usize, usize, usize)> = HashMap::new();
    let mut by_block: HashMap<(ItemId, BlockId), (usize, usize, usize)> = HashMap::new();
    for (tree_idx, (item_id, tree)) in snapshot.iter().enumerate() {
        for (slot_idx, placeholder) in tree.placeholders.iter().enumerate() {
            for (block_idx, block) in placeholder.blocks.iter().enumerate() {
                let position = (tree_idx, slot_idx, block_idx);
                by_key.insert((*item_id, placeholder.slot.as_str(), block.id), position);
                by_block.insert((*item_id, block.id), position);
            }
        }
    }

    let mut consumed: HashSet<BlockId> = HashSet::new();

    for group in groups {
        if consumed.contains(&group.key.block) {
            tracing::debug!(
                key = %group.key,
                "group for an already inline-consumed block, ignoring"
            );
            continue;
        }

        let &(tree_idx, slot_idx, block_idx) = by_key
            .get(&(group.key.item, group.key.slot.as_str(), group.key.block))
            .ok_or_else(|| TranslationsError::UnknownGroup(group.key.clone()))?;

        for item in &group.items {
            let substitutions = {
                let block = &trees[tree_idx].1.placeholders[slot_idx].blocks[block_idx];
                registry
                    .capability(&block.plugin_type)
                    .import_content(&item.content, block)
            };

            trees[tree_idx].1.placeholders[slot_idx].blocks[block_idx]
                .set_text(&item.field, item.content.clone());

            for (child_id, text) in substitutions {
                let Some(&(ct, cs, cb)) = by_block.get(&(group.key.item, child_id)) else {
                    tracing::debug!(
                        child = child_id,
                        "inline target missing from snapshot, dropping substitution"
                    );
                    continue;
                };
                let child = &mut trees[ct].1.placeholders[cs].blocks[cb];
                let Some(field) = conf.text_field(&child.plugin_type) else {
                    tracing::debug!(
                        child = child_id,
                        plugin_type = %child.plugin_type,
                        "no text field configured for inline target, dropping substitution"
                    );
                    continue;
                };
                child.set_text(field, text);
                consumed.insert(child_id);
            }
        }
    }

    Ok(trees)
}
