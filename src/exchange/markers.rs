//! Inline marker handling for rich-text fields.
//!
//! Rich-text block content embeds child blocks through marker tags that
//! reference the child by id:
//!
//! ```text
//! <p>Please <cms-plugin title="Link" id="4"></cms-plugin> to continue.</p>
//! ```
//!
//! Before export the marker body is filled with the child's own text so the
//! translator sees one coherent sentence. After translation the marker body
//! carries the translated child text, which is extracted again and written
//! back into the child block. Markers whose child no longer exists are
//! dropped from the exported text instead of failing the export.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::content::BlockId;
use crate::exchange::capability::TreeContext;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(<cms-plugin\b[^>]*\bid="(\d+)"[^>]*>)(.*?)(</cms-plugin>)"#).unwrap()
});

/// Fill marker bodies with the referenced children's text.
///
/// Returns the substituted content and the ids of the children whose text
/// was embedded, deduplicated in first-occurrence order. A marker referencing
/// a missing child is removed entirely; a marker whose child has no
/// configured text field is left untouched and the child is not claimed, so
/// it still gets its own group.
pub fn inject_children(raw: &str, ctx: &TreeContext<'_>) -> (String, Vec<BlockId>) {
    let mut refs: Vec<BlockId> = Vec::new();

    let substituted = MARKER_RE.replace_all(raw, |caps: &regex::Captures<'_>| {
        let Ok(id) = caps[2].parse::<BlockId>() else {
            return String::new();
        };
        if ctx.block(id).is_none() {
            tracing::debug!(child = id, "dropping marker for missing block");
            return String::new();
        }
        match ctx.inline_text(id) {
            Some(text) => {
                if !refs.contains(&id) {
                    refs.push(id);
                }
                format!("{}{}{}", &caps[1], text, &caps[4])
            }
            // No text field configured for the child's type: keep the marker
            // as stored and let the child be exported on its own.
            None => caps[0].to_owned(),
        }
    });

    (substituted.into_owned(), refs)
}

/// Extract the translated text carried by each marker body.
pub fn extract_children(content: &str) -> HashMap<BlockId, String> {
    let mut children = HashMap::new();
    for caps in MARKER_RE.captures_iter(content) {
        if let Ok(id) = caps[2].parse::<BlockId>() {
            children.insert(id, caps[3].to_owned());
        }
    }
    children
}
