//! Texture slot indirection (`#slot` references).

use crate::error::{ExporterError, Result};
use crate::types::strip_namespace;
use std::collections::{HashMap, HashSet};

/// Slot name that gets the tinted placeholder when it cannot be resolved.
pub const CONTENT_SLOT: &str = "#content";

/// Placeholder colour for an unresolved `#content` slot.
pub const CONTENT_PLACEHOLDER_COLOR: u32 = 0x3f76e4;

/// Opacity of the `#content` placeholder.
pub const CONTENT_PLACEHOLDER_OPACITY: f32 = 0.8;

/// Placeholder colour for any other unresolved texture.
pub const MISSING_TEXTURE_COLOR: u32 = 0x999999;

/// Follow `#slot` indirections until a concrete texture path is reached.
///
/// References without a leading `#` are returned unchanged. A slot missing
/// from `textures` yields `Ok(None)`; a slot chain that loops back on itself
/// is an error.
pub fn decode_texture_ref(
    reference: &str,
    textures: &HashMap<String, String>,
) -> Result<Option<String>> {
    let mut current = reference;
    let mut chain = vec![reference.to_string()];
    let mut visited = HashSet::new();

    while let Some(slot) = current.strip_prefix('#') {
        if !visited.insert(slot) {
            return Err(ExporterError::CyclicReference(chain));
        }

        match textures.get(slot) {
            Some(next) => {
                chain.push(next.clone());
                current = next;
            }
            None => return Ok(None),
        }
    }

    Ok(Some(current.to_string()))
}

/// Lookup key for a concrete texture reference.
pub fn texture_path(reference: &str) -> &str {
    strip_namespace(reference)
}

/// Placeholder colour and opacity for a face reference that did not resolve.
pub fn placeholder_for(reference: &str) -> (u32, f32) {
    if reference == CONTENT_SLOT {
        (CONTENT_PLACEHOLDER_COLOR, CONTENT_PLACEHOLDER_OPACITY)
    } else {
        (MISSING_TEXTURE_COLOR, 1.0)
    }
}
