//! Model inheritance and texture reference resolution.

pub mod model_resolver;
pub mod texture_ref;

pub use model_resolver::ModelResolver;
pub use texture_ref::{decode_texture_ref, placeholder_for, texture_path};

use crate::resource_pack::{ModelElement, RawModel};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// A model with its whole parent chain merged in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedModel {
    /// Ambient occlusion flag from the nearest model in the chain that sets it.
    #[serde(rename = "ambientocclusion", skip_serializing_if = "Option::is_none")]
    pub ambient_occlusion: Option<bool>,
    /// Texture slots from the whole chain; nearer models win.
    pub textures: HashMap<String, String>,
    /// Elements from the nearest model that defines any.
    pub elements: Vec<ModelElement>,
    /// Ancestor ids that were merged, nearest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

impl ResolvedModel {
    /// Merge a child document over an already resolved parent.
    ///
    /// Ambient occlusion falls back to the parent, textures are a shallow
    /// overlay and a non-empty child element list replaces the parent's.
    pub fn merge(child: &RawModel, parent: ResolvedModel) -> Self {
        let mut textures = parent.textures;
        for (key, value) in &child.textures {
            textures.insert(key.clone(), value.clone());
        }

        let elements = if child.has_elements() {
            child.elements.clone().unwrap_or_default()
        } else {
            parent.elements
        };

        Self {
            ambient_occlusion: child.ambient_occlusion.or(parent.ambient_occlusion),
            textures,
            elements,
            parents: parent.parents,
        }
    }

    /// Concrete texture paths the slots name, without namespaces.
    /// Unresolved `#slot` values are skipped.
    pub fn texture_paths(&self) -> BTreeSet<&str> {
        self.textures
            .values()
            .filter(|reference| !reference.starts_with('#'))
            .map(|reference| texture_path(reference))
            .collect()
    }

    /// Pretty-printed JSON view of the model, for debugging.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<RawModel> for ResolvedModel {
    /// A parentless model resolves to itself.
    fn from(model: RawModel) -> Self {
        Self {
            ambient_occlusion: model.ambient_occlusion,
            textures: model.textures,
            elements: model.elements.unwrap_or_default(),
            parents: Vec::new(),
        }
    }
}
