//! Model document parsing.
//!
//! Models define geometry using cuboid elements and name the textures those
//! elements reference through `#slot` indirections.

use crate::types::{strip_namespace, vector, Direction, ElementRotation, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A parsed model document from models/*.json, before parent resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawModel {
    /// Parent model to inherit from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Whether to use ambient occlusion.
    #[serde(
        default,
        rename = "ambientocclusion",
        skip_serializing_if = "Option::is_none"
    )]
    pub ambient_occlusion: Option<bool>,

    /// Texture variable definitions.
    #[serde(default)]
    pub textures: HashMap<String, String>,

    /// Model elements (cuboids). `None` when the document has no list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ModelElement>>,
}

impl RawModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model from JSON text.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// Parent id with the default namespace removed.
    pub fn parent_path(&self) -> Option<&str> {
        self.parent.as_deref().map(strip_namespace)
    }

    /// Check if this model defines a non-empty element list of its own.
    pub fn has_elements(&self) -> bool {
        self.elements.as_ref().map(|e| !e.is_empty()).unwrap_or(false)
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelElement {
    /// Minimum corner (0-16 range).
    pub from: [f32; 3],
    /// Maximum corner (0-16 range).
    pub to: [f32; 3],
    /// Optional rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<ElementRotation>,
    /// Whether this element is lit.
    #[serde(default = "default_shade")]
    pub shade: bool,
    /// Face definitions.
    #[serde(default)]
    pub faces: HashMap<Direction, ModelFace>,
}

fn default_shade() -> bool {
    true
}

impl ModelElement {
    /// Create an element spanning `from`..`to` with no faces.
    pub fn new(from: Vec3, to: Vec3) -> Self {
        Self {
            from,
            to,
            rotation: None,
            shade: true,
            faces: HashMap::new(),
        }
    }

    /// Add a face for `direction`.
    pub fn with_face(mut self, direction: Direction, face: ModelFace) -> Self {
        self.faces.insert(direction, face);
        self
    }

    /// Get the size of this element in model coordinates (0-16).
    pub fn size(&self) -> Vec3 {
        vector::size(self.from, self.to)
    }

    /// Get the center of this element in model coordinates.
    pub fn center(&self) -> Vec3 {
        vector::midpoint(self.from, self.to)
    }

    /// Center shifted into the render space where 8 is the origin.
    pub fn centered_center(&self) -> Vec3 {
        vector::centered(self.center())
    }

    pub fn face(&self, direction: Direction) -> Option<&ModelFace> {
        self.faces.get(&direction)
    }
}

/// A face of a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range. Corner order encodes flips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<[f32; 4]>,
    /// Texture reference (e.g., "#side" or "block/stone").
    pub texture: String,
    /// Face direction for culling against neighbours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cullface: Option<Direction>,
    /// Texture rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Tint index for biome coloring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tintindex: Option<i32>,
}

impl ModelFace {
    /// A face referencing `texture` with derived UVs and no rotation.
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            uv: None,
            texture: texture.into(),
            cullface: None,
            rotation: 0.0,
            tintindex: None,
        }
    }

    pub fn with_uv(mut self, uv: [f32; 4]) -> Self {
        self.uv = Some(uv);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Check if this face has a tint.
    pub fn has_tint(&self) -> bool {
        self.tintindex.map(|t| t >= 0).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Axis;

    #[test]
    fn test_parse_simple_model() {
        let json = r#"{
            "parent": "minecraft:block/cube_all",
            "textures": {
                "all": "block/stone"
            }
        }"#;

        let model = RawModel::from_json(json).unwrap();
        assert_eq!(model.parent.as_deref(), Some("minecraft:block/cube_all"));
        assert_eq!(model.parent_path(), Some("block/cube_all"));
        assert_eq!(model.textures.get("all"), Some(&"block/stone".to_string()));
        assert!(model.elements.is_none());
        assert!(model.ambient_occlusion.is_none());
        assert!(!model.has_elements());
    }

    #[test]
    fn test_parse_model_with_elements() {
        let json = r##"{
            "ambientocclusion": false,
            "textures": {
                "texture": "block/stone"
            },
            "elements": [
                {
                    "from": [0, 0, 0],
                    "to": [16, 16, 16],
                    "shade": false,
                    "faces": {
                        "down":  { "texture": "#texture", "cullface": "down" },
                        "up":    { "texture": "#texture", "uv": [16, 0, 0, 16], "rotation": 90 },
                        "north": { "texture": "#texture", "tintindex": 0 }
                    }
                }
            ]
        }"##;

        let model = RawModel::from_json(json).unwrap();
        assert_eq!(model.ambient_occlusion, Some(false));
        let elements = model.elements.as_ref().unwrap();
        assert_eq!(elements.len(), 1);

        let element = &elements[0];
        assert_eq!(element.from, [0.0, 0.0, 0.0]);
        assert_eq!(element.to, [16.0, 16.0, 16.0]);
        assert!(!element.shade);
        assert_eq!(element.faces.len(), 3);
        assert_eq!(
            element.face(Direction::Down).unwrap().cullface,
            Some(Direction::Down)
        );
        let up = element.face(Direction::Up).unwrap();
        assert_eq!(up.uv, Some([16.0, 0.0, 0.0, 16.0]));
        assert_eq!(up.rotation, 90.0);
        assert!(element.face(Direction::North).unwrap().has_tint());
        assert!(element.face(Direction::East).is_none());
    }

    #[test]
    fn test_parse_element_with_rotation() {
        let json = r#"{
            "from": [0, 0, 8],
            "to": [16, 16, 8],
            "rotation": {
                "origin": [8, 8, 8],
                "axis": "y",
                "angle": 45,
                "rescale": true
            },
            "faces": {}
        }"#;

        let element: ModelElement = serde_json::from_str(json).unwrap();
        assert!(element.shade);
        assert_eq!(element.size(), [16.0, 16.0, 0.0]);
        let rotation = element.rotation.unwrap();
        assert_eq!(rotation.axis, Axis::Y);
        assert_eq!(rotation.angle, 45.0);
        assert!(rotation.rescale);
    }

    #[test]
    fn test_element_center() {
        let element = ModelElement::new([0.0, 0.0, 0.0], [16.0, 8.0, 16.0]);
        assert_eq!(element.center(), [8.0, 4.0, 8.0]);
        assert_eq!(element.centered_center(), [0.0, -4.0, 0.0]);
    }
}
