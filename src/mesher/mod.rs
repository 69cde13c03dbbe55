//! Mesh generation from resolved models.
//!
//! Every element becomes one box mesh with six materials, placed by its own
//! model transform.

pub mod element;
pub mod geometry;
pub mod material;

pub use geometry::{BoxGeometry, FaceGroup, Mesh, Vertex};
pub use material::{select_material, Material, TextureSource, ALPHA_TEST};

use crate::resolver::ResolvedModel;
use crate::texture::TextureCache;
use crate::types::Direction;
use glam::Mat4;

/// One element ready for drawing.
#[derive(Debug, Clone)]
pub struct RenderableMesh {
    /// Box geometry centred on the origin, face groups in material order.
    pub geometry: BoxGeometry,
    /// One material per side, in [`Direction::MATERIAL_ORDER`].
    pub materials: [Material; 6],
    /// Placement in the centred model space.
    pub transform: Mat4,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl RenderableMesh {
    pub fn material(&self, direction: Direction) -> &Material {
        &self.materials[direction.material_index()]
    }

    /// Geometry with the model transform applied.
    pub fn world_mesh(&self) -> Mesh {
        self.geometry.mesh.transformed(&self.transform)
    }

    /// Whether any side draws anything.
    pub fn is_visible(&self) -> bool {
        self.materials.iter().any(Material::is_visible)
    }
}

/// Build one renderable mesh per element, in element order.
pub fn build_meshes(model: &ResolvedModel, cache: &TextureCache) -> Vec<RenderableMesh> {
    let meshes: Vec<RenderableMesh> = model
        .elements
        .iter()
        .map(|element| RenderableMesh {
            geometry: element::element_geometry(element),
            materials: Direction::MATERIAL_ORDER
                .map(|direction| select_material(element, direction, model, cache)),
            transform: element::element_transform(element),
            cast_shadow: true,
            receive_shadow: true,
        })
        .collect();

    tracing::debug!("Generated {} meshes", meshes.len());
    meshes
}
