//! Mesh geometry types.

use crate::types::Direction;
use glam::{Mat4, Vec3};

/// A vertex in the output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space.
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates, V pointing down the image.
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
        }
    }
}

/// A triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Scale every position uniformly about the origin.
    pub fn scale(&mut self, factor: f32) {
        for vertex in &mut self.vertices {
            for c in &mut vertex.position {
                *c *= factor;
            }
        }
    }

    /// Copy of this mesh with positions and normals transformed by `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Mesh {
        let normal_matrix = matrix.inverse().transpose();
        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let position = matrix.transform_point3(Vec3::from(v.position));
                let normal = normal_matrix
                    .transform_vector3(Vec3::from(v.normal))
                    .normalize_or_zero();
                Vertex::new(position.to_array(), normal.to_array(), v.uv)
            })
            .collect();

        Mesh {
            vertices,
            indices: self.indices.clone(),
        }
    }
}

/// A run of indices drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceGroup {
    /// First index in the index buffer.
    pub start: usize,
    /// Number of indices.
    pub count: usize,
    /// Slot in the element's material array.
    pub material_index: usize,
}

/// One side of a box: which axes span it, their directions, its size and
/// its offset along the normal axis.
struct Plane {
    axes: [usize; 3],
    dirs: [f32; 2],
    size: [f32; 2],
    offset: f32,
}

impl Plane {
    fn new(axes: [usize; 3], dirs: [f32; 2], size: [f32; 2], offset: f32) -> Self {
        Self {
            axes,
            dirs,
            size,
            offset,
        }
    }
}

/// An axis-aligned box centred on the origin, one face group per side.
///
/// Groups follow [`Direction::MATERIAL_ORDER`], so group `i` is drawn with
/// material `i`. Each side is one quad whose UVs span the whole face, with
/// (0, 0) at the top-left as seen from outside.
#[derive(Debug, Clone, Default)]
pub struct BoxGeometry {
    pub mesh: Mesh,
    pub groups: Vec<FaceGroup>,
}

impl BoxGeometry {
    pub fn new(size: [f32; 3]) -> Self {
        let [width, height, depth] = size;
        let mut geometry = Self::default();

        for (material_index, direction) in Direction::MATERIAL_ORDER.iter().enumerate() {
            let start = geometry.mesh.indices.len();
            let plane = match direction {
                Direction::East => Plane::new([2, 1, 0], [-1.0, -1.0], [depth, height], width / 2.0),
                Direction::West => Plane::new([2, 1, 0], [1.0, -1.0], [depth, height], -width / 2.0),
                Direction::Up => Plane::new([0, 2, 1], [1.0, 1.0], [width, depth], height / 2.0),
                Direction::Down => Plane::new([0, 2, 1], [1.0, -1.0], [width, depth], -height / 2.0),
                Direction::South => Plane::new([0, 1, 2], [1.0, -1.0], [width, height], depth / 2.0),
                Direction::North => Plane::new([0, 1, 2], [-1.0, -1.0], [width, height], -depth / 2.0),
            };
            geometry.push_plane(plane, direction.normal());
            geometry.groups.push(FaceGroup {
                start,
                count: geometry.mesh.indices.len() - start,
                material_index,
            });
        }

        geometry
    }

    fn push_plane(&mut self, plane: Plane, normal: [f32; 3]) {
        let [u, v, w] = plane.axes;
        let [face_width, face_height] = plane.size;
        let base = self.mesh.vertices.len() as u32;
        for iy in 0..2 {
            for ix in 0..2 {
                let mut position = [0.0; 3];
                position[u] = (ix as f32 * face_width - face_width / 2.0) * plane.dirs[0];
                position[v] = (iy as f32 * face_height - face_height / 2.0) * plane.dirs[1];
                position[w] = plane.offset;
                self.mesh
                    .add_vertex(Vertex::new(position, normal, [ix as f32, iy as f32]));
            }
        }

        // Corners: 0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right
        self.mesh.add_triangle(base, base + 2, base + 1);
        self.mesh.add_triangle(base + 2, base + 3, base + 1);
    }

    /// Inflate the box uniformly (used to keep touching cuboids from z-fighting).
    pub fn inflate(&mut self, factor: f32) {
        self.mesh.scale(factor);
    }

    /// The group drawn for `direction`.
    pub fn group(&self, direction: Direction) -> Option<&FaceGroup> {
        self.groups.get(direction.material_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mut mesh = Mesh::new();
        assert!(mesh.is_empty());

        let v0 = mesh.add_vertex(Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]));
        let v1 = mesh.add_vertex(Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]));
        let v2 = mesh.add_vertex(Vertex::new([1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0]));

        mesh.add_triangle(v0, v1, v2);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_box_groups_follow_material_order() {
        let geometry = BoxGeometry::new([16.0, 16.0, 16.0]);
        assert_eq!(geometry.mesh.vertex_count(), 24);
        assert_eq!(geometry.mesh.triangle_count(), 12);
        assert_eq!(geometry.groups.len(), 6);

        for (i, direction) in Direction::MATERIAL_ORDER.iter().enumerate() {
            let group = geometry.group(*direction).unwrap();
            assert_eq!(group.material_index, i);
            assert_eq!(group.start, i * 6);
            assert_eq!(group.count, 6);

            // All four corners sit on the face plane
            let normal = direction.normal();
            for vertex in &geometry.mesh.vertices[i * 4..i * 4 + 4] {
                assert_eq!(vertex.normal, normal);
                let along: f32 = (0..3).map(|k| vertex.position[k] * normal[k]).sum();
                assert!((along - 8.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_box_winding_faces_outward() {
        let geometry = BoxGeometry::new([2.0, 4.0, 6.0]);
        for tri in geometry.mesh.indices.chunks(3) {
            let a = Vec3::from(geometry.mesh.vertices[tri[0] as usize].position);
            let b = Vec3::from(geometry.mesh.vertices[tri[1] as usize].position);
            let c = Vec3::from(geometry.mesh.vertices[tri[2] as usize].position);
            let normal = Vec3::from(geometry.mesh.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_top_left_uv_is_up_on_side_faces() {
        let geometry = BoxGeometry::new([16.0, 16.0, 16.0]);
        let south = geometry.group(Direction::South).unwrap().material_index;
        let top_left = geometry.mesh.vertices[south * 4];
        assert_eq!(top_left.uv, [0.0, 0.0]);
        assert_eq!(top_left.position, [-8.0, 8.0, 8.0]);
    }

    #[test]
    fn test_inflate_and_transform() {
        let mut geometry = BoxGeometry::new([1.0, 1.0, 1.0]);
        geometry.inflate(2.0);
        let moved = geometry
            .mesh
            .transformed(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        let xs: Vec<f32> = moved.vertices.iter().map(|v| v.position[0]).collect();
        let min = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!((min - 9.0).abs() < 1e-6);
        assert!((max - 11.0).abs() < 1e-6);
        assert_eq!(moved.vertices[0].normal, geometry.mesh.vertices[0].normal);
    }
}
