//! Element placement: box geometry and the element's model transform.

use crate::mesher::geometry::BoxGeometry;
use crate::resource_pack::ModelElement;
use crate::types::{Axis, ElementRotation};
use glam::{Mat4, Vec3};

/// Uniform growth applied to every box so touching cuboids don't z-fight.
pub const INFLATE: f32 = 1.001;

/// Box geometry for an element, sized `to - from`, centred on the origin.
pub fn element_geometry(element: &ModelElement) -> BoxGeometry {
    let mut geometry = BoxGeometry::new(element.size());
    geometry.inflate(INFLATE);
    geometry
}

/// Model transform of an element in the centred render space.
///
/// The box is moved to the element centre (0-16 space shifted by -8). With a
/// rotation, the centre is rotated about the pivot and the box itself is
/// rotated and optionally rescaled in its local frame.
pub fn element_transform(element: &ModelElement) -> Mat4 {
    let center = Vec3::from(element.centered_center());

    let Some(rotation) = &element.rotation else {
        return Mat4::from_translation(center);
    };

    let pivot = Vec3::from(rotation.centered_origin());
    Mat4::from_translation(pivot)
        * rotation_matrix(rotation)
        * Mat4::from_translation(center - pivot)
        * Mat4::from_scale(Vec3::from(rotation.rescale_vector()))
}

/// Single-axis rotation matrix for an element rotation.
pub fn rotation_matrix(rotation: &ElementRotation) -> Mat4 {
    let angle = rotation.angle_radians();
    match rotation.axis {
        Axis::X => Mat4::from_rotation_x(angle),
        Axis::Y => Mat4::from_rotation_y(angle),
        Axis::Z => Mat4::from_rotation_z(angle),
    }
}
