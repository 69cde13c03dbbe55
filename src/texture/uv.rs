//! Face UV derivation.

use crate::types::{Direction, Vec3};

/// UV rectangle `[u1, v1, u2, v2]` in 0-16 texture units.
pub type Uv = [f32; 4];

/// Full-texture UV rectangle.
pub const FULL_UV: Uv = [0.0, 0.0, 16.0, 16.0];

/// Derive the UV rectangle for a face without explicit UVs.
///
/// The rectangle is the projection of the element onto the face plane, with
/// V running downwards from the top of the block.
pub fn default_uv(direction: Direction, from: Vec3, to: Vec3) -> Uv {
    match direction {
        Direction::Up | Direction::Down => [from[0], from[2], to[0], to[2]],
        Direction::North | Direction::South => [from[0], 16.0 - to[1], to[0], 16.0 - from[1]],
        Direction::East | Direction::West => [from[2], 16.0 - to[1], to[2], 16.0 - from[1]],
    }
}

/// The face's own UVs, or the derived ones.
pub fn face_uv(explicit: Option<Uv>, direction: Direction, from: Vec3, to: Vec3) -> Uv {
    explicit.unwrap_or_else(|| default_uv(direction, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cube_uvs() {
        let from = [0.0, 0.0, 0.0];
        let to = [16.0, 16.0, 16.0];
        for direction in Direction::ALL {
            assert_eq!(default_uv(direction, from, to), FULL_UV);
        }
    }

    #[test]
    fn test_partial_element_uvs() {
        // A bottom slab with an inset along z
        let from = [2.0, 0.0, 4.0];
        let to = [14.0, 8.0, 12.0];

        assert_eq!(default_uv(Direction::Up, from, to), [2.0, 4.0, 14.0, 12.0]);
        assert_eq!(default_uv(Direction::Down, from, to), [2.0, 4.0, 14.0, 12.0]);
        assert_eq!(default_uv(Direction::North, from, to), [2.0, 8.0, 14.0, 16.0]);
        assert_eq!(default_uv(Direction::East, from, to), [4.0, 8.0, 12.0, 16.0]);
    }

    #[test]
    fn test_explicit_uv_wins() {
        let uv = [16.0, 0.0, 0.0, 16.0];
        assert_eq!(
            face_uv(Some(uv), Direction::Up, [0.0; 3], [8.0; 3]),
            uv
        );
        assert_eq!(
            face_uv(None, Direction::Up, [0.0; 3], [8.0; 3]),
            [0.0, 0.0, 8.0, 8.0]
        );
    }
}
