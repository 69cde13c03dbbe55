//! Face directions and rotation axes.

use serde::{Deserialize, Serialize};

/// The six face directions of a model element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Directions in model document order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Material slot order of a box: +X, -X, +Y, -Y, +Z, -Z.
    ///
    /// Box geometry face groups are emitted in this order, so material `i`
    /// of an element always belongs to `MATERIAL_ORDER[i]`.
    pub const MATERIAL_ORDER: [Direction; 6] = [
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::South,
        Direction::North,
    ];

    /// Index of this direction in [`Direction::MATERIAL_ORDER`].
    pub fn material_index(&self) -> usize {
        match self {
            Direction::East => 0,
            Direction::West => 1,
            Direction::Up => 2,
            Direction::Down => 3,
            Direction::South => 4,
            Direction::North => 5,
        }
    }

    /// Outward unit normal of a face pointing this way.
    pub fn normal(&self) -> [f32; 3] {
        match self {
            Direction::Down => [0.0, -1.0, 0.0],
            Direction::Up => [0.0, 1.0, 0.0],
            Direction::North => [0.0, 0.0, -1.0],
            Direction::South => [0.0, 0.0, 1.0],
            Direction::West => [-1.0, 0.0, 0.0],
            Direction::East => [1.0, 0.0, 0.0],
        }
    }

    /// Key used for this face in model JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis of an element rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_order_matches_box_convention() {
        assert_eq!(
            Direction::MATERIAL_ORDER,
            [
                Direction::East,
                Direction::West,
                Direction::Up,
                Direction::Down,
                Direction::South,
                Direction::North,
            ]
        );
        for (i, direction) in Direction::MATERIAL_ORDER.iter().enumerate() {
            assert_eq!(direction.material_index(), i);
        }
    }

    #[test]
    fn test_json_keys() {
        let parsed: Direction = serde_json::from_str("\"north\"").unwrap();
        assert_eq!(parsed, Direction::North);
        assert_eq!(parsed.to_string(), "north");

        let axis: Axis = serde_json::from_str("\"y\"").unwrap();
        assert_eq!(axis, Axis::Y);
    }

    #[test]
    fn test_normals_are_unit() {
        for direction in Direction::ALL {
            let [x, y, z] = direction.normal();
            assert_eq!(x * x + y * y + z * z, 1.0);
        }
    }
}
