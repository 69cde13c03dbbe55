//! 3-component vector helpers for placing elements.

/// A point or extent in model space.
pub type Vec3 = [f32; 3];

/// Offset between the 0-16 model space and the centred render space.
pub const MODEL_CENTER: f32 = 8.0;

/// Extent of the box spanned by two corners (`to - from`).
pub fn size(from: Vec3, to: Vec3) -> Vec3 {
    sub(to, from)
}

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn mul(v: Vec3, f: f32) -> Vec3 {
    [v[0] * f, v[1] * f, v[2] * f]
}

pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    mul(add(a, b), 0.5)
}

/// Shift a 0-16 model coordinate so that 8 becomes the origin.
pub fn centered(v: Vec3) -> Vec3 {
    sub(v, [MODEL_CENTER; 3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_midpoint() {
        let from = [2.0, 0.0, 4.0];
        let to = [14.0, 8.0, 12.0];
        assert_eq!(size(from, to), [12.0, 8.0, 8.0]);
        assert_eq!(midpoint(from, to), [8.0, 4.0, 8.0]);
        assert_eq!(centered(midpoint(from, to)), [0.0, -4.0, 0.0]);
    }

    #[test]
    fn test_zero_size_element() {
        let corner = [5.0, 16.0, 5.0];
        assert_eq!(size(corner, corner), [0.0; 3]);
        assert_eq!(midpoint(corner, corner), corner);
    }
}
