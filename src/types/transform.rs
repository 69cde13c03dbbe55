//! Element rotation.

use super::Axis;
use serde::{Deserialize, Serialize};

/// Element-level rotation from a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRotation {
    /// Origin point for rotation (in 0-16 model coordinates).
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees.
    pub angle: f32,
    /// Whether to stretch the element across the rotated span.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}

impl ElementRotation {
    /// Rotation origin in centred coordinates (0-16 shifted by -8).
    pub fn centered_origin(&self) -> [f32; 3] {
        super::vector::centered(self.origin)
    }

    /// Get the angle in radians.
    pub fn angle_radians(&self) -> f32 {
        self.angle.to_radians()
    }

    /// Scale applied to the two axes perpendicular to the rotation axis.
    ///
    /// `1 + (1 / (cos(angle) - 1)) / 1.5`, or 1 when `rescale` is off or the
    /// angle is zero (where the formula divides by zero).
    pub fn rescale_factor(&self) -> f32 {
        if !self.rescale {
            return 1.0;
        }
        let cos_minus_one = self.angle_radians().cos() - 1.0;
        if cos_minus_one == 0.0 {
            return 1.0;
        }
        1.0 + (1.0 / cos_minus_one) / 1.5
    }

    /// Per-axis scale vector for the rescale step.
    pub fn rescale_vector(&self) -> [f32; 3] {
        let factor = self.rescale_factor();
        match self.axis {
            Axis::X => [1.0, factor, factor],
            Axis::Y => [factor, 1.0, factor],
            Axis::Z => [factor, factor, 1.0],
        }
    }
}
