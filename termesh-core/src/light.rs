//! Single directional light source.
use nalgebra::Vector3;

use crate::math::safe_normalize;

/// Direction light travels, as a unit vector. Whether it stays fixed in
/// world space or follows the camera orbit is a render option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub direction: Vector3<f32>,
}

impl Light {
    pub fn new(direction: Vector3<f32>) -> Self {
        Self {
            direction: safe_normalize(&direction),
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        // overhead, slightly right of and behind the viewer
        Self::new(Vector3::new(0.75, -1.0, -0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_normalized() {
        let light = Light::new(Vector3::new(0.0, -10.0, 0.0));
        assert!((light.direction.norm() - 1.0).abs() < 1e-6);
        assert_eq!(light.direction, Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_default_is_unit_length() {
        assert!((Light::default().direction.norm() - 1.0).abs() < 1e-6);
    }
}
