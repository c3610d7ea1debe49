//! Rotation and interpolation helpers shared across the pipeline.
use nalgebra::{Point3, Vector3};

/// Rotate a point about the vertical (y) axis.
pub fn rotate_y(v: &Point3<f32>, radians: f32) -> Point3<f32> {
    let (sin, cos) = radians.sin_cos();
    Point3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

/// Rotate a point about the horizontal (x) axis.
pub fn rotate_x(v: &Point3<f32>, radians: f32) -> Point3<f32> {
    let (sin, cos) = radians.sin_cos();
    Point3::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos)
}

/// Normalize a vector, returning the zero vector when the magnitude is ~0.
pub fn safe_normalize(v: &Vector3<f32>) -> Vector3<f32> {
    let mag = v.norm();
    if mag > 1e-7 {
        v / mag
    } else {
        Vector3::zeros()
    }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap an angle into [0, 2π).
pub fn wrap_angle(radians: f32) -> f32 {
    radians.rem_euclid(std::f32::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_rotate_y_quarter_turn() {
        let v = Point3::new(1.0, 2.0, 0.0);
        let r = rotate_y(&v, FRAC_PI_2);
        assert!((r.x - 0.0).abs() < 1e-6);
        assert!((r.y - 2.0).abs() < 1e-6);
        assert!((r.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_x_quarter_turn() {
        let v = Point3::new(2.0, 1.0, 0.0);
        let r = rotate_x(&v, FRAC_PI_2);
        assert!((r.x - 2.0).abs() < 1e-6);
        assert!((r.y - 0.0).abs() < 1e-6);
        assert!((r.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_safe_normalize_zero_vector() {
        let n = safe_normalize(&Vector3::zeros());
        assert_eq!(n, Vector3::zeros());
    }

    #[test]
    fn test_safe_normalize_unit_length() {
        let n = safe_normalize(&Vector3::new(3.0, 4.0, 0.0));
        assert!((n.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(1.0, 5.0, 0.0), 1.0);
        assert_eq!(lerp(1.0, 5.0, 1.0), 5.0);
        assert_eq!(lerp(1.0, 5.0, 0.5), 3.0);
    }

    #[test]
    fn test_wrap_angle_periodic() {
        assert!((wrap_angle(TAU + PI) - PI).abs() < 1e-6);
        assert!(wrap_angle(-FRAC_PI_2) >= 0.0);
        assert!(wrap_angle(-FRAC_PI_2) < TAU);
    }
}
