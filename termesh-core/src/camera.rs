//! Orbital camera state and its incremental controls.
use std::f32::consts::PI;

use crate::math::wrap_angle;

/// Orbit step applied per key press, 5 degrees.
pub const ANGLE_STEP: f32 = PI / 36.0;
/// Altitude clamp, strictly inside ±90° so the up-vector never degenerates
/// at the poles.
pub const ALTITUDE_MAX: f32 = 89.0 * PI / 180.0;
/// Zoom bounds; the minimum is strictly positive so the viewpoint can never
/// collapse onto the object.
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 10.0;
/// Zoom step applied per key press.
pub const ZOOM_STEP: f32 = 0.1;
/// Default zoom: the normalized model at its reference size.
pub const ZOOM_DEFAULT: f32 = 1.0;

/// An orbital viewpoint: two orbit angles and a zoom factor, always facing
/// the origin. Mutated only through the control methods below; the renderer
/// reads the fields to derive the per-frame transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Horizontal orbit angle in radians, periodic in [0, 2π).
    pub azimuth: f32,
    /// Vertical orbit angle in radians, clamped to ±[`ALTITUDE_MAX`].
    pub altitude: f32,
    /// View scale factor, clamped to [[`ZOOM_MIN`], [`ZOOM_MAX`]].
    pub zoom: f32,
}

impl Camera {
    pub fn new(zoom: f32) -> Self {
        Self {
            azimuth: 0.0,
            altitude: 0.0,
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
        }
    }

    pub fn rotate_left(&mut self) {
        self.rotate_left_by(ANGLE_STEP);
    }

    pub fn rotate_right(&mut self) {
        self.rotate_left_by(-ANGLE_STEP);
    }

    /// Orbit horizontally by an arbitrary angle; used for animation rates.
    pub fn rotate_left_by(&mut self, radians: f32) {
        self.azimuth = wrap_angle(self.azimuth + radians);
    }

    pub fn rotate_up(&mut self) {
        self.altitude = (self.altitude + ANGLE_STEP).min(ALTITUDE_MAX);
    }

    pub fn rotate_down(&mut self) {
        self.altitude = (self.altitude - ANGLE_STEP).max(-ALTITUDE_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(ZOOM_MIN);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(ZOOM_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_azimuth_wraps() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.rotate_left();
        }
        assert!(camera.azimuth >= 0.0);
        assert!(camera.azimuth < TAU);
    }

    #[test]
    fn test_altitude_never_reaches_pole() {
        let mut camera = Camera::default();
        for _ in 0..1000 {
            camera.rotate_up();
        }
        assert!(camera.altitude < FRAC_PI_2);
        assert!((camera.altitude - ALTITUDE_MAX).abs() < 1e-6);

        for _ in 0..2000 {
            camera.rotate_down();
        }
        assert!(camera.altitude > -FRAC_PI_2);
    }

    #[test]
    fn test_zoom_out_clamped_to_minimum() {
        let mut camera = Camera::default();
        for _ in 0..1000 {
            camera.zoom_out();
        }
        assert!(camera.zoom >= ZOOM_MIN);
    }

    #[test]
    fn test_zoom_in_clamped_to_maximum() {
        let mut camera = Camera::new(ZOOM_MAX);
        camera.zoom_in();
        assert!(camera.zoom <= ZOOM_MAX);
    }

    #[test]
    fn test_new_clamps_initial_zoom() {
        assert_eq!(Camera::new(0.0).zoom, ZOOM_MIN);
        assert_eq!(Camera::new(1000.0).zoom, ZOOM_MAX);
    }
}
