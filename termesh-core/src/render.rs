//! Per-frame pipeline: transform into camera space, cull, shade, project,
//! rasterize.
use nalgebra::Point3;

use crate::buffer::{Buffer, Projection};
use crate::camera::Camera;
use crate::geometry::Mesh;
use crate::light::Light;
use crate::math::{rotate_x, rotate_y, safe_normalize};

/// Luminance ramp ordered sparse to dense; full intensity selects the last
/// glyph.
const LUMINANCE_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Keep the light fixed in world space instead of locking it to the
    /// camera orbit.
    pub static_light: bool,
    /// Attach material indices to drawn cells for color lookup.
    pub color: bool,
}

/// Draw every face of the mesh into the buffer under the current camera and
/// light. Faces are independent: the buffer's depth test is the only
/// compositing rule, so submission order does not affect the result.
pub fn render(
    buffer: &mut Buffer,
    mesh: &Mesh,
    camera: &Camera,
    light: &Light,
    options: RenderOptions,
) {
    let (logical_x, logical_y) = buffer.logical_size();

    for face in &mesh.faces {
        let v1 = mesh.vertices[face.indices[0]];
        let v2 = mesh.vertices[face.indices[1]];
        let v3 = mesh.vertices[face.indices[2]];

        // the camera orbit, applied to the object in the opposite sense
        let r1 = rotate_x(&rotate_y(&v1, -camera.azimuth), -camera.altitude);
        let r2 = rotate_x(&rotate_y(&v2, -camera.azimuth), -camera.altitude);
        let r3 = rotate_x(&rotate_y(&v3, -camera.azimuth), -camera.altitude);

        // camera-space normal; the viewer sits on the -z side, so faces
        // whose normal has no -z component point away and are culled
        let normal = safe_normalize(&(r2 - r1).cross(&(r3 - r1)));
        if normal.z >= 0.0 {
            continue;
        }

        // a static light shades against world-space normals, a camera-locked
        // light against camera-space normals
        let shade_normal = if options.static_light {
            safe_normalize(&(v2 - v1).cross(&(v3 - v1)))
        } else {
            normal
        };
        let intensity = (-light.direction).dot(&shade_normal).clamp(0.0, 1.0);

        let projection = Projection::new(
            to_screen(&r1, camera.zoom, logical_x, logical_y),
            to_screen(&r2, camera.zoom, logical_x, logical_y),
            to_screen(&r3, camera.zoom, logical_x, logical_y),
        );

        let material = if options.color { face.material } else { None };
        buffer.draw_projection(&projection, luminance_glyph(intensity), material);
    }
}

/// Map a [0, 1] intensity onto the luminance ramp.
fn luminance_glyph(intensity: f32) -> char {
    let last = LUMINANCE_RAMP.len() - 1;
    let index = (intensity * last as f32).round() as usize;
    LUMINANCE_RAMP[index.min(last)]
}

/// Map a camera-space point into the buffer's logical space. Screen y grows
/// downward; z keeps view depth, smaller nearer.
fn to_screen(v: &Point3<f32>, zoom: f32, logical_x: f32, logical_y: f32) -> Point3<f32> {
    Point3::new(
        (v.x * zoom + 1.0) * 0.5 * logical_x,
        (1.0 - v.y * zoom) * 0.5 * logical_y,
        (v.z * zoom + 1.0) * 0.5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::DEFAULT_CHAR_ASPECT;
    use crate::geometry::Face;
    use nalgebra::Vector3;

    const BRIGHTEST: char = '@';

    fn head_on_light() -> Light {
        // travels along the view axis, into the screen
        Light::new(Vector3::new(0.0, 0.0, 1.0))
    }

    fn drawn_cells(buffer: &Buffer) -> Vec<(usize, usize, char)> {
        let mut cells = Vec::new();
        for row in 0..buffer.rows() {
            for col in 0..buffer.cols() {
                let pixel = buffer.cell(col, row);
                if pixel.glyph != ' ' {
                    cells.push((col, row, pixel.glyph));
                }
            }
        }
        cells
    }

    #[test]
    fn test_front_face_centered_and_brightest() {
        let mut buffer = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        let mesh = Mesh::cube(1.0);
        let camera = Camera::default();
        let options = RenderOptions {
            static_light: true,
            color: false,
        };

        render(&mut buffer, &mesh, &camera, &head_on_light(), options);

        let cells = drawn_cells(&buffer);
        assert!(!cells.is_empty());

        // the face normal toward the camera is lit head-on
        let center = buffer.cell(buffer.cols() / 2, buffer.rows() / 2);
        assert_eq!(center.glyph, BRIGHTEST);

        // a contiguous region roughly centered in the buffer: every drawn
        // cell sits in the middle half of the grid
        for (col, row, glyph) in cells {
            assert_eq!(glyph, BRIGHTEST);
            assert!(col >= buffer.cols() / 4 && col < buffer.cols() * 3 / 4 + 1);
            assert!(row >= buffer.rows() / 4 && row < buffer.rows() * 3 / 4 + 1);
        }
    }

    #[test]
    fn test_backfaces_are_culled() {
        // a single face wound away from the viewer contributes zero pixels
        let mut away = Mesh::cube(1.0);
        away.faces = vec![Face::new(4, 5, 6, None), Face::new(4, 6, 7, None)]; // +z face
        let mut buffer = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        render(
            &mut buffer,
            &away,
            &Camera::default(),
            &head_on_light(),
            RenderOptions::default(),
        );
        assert!(drawn_cells(&buffer).is_empty());
    }

    #[test]
    fn test_cube_front_depth_hides_back() {
        // full cube, head-on: every drawn cell carries the front face's depth
        let mut buffer = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        let mesh = Mesh::cube(1.0);
        render(
            &mut buffer,
            &mesh,
            &Camera::default(),
            &head_on_light(),
            RenderOptions::default(),
        );

        // front face plane z = -0.5 maps to view depth 0.25
        let center = buffer.cell(buffer.cols() / 2, buffer.rows() / 2);
        assert!((center.depth - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_camera_locked_light_follows_orbit() {
        // with the light locked to the camera, the facing glyph stays the
        // same under any azimuth
        let mesh = Mesh::cube(1.0);
        let light = head_on_light();
        let options = RenderOptions::default();

        let mut reference = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        render(&mut reference, &mesh, &Camera::default(), &light, options);
        let reference_glyph = reference.cell(20, 10).glyph;

        let mut orbited = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        let mut camera = Camera::default();
        for _ in 0..18 {
            camera.rotate_left(); // 90 degrees total
        }
        render(&mut orbited, &mesh, &camera, &light, options);
        assert_eq!(orbited.cell(20, 10).glyph, reference_glyph);
    }

    #[test]
    fn test_color_option_attaches_material() {
        let mut mesh = Mesh::cube(1.0);
        for face in &mut mesh.faces {
            face.material = Some(3);
        }

        let mut colored = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        render(
            &mut colored,
            &mesh,
            &Camera::default(),
            &head_on_light(),
            RenderOptions {
                static_light: false,
                color: true,
            },
        );
        assert_eq!(colored.cell(20, 10).material, Some(3));

        let mut plain = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        render(
            &mut plain,
            &mesh,
            &Camera::default(),
            &head_on_light(),
            RenderOptions::default(),
        );
        assert_eq!(plain.cell(20, 10).material, None);
    }

    #[test]
    fn test_zoom_scales_footprint() {
        let mesh = Mesh::cube(1.0);
        let light = head_on_light();

        let mut near = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        let mut camera = Camera::default();
        camera.zoom_in();
        camera.zoom_in();
        render(&mut near, &mesh, &camera, &light, RenderOptions::default());

        let mut far = Buffer::new(40, 20, DEFAULT_CHAR_ASPECT);
        render(&mut far, &mesh, &Camera::default(), &light, RenderOptions::default());

        assert!(drawn_cells(&near).len() > drawn_cells(&far).len());
    }

    #[test]
    fn test_luminance_glyph_spans_ramp() {
        assert_eq!(luminance_glyph(0.0), '.');
        assert_eq!(luminance_glyph(1.0), '@');
        assert_eq!(luminance_glyph(2.0), '@'); // clamped
    }
}
