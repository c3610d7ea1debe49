//! Mesh, face, and material primitives.
use nalgebra::{Point3, Vector3};

use crate::math::safe_normalize;

/// Reference length the longest bounding-box dimension is scaled to by
/// [`Mesh::normalize`].
pub const NORMALIZED_SIZE: f32 = 1.0;

/// A diffuse material loaded alongside the mesh, referenced by index from
/// faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// RGB diffuse reflectance, components in [0, 1].
    pub diffuse: Vector3<f32>,
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            diffuse,
        }
    }
}

/// A triangular face: three vertex indices and an optional material index.
///
/// The winding order of the indices defines the outward side; the face normal
/// is `(v2 - v1) × (v3 - v1)` for vertices in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub indices: [usize; 3],
    pub material: Option<usize>,
}

impl Face {
    pub fn new(i1: usize, i2: usize, i3: usize, material: Option<usize>) -> Self {
        Self {
            indices: [i1, i2, i3],
            material,
        }
    }

    /// Reverse the winding order, flipping which side is outward.
    pub fn flip(&mut self) {
        self.indices.swap(1, 2);
    }
}

/// A triangle mesh with its material list. Populated by the loader, then
/// adjusted once through the setup transforms below; immutable during
/// rendering.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<Face>,
    pub materials: Vec<Material>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outward face normal, from the winding order of the face's indices.
    pub fn face_normal(&self, face: &Face) -> Vector3<f32> {
        let v1 = self.vertices[face.indices[0]];
        let v2 = self.vertices[face.indices[1]];
        let v3 = self.vertices[face.indices[2]];
        safe_normalize(&(v2 - v1).cross(&(v3 - v1)))
    }

    /// Recenter the mesh at the origin and scale it uniformly so the longest
    /// bounding-box dimension equals [`NORMALIZED_SIZE`].
    pub fn normalize(&mut self) {
        let (min, max) = match self.bounding_box() {
            Some(bounds) => bounds,
            None => return,
        };

        let center = nalgebra::center(&min, &max);
        let extent = (max - min).amax().max(1e-6);
        let scale = NORMALIZED_SIZE / extent;

        for v in &mut self.vertices {
            *v = Point3::from((*v - center) * scale);
        }
    }

    /// Multiply every vertex by a uniform factor.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            *v = Point3::from(v.coords * factor);
        }
    }

    /// Mirror along the x axis. Mirroring inverts handedness, so every face
    /// winding is reversed to keep outward normals outward.
    pub fn invert_x(&mut self) {
        for v in &mut self.vertices {
            v.x = -v.x;
        }
        self.flip_faces();
    }

    /// Mirror along the y axis; see [`Mesh::invert_x`].
    pub fn invert_y(&mut self) {
        for v in &mut self.vertices {
            v.y = -v.y;
        }
        self.flip_faces();
    }

    /// Mirror along the z axis; see [`Mesh::invert_x`].
    pub fn invert_z(&mut self) {
        for v in &mut self.vertices {
            v.z = -v.z;
        }
        self.flip_faces();
    }

    /// Reverse the winding of every face without touching vertex positions.
    pub fn flip_faces(&mut self) {
        for face in &mut self.faces {
            face.flip();
        }
    }

    /// Axis-aligned bounding box, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices {
            min = Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z));
            max = Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z));
        }

        Some((min, max))
    }

    /// An axis-aligned cube centered at the origin with outward-wound faces,
    /// for tests and as a fallback model.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;

        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];

        let quads = [
            [0, 3, 2, 1], // back (-z)
            [4, 5, 6, 7], // front (+z)
            [0, 4, 7, 3], // left (-x)
            [1, 2, 6, 5], // right (+x)
            [0, 1, 5, 4], // bottom (-y)
            [3, 7, 6, 2], // top (+y)
        ];

        let mut faces = Vec::with_capacity(quads.len() * 2);
        for [a, b, c, d] in quads {
            faces.push(Face::new(a, b, c, None));
            faces.push(Face::new(a, c, d, None));
        }

        Self {
            vertices,
            faces,
            materials: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(mesh: &Mesh, face: &Face) -> Vector3<f32> {
        let sum = face
            .indices
            .iter()
            .fold(Vector3::zeros(), |acc, &i| acc + mesh.vertices[i].coords);
        sum / 3.0
    }

    /// Every face normal of an outward-wound mesh centered at the origin
    /// points away from the origin.
    fn assert_outward(mesh: &Mesh) {
        for face in &mesh.faces {
            let dot = mesh.face_normal(face).dot(&centroid(mesh, face));
            assert!(dot > 0.0, "face {:?} winds inward", face.indices);
        }
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        assert_outward(&Mesh::cube(2.0));
    }

    #[test]
    fn test_normalize_unit_extent_centered() {
        let mut mesh = Mesh::cube(2.0);
        mesh.scale(7.3);
        for v in &mut mesh.vertices {
            *v += Vector3::new(12.0, -4.0, 0.5);
        }

        mesh.normalize();

        let (min, max) = mesh.bounding_box().unwrap();
        let center = nalgebra::center(&min, &max);
        assert!(center.coords.norm() < 1e-5);
        assert!(((max - min).amax() - NORMALIZED_SIZE).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_empty_mesh_is_noop() {
        let mut mesh = Mesh::new();
        mesh.normalize();
        assert!(mesh.vertices.is_empty());
    }

    #[test]
    fn test_scale_uniform() {
        let mut mesh = Mesh::cube(2.0);
        mesh.scale(3.0);
        let (min, max) = mesh.bounding_box().unwrap();
        assert!(((max - min).amax() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_invert_x_preserves_outward_normals() {
        let mut mesh = Mesh::cube(2.0);
        mesh.invert_x();
        assert_outward(&mesh);
    }

    #[test]
    fn test_invert_each_axis_preserves_outward_normals() {
        let mut mesh = Mesh::cube(2.0);
        mesh.invert_y();
        assert_outward(&mesh);
        mesh.invert_z();
        assert_outward(&mesh);
    }

    #[test]
    fn test_flip_faces_inverts_normals() {
        let mut mesh = Mesh::cube(2.0);
        mesh.flip_faces();
        for face in &mesh.faces {
            let dot = mesh.face_normal(face).dot(&centroid(&mesh, face));
            assert!(dot < 0.0);
        }

        // a second flip restores the original winding
        mesh.flip_faces();
        assert_outward(&mesh);
    }
}
