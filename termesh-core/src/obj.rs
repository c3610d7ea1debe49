//! Wavefront OBJ/MTL loading.
//!
//! Parses `v` and `f` records plus the `mtllib`/`usemtl` material hooks when
//! materials are requested; everything else is skipped. Malformed records are
//! logged and dropped so a partially broken file still renders.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::take_till,
    character::complete::{char, digit1, space0, space1},
    combinator::{map_res, opt, recognize},
    multi::separated_list1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::geometry::{Face, Material, Mesh};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// Load a mesh from an OBJ file. Materials referenced through `mtllib` are
/// resolved relative to the OBJ's directory, and only when `with_materials`
/// is set.
pub fn load_obj(path: &Path, with_materials: bool) -> Result<Mesh, ObjError> {
    let source = read_checked(path, "obj")?;

    let mut materials = Vec::new();
    if with_materials {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for line in source.lines() {
            if let Some(("mtllib", rest)) = keyword(line) {
                if let Some(name) = rest.split_whitespace().next() {
                    match load_mtl(&base.join(name)) {
                        Ok(loaded) => materials.extend(loaded),
                        Err(e) => warn!("skipping material library {name}: {e}"),
                    }
                }
            }
        }
    }

    Ok(parse_obj_source(&source, materials))
}

/// Load a material list from an MTL file.
pub fn load_mtl(path: &Path) -> Result<Vec<Material>, ObjError> {
    let source = read_checked(path, "mtl")?;
    Ok(parse_mtl_source(&source))
}

fn read_checked(path: &Path, extension: &str) -> Result<String, ObjError> {
    let matches = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false);
    if !matches {
        return Err(ObjError::UnsupportedExtension(path.to_path_buf()));
    }

    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ObjError::NotFound(path.to_path_buf())
        } else {
            ObjError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Parse OBJ source into a mesh with the given, already-loaded material
/// list.
pub fn parse_obj_source(source: &str, materials: Vec<Material>) -> Mesh {
    let mut mesh = Mesh {
        materials,
        ..Mesh::new()
    };
    let mut current_material = None;

    for line in source.lines() {
        let Some((key, rest)) = keyword(line) else {
            continue;
        };

        match key {
            "v" => match vector3(rest) {
                Ok((_, (x, y, z))) => mesh.vertices.push(Point3::new(x, y, z)),
                Err(_) => warn!("skipping malformed vertex record: {rest:?}"),
            },
            "f" => parse_face(rest, current_material, &mut mesh),
            "usemtl" => {
                let name = rest.split_whitespace().next().unwrap_or_default();
                current_material = mesh.materials.iter().position(|m| m.name == name);
                if current_material.is_none() && !mesh.materials.is_empty() {
                    warn!("unknown material {name:?}");
                }
            }
            _ => {} // mtllib handled by the loader; everything else ignored
        }
    }

    mesh
}

/// Parse MTL source into a material list. Each `newmtl` opens a material
/// with a white diffuse until a `Kd` record overrides it.
pub fn parse_mtl_source(source: &str) -> Vec<Material> {
    let mut materials: Vec<Material> = Vec::new();

    for line in source.lines() {
        let Some((key, rest)) = keyword(line) else {
            continue;
        };

        match key {
            "newmtl" => {
                let name = rest.split_whitespace().next().unwrap_or_default();
                materials.push(Material::new(name, Vector3::new(1.0, 1.0, 1.0)));
            }
            "Kd" => match (materials.last_mut(), vector3(rest)) {
                (Some(material), Ok((_, (r, g, b)))) => {
                    material.diffuse = Vector3::new(r, g, b);
                }
                (None, _) => warn!("Kd record before any newmtl"),
                (_, Err(_)) => warn!("skipping malformed diffuse record: {rest:?}"),
            },
            _ => {}
        }
    }

    materials
}

/// Split a record line into its keyword and payload; `None` for blank lines
/// and comments.
fn keyword(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((key, rest)) => Some((key, rest)),
        None => Some((line, "")),
    }
}

fn parse_face(rest: &str, material: Option<usize>, mesh: &mut Mesh) {
    let refs = match face_refs(rest) {
        Ok((_, refs)) => refs,
        Err(_) => {
            warn!("skipping malformed face record: {rest:?}");
            return;
        }
    };

    if refs.len() < 3 {
        warn!("skipping face with fewer than 3 vertices");
        return;
    }

    let indices: Option<Vec<usize>> = refs
        .iter()
        .map(|&r| resolve_index(r, mesh.vertices.len()))
        .collect();
    let Some(indices) = indices else {
        warn!("skipping face with out-of-range vertex index");
        return;
    };

    if let [a, b, c] = indices[..] {
        mesh.faces.push(Face::new(a, b, c, material));
        return;
    }

    let polygon: Vec<Point3<f32>> = indices.iter().map(|&i| mesh.vertices[i]).collect();
    match triangulate(&polygon) {
        Some(triangles) => {
            for corner in triangles.chunks_exact(3) {
                mesh.faces.push(Face::new(
                    indices[corner[0]],
                    indices[corner[1]],
                    indices[corner[2]],
                    material,
                ));
            }
        }
        None => warn!("skipping polygon that could not be triangulated"),
    }
}

/// Map a 1-based (or negative, relative-to-end) OBJ index onto the vertex
/// list.
fn resolve_index(index: i32, total: usize) -> Option<usize> {
    let magnitude = index.unsigned_abs() as usize;
    if index == 0 || magnitude > total {
        return None;
    }
    if index < 0 {
        Some(total - magnitude)
    } else {
        Some(magnitude - 1)
    }
}

// record payload parsers

fn vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    tuple((
        preceded(space0, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)
}

/// One `f` reference: the leading vertex index, with any `/texture/normal`
/// suffix discarded.
fn face_ref(input: &str) -> IResult<&str, i32> {
    terminated(
        map_res(recognize(pair(opt(char('-')), digit1)), str::parse),
        take_till(|c: char| c.is_whitespace()),
    )(input)
}

fn face_refs(input: &str) -> IResult<&str, Vec<i32>> {
    preceded(space0, separated_list1(space1, face_ref))(input)
}

// polygon triangulation (ear clipping)

fn is_in_triangle(pt: &Point3<f32>, v1: &Point3<f32>, v2: &Point3<f32>, v3: &Point3<f32>) -> bool {
    let c1 = (v2 - v1).cross(&(pt - v1)).z;
    let c2 = (v3 - v2).cross(&(pt - v2)).z;
    let c3 = (v1 - v3).cross(&(pt - v3)).z;

    (c1 >= 0.0 && c2 >= 0.0 && c3 >= 0.0) || (c1 <= 0.0 && c2 <= 0.0 && c3 <= 0.0)
}

fn is_ear(i: usize, points: &[Point3<f32>], indices: &[usize]) -> bool {
    let len = indices.len();
    let prev = indices[(i + len - 1) % len];
    let curr = indices[i];
    let next = indices[(i + 1) % len];

    let v1 = points[prev];
    let v2 = points[curr];
    let v3 = points[next];

    // the corner must be convex
    let d1 = v2 - v1;
    let d2 = v3 - v2;
    if d1.cross(&d2).z <= 0.0 {
        return false;
    }

    // and no other vertex may fall inside the candidate triangle
    for j in 0..len {
        if j == (i + len - 1) % len || j == i || j == (i + 1) % len {
            continue;
        }
        if is_in_triangle(&points[indices[j]], &v1, &v2, &v3) {
            return false;
        }
    }

    true
}

/// Ear-clipping triangulation of a polygon given in order; returns triples
/// of positions into `points`, or `None` when no valid ear remains.
fn triangulate(points: &[Point3<f32>]) -> Option<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut result = Vec::with_capacity((n - 2) * 3);

    while indices.len() > 3 {
        let mut ear_found = false;

        for i in 0..indices.len() {
            if is_ear(i, points, &indices) {
                let len = indices.len();
                result.push(indices[(i + len - 1) % len]);
                result.push(indices[i]);
                result.push(indices[(i + 1) % len]);

                indices.remove(i);
                ear_found = true;
                break;
            }
        }

        if !ear_found {
            return None;
        }
    }

    result.extend_from_slice(&indices);
    Some(result)
}
