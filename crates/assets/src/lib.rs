//! Craft mesh loading: the Wavefront OBJ triangle subset.
//!
//! The simulation never touches vertex data. It only needs the craft's
//! bounding extents, which [`Mesh::oriented_bounds`] derives once at start-up.
//!
//! # Format
//! - `v x y z` position, `vt u v` texture coordinate, `vn x y z` normal.
//! - `f a/b/c a/b/c a/b/c` triangle; indices are 1-based in the file and
//!   0-based in memory. `a`, `a/b` and `a//c` corners are accepted too.
//! - `#` comments and every other record (`o`, `g`, `s`, `usemtl`, ...) are
//!   skipped. Faces with more than three corners are rejected.

use glam::{Quat, Vec2, Vec3};
use ringflight_common::Aabb;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from reading a mesh file.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: face has {corners} corners, only triangles are supported")]
    NotTriangle { line: usize, corners: usize },
    #[error("line {line}: {kind} index {index} out of range (have {count})")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        count: usize,
    },
    #[error("mesh has no vertices")]
    Empty,
}

/// One face corner. Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corner {
    pub position: u32,
    pub texture: Option<u32>,
    pub normal: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face(pub [Corner; 3]);

/// A triangle mesh as read from an OBJ file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Read and parse an OBJ file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ObjError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mesh = Self::parse(&name, &text)?;
        tracing::info!(
            path = %path.display(),
            faces = mesh.faces.len(),
            positions = mesh.vertices.len(),
            normals = mesh.normals.len(),
            tex_coords = mesh.tex_coords.len(),
            "loaded mesh"
        );
        Ok(mesh)
    }

    /// Parse OBJ text. Face indices are checked against the records read so
    /// far, so a face may only reference vertices declared above it.
    pub fn parse(name: &str, text: &str) -> Result<Self, ObjError> {
        let mut mesh = Mesh {
            name: name.to_string(),
            ..Mesh::default()
        };
        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let content = raw.split('#').next().unwrap_or_default();
            let mut fields = content.split_whitespace();
            let Some(tag) = fields.next() else {
                continue;
            };
            match tag {
                "v" => {
                    let [x, y, z] = floats::<3>(&mut fields, line)?;
                    mesh.vertices.push(Vec3::new(x, y, z));
                }
                "vt" => {
                    let [u, v] = floats::<2>(&mut fields, line)?;
                    mesh.tex_coords.push(Vec2::new(u, v));
                }
                "vn" => {
                    let [x, y, z] = floats::<3>(&mut fields, line)?;
                    mesh.normals.push(Vec3::new(x, y, z));
                }
                "f" => {
                    let corners: Vec<&str> = fields.collect();
                    if corners.len() != 3 {
                        return Err(ObjError::NotTriangle {
                            line,
                            corners: corners.len(),
                        });
                    }
                    let mut face = [Corner {
                        position: 0,
                        texture: None,
                        normal: None,
                    }; 3];
                    for (slot, token) in face.iter_mut().zip(corners) {
                        *slot = mesh.corner(token, line)?;
                    }
                    mesh.faces.push(Face(face));
                }
                other => tracing::trace!(line, record = other, "skipping OBJ record"),
            }
        }
        if mesh.vertices.is_empty() {
            return Err(ObjError::Empty);
        }
        Ok(mesh)
    }

    fn corner(&self, token: &str, line: usize) -> Result<Corner, ObjError> {
        let mut parts = token.split('/');
        let position = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ObjError::Parse {
                line,
                message: format!("face corner '{token}' has no position index"),
            })?;
        let position = resolve(position, "position", self.vertices.len(), line)?;
        let texture = match parts.next() {
            Some(s) if !s.is_empty() => Some(resolve(s, "texture", self.tex_coords.len(), line)?),
            _ => None,
        };
        let normal = match parts.next() {
            Some(s) if !s.is_empty() => Some(resolve(s, "normal", self.normals.len(), line)?),
            _ => None,
        };
        if parts.next().is_some() {
            return Err(ObjError::Parse {
                line,
                message: format!("face corner '{token}' has too many fields"),
            });
        }
        Ok(Corner {
            position,
            texture,
            normal,
        })
    }

    /// Mean of all vertex positions.
    pub fn centroid(&self) -> Vec3 {
        let sum: Vec3 = self.vertices.iter().copied().sum();
        sum / self.vertices.len().max(1) as f32
    }

    /// Component-wise maximum over all vertex positions.
    pub fn max(&self) -> Vec3 {
        self.bounds().max
    }

    pub fn min(&self) -> Vec3 {
        self.bounds().min
    }

    /// Bounds in mesh space.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied()).unwrap_or(Aabb::new(Vec3::ZERO, Vec3::ZERO))
    }

    /// Craft extents for the simulation: mesh bounds scaled, then rotated
    /// into world orientation. The result is relative to the craft origin.
    pub fn oriented_bounds(&self, rotation: Quat, scale: f32) -> Aabb {
        let b = self.bounds();
        Aabb::new(b.min * scale, b.max * scale).rotated(rotation)
    }

    /// Positions of every triangle corner, three per face.
    pub fn triangle_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.faces
            .iter()
            .flat_map(|f| f.0.iter().map(|c| self.vertices[c.position as usize]))
    }
}

fn floats<const N: usize>(
    fields: &mut std::str::SplitWhitespace<'_>,
    line: usize,
) -> Result<[f32; N], ObjError> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        let token = fields.next().ok_or_else(|| ObjError::Parse {
            line,
            message: format!("expected {N} numbers"),
        })?;
        *slot = token.parse().map_err(|_| ObjError::Parse {
            line,
            message: format!("'{token}' is not a number"),
        })?;
    }
    Ok(out)
}

/// Turn a 1-based (or negative, relative) OBJ index into a 0-based one.
fn resolve(token: &str, kind: &'static str, count: usize, line: usize) -> Result<u32, ObjError> {
    let index: i64 = token.parse().map_err(|_| ObjError::Parse {
        line,
        message: format!("'{token}' is not a {kind} index"),
    })?;
    let zero_based = if index < 0 {
        count as i64 + index
    } else {
        index - 1
    };
    if zero_based < 0 || zero_based >= count as i64 {
        return Err(ObjError::IndexOutOfRange {
            line,
            kind,
            index,
            count,
        });
    }
    Ok(zero_based as u32)
}

/// Craft extents from an optional mesh file, already in world orientation
/// (+x forward, +y up). Without a mesh the default craft box is used.
pub fn craft_bounds(mesh: Option<&Path>) -> Result<Aabb, ObjError> {
    match mesh {
        Some(path) => Ok(Mesh::load(path)?.oriented_bounds(Quat::IDENTITY, 1.0)),
        None => Ok(Aabb::default()),
    }
}

pub fn crate_info() -> &'static str {
    "ringflight-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIANGLE: &str = "\
# a single triangle
o tri
v 0 0 0
v 2 0 0
v 0 4 -1
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn parse_triangle_zero_based() {
        let mesh = Mesh::parse("tri", TRIANGLE).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.tex_coords.len(), 3);
        assert_eq!(mesh.normals.len(), 1);
        assert_eq!(mesh.faces.len(), 1);
        let corners = mesh.faces[0].0;
        assert_eq!(corners[0].position, 0);
        assert_eq!(corners[2].position, 2);
        assert_eq!(corners[1].texture, Some(1));
        assert_eq!(corners[2].normal, Some(0));
    }

    #[test]
    fn centroid_and_bounds() {
        let mesh = Mesh::parse("tri", TRIANGLE).unwrap();
        let c = mesh.centroid();
        assert!((c - Vec3::new(2.0 / 3.0, 4.0 / 3.0, -1.0 / 3.0)).length() < 1e-6);
        assert_eq!(mesh.max(), Vec3::new(2.0, 4.0, 0.0));
        assert_eq!(mesh.min(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn oriented_bounds_rotate_about_y() {
        let mesh = Mesh::parse("tri", TRIANGLE).unwrap();
        let b = mesh.oriented_bounds(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), 1.0);
        // +x maps onto -z under a quarter turn about y
        assert!((b.min.z + 2.0).abs() < 1e-5);
        assert!((b.max.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn partial_corners_accepted() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2 3//1\n";
        let mesh = Mesh::parse("m", text).unwrap();
        let f = mesh.faces[0].0;
        assert_eq!(f[0].texture, None);
        assert_eq!(f[0].normal, Some(0));
        assert_eq!(f[1].normal, None);
    }

    #[test]
    fn quads_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let err = Mesh::parse("quad", text).unwrap_err();
        assert!(matches!(err, ObjError::NotTriangle { line: 5, corners: 4 }));
    }

    #[test]
    fn bad_index_reports_line() {
        let text = "v 0 0 0\nv 1 0 0\nf 1 2 7\n";
        let err = Mesh::parse("m", text).unwrap_err();
        assert!(matches!(err, ObjError::IndexOutOfRange { line: 3, index: 7, .. }));
    }

    #[test]
    fn bad_number_and_empty() {
        assert!(matches!(
            Mesh::parse("m", "v 0 zero 0\n"),
            Err(ObjError::Parse { line: 1, .. })
        ));
        assert!(matches!(Mesh::parse("m", "# nothing\n"), Err(ObjError::Empty)));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(TRIANGLE.as_bytes()).unwrap();
        let mesh = Mesh::load(tmp.path()).unwrap();
        assert_eq!(mesh.triangle_positions().count(), 3);

        let err = Mesh::load("/no/such/mesh.obj").unwrap_err();
        assert!(matches!(err, ObjError::Io(_)));
    }

    #[test]
    fn craft_bounds_defaults_without_mesh() {
        assert_eq!(craft_bounds(None).unwrap(), Aabb::default());

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"v -2 0 -1\nv 3 1 1\nv 0 -1 0\nf 1 2 3\n").unwrap();
        let bounds = craft_bounds(Some(tmp.path())).unwrap();
        assert_eq!(bounds.min, Vec3::new(-2.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 1.0, 1.0));
    }
}
