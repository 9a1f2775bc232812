use glam::{Vec2, Vec3};

use crate::foundation::error::{ShotError, ShotResult};

/// Surface a triangle belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Material {
    /// Device shell, shaded with the body color.
    #[default]
    Body,
    /// Display glass, textured with the screenshot.
    Screen,
}

/// One corner of a triangle. `uv` has its origin at the top-left of the texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: Vec3,
    /// Texture coordinate.
    pub uv: Vec2,
    /// Unit normal.
    pub normal: Vec3,
}

/// Triangle with its material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangle {
    /// Corners in counter-clockwise order.
    pub vertices: [MeshVertex; 3],
    /// Surface kind.
    pub material: Material,
}

/// Triangle soup for the device model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// All triangles.
    pub triangles: Vec<MeshTriangle>,
}

impl Mesh {
    /// Flat screen-textured quad `2 × aspect` wide and `2` tall, facing +Z.
    pub fn plane(aspect: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        let hw = aspect;
        let n = Vec3::Z;
        let v = |x: f32, y: f32, u: f32, t: f32| MeshVertex {
            position: Vec3::new(x, y, 0.0),
            uv: Vec2::new(u, t),
            normal: n,
        };
        let tl = v(-hw, 1.0, 0.0, 0.0);
        let tr = v(hw, 1.0, 1.0, 0.0);
        let bl = v(-hw, -1.0, 0.0, 1.0);
        let br = v(hw, -1.0, 1.0, 1.0);
        Self {
            triangles: vec![
                MeshTriangle {
                    vertices: [bl, br, tr],
                    material: Material::Screen,
                },
                MeshTriangle {
                    vertices: [bl, tr, tl],
                    material: Material::Screen,
                },
            ],
        }
    }

    /// Parse Wavefront OBJ text. Faces after `usemtl screen` get [`Material::Screen`].
    pub fn parse_obj(text: &str) -> ShotResult<Self> {
        let mut positions = Vec::<Vec3>::new();
        let mut uvs = Vec::<Vec2>::new();
        let mut normals = Vec::<Vec3>::new();
        let mut material = Material::Body;
        let mut triangles = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            let mut parts = line.split_whitespace();
            let Some(tag) = parts.next() else {
                continue;
            };
            match tag {
                "v" => positions.push(parse_vec3(&mut parts, line_no)?),
                "vn" => normals.push(parse_vec3(&mut parts, line_no)?.normalize_or_zero()),
                "vt" => {
                    let u = parse_f32(parts.next(), line_no)?;
                    let v = parse_f32(parts.next(), line_no)?;
                    uvs.push(Vec2::new(u, 1.0 - v));
                }
                "usemtl" => {
                    let name = parts.next().unwrap_or("");
                    material = if name.to_ascii_lowercase().contains("screen") {
                        Material::Screen
                    } else {
                        Material::Body
                    };
                }
                "f" => {
                    let corners = parts
                        .map(|c| resolve_corner(c, &positions, &uvs, &normals, line_no))
                        .collect::<ShotResult<Vec<_>>>()?;
                    if corners.len() < 3 {
                        return Err(ShotError::asset(format!(
                            "obj line {line_no}: face needs at least 3 vertices"
                        )));
                    }
                    for k in 1..corners.len() - 1 {
                        triangles.push(triangle(
                            [corners[0], corners[k], corners[k + 1]],
                            material,
                        ));
                    }
                }
                _ => {}
            }
        }

        if triangles.is_empty() {
            return Err(ShotError::asset("obj contains no faces"));
        }
        Ok(Self { triangles })
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = it.next()?.position;
        Some(it.fold((first, first), |(lo, hi), v| {
            (lo.min(v.position), hi.max(v.position))
        }))
    }

    /// Center on the origin and scale uniformly so the Y extent equals `height`.
    pub fn fit_height(mut self, height: f32) -> Self {
        let Some((lo, hi)) = self.bounds() else {
            return self;
        };
        let center = (lo + hi) * 0.5;
        let extent = (hi - lo).y;
        let s = if extent > f32::EPSILON {
            height / extent
        } else {
            1.0
        };
        for t in &mut self.triangles {
            for v in &mut t.vertices {
                v.position = (v.position - center) * s;
            }
        }
        self
    }

    /// Number of triangles that receive the screenshot.
    pub fn screen_triangles(&self) -> usize {
        self.triangles
            .iter()
            .filter(|t| t.material == Material::Screen)
            .count()
    }
}

#[derive(Clone, Copy)]
struct Corner {
    position: Vec3,
    uv: Option<Vec2>,
    normal: Option<Vec3>,
}

fn triangle(c: [Corner; 3], material: Material) -> MeshTriangle {
    let face_n = (c[1].position - c[0].position)
        .cross(c[2].position - c[0].position)
        .normalize_or_zero();
    let vertices = c.map(|c| MeshVertex {
        position: c.position,
        uv: c.uv.unwrap_or(Vec2::ZERO),
        normal: c.normal.unwrap_or(face_n),
    });
    MeshTriangle { vertices, material }
}

fn parse_f32(token: Option<&str>, line_no: usize) -> ShotResult<f32> {
    let token =
        token.ok_or_else(|| ShotError::asset(format!("obj line {line_no}: missing number")))?;
    token
        .parse::<f32>()
        .map_err(|e| ShotError::asset(format!("obj line {line_no}: bad number '{token}': {e}")))
}

fn parse_vec3<'a>(parts: &mut impl Iterator<Item = &'a str>, line_no: usize) -> ShotResult<Vec3> {
    Ok(Vec3::new(
        parse_f32(parts.next(), line_no)?,
        parse_f32(parts.next(), line_no)?,
        parse_f32(parts.next(), line_no)?,
    ))
}

/// Resolve a 1-based (or negative, relative) OBJ index.
fn resolve_index(token: &str, len: usize, line_no: usize) -> ShotResult<usize> {
    let i: i64 = token
        .parse()
        .map_err(|_| ShotError::asset(format!("obj line {line_no}: bad index '{token}'")))?;
    let idx = if i < 0 { len as i64 + i } else { i - 1 };
    if idx < 0 || idx as usize >= len {
        return Err(ShotError::asset(format!(
            "obj line {line_no}: index {i} out of range"
        )));
    }
    Ok(idx as usize)
}

fn resolve_corner(
    token: &str,
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
    line_no: usize,
) -> ShotResult<Corner> {
    let mut fields = token.split('/');
    let p = fields.next().unwrap_or("");
    let position = positions[resolve_index(p, positions.len(), line_no)?];
    let uv = match fields.next() {
        Some(t) if !t.is_empty() => Some(uvs[resolve_index(t, uvs.len(), line_no)?]),
        _ => None,
    };
    let normal = match fields.next() {
        Some(n) if !n.is_empty() => Some(normals[resolve_index(n, normals.len(), line_no)?]),
        _ => None,
    };
    Ok(Corner {
        position,
        uv,
        normal,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/preview3d/mesh.rs"]
mod tests;
