use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::preview3d::mesh::{Material, Mesh};
use crate::preview3d::texture::Texture;

/// Fixed perspective camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub eye: Vec3,
    /// Look-at point.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fov_y_deg: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Combined projection × view for a viewport of `aspect` (width / height).
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far)
            * Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}

/// Cone light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    /// Light position.
    pub position: Vec3,
    /// Unit direction the cone points in.
    pub direction: Vec3,
    /// Cosine of the cone half-angle.
    pub cos_cutoff: f32,
    /// Peak contribution.
    pub intensity: f32,
}

/// Ambient, directional, and spot lighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    /// Uniform term.
    pub ambient: f32,
    /// Unit direction the key light travels in.
    pub key_direction: Vec3,
    /// Key light contribution.
    pub key_intensity: f32,
    /// Spot light.
    pub spot: SpotLight,
}

impl Default for LightRig {
    fn default() -> Self {
        let spot_pos = Vec3::new(0.0, 2.0, 6.0);
        Self {
            ambient: 0.55,
            key_direction: Vec3::new(0.3, -0.4, -1.0).normalize(),
            key_intensity: 0.35,
            spot: SpotLight {
                position: spot_pos,
                direction: (-spot_pos).normalize(),
                cos_cutoff: 30f32.to_radians().cos(),
                intensity: 0.25,
            },
        }
    }
}

impl LightRig {
    /// Light reaching `position` on a surface with unit normal `normal`.
    pub fn illuminate(&self, position: Vec3, normal: Vec3) -> f32 {
        let key = normal.dot(-self.key_direction).max(0.0) * self.key_intensity;
        let to_light = (self.spot.position - position).normalize_or_zero();
        let cos_angle = (-to_light).dot(self.spot.direction);
        let spot = if cos_angle > self.spot.cos_cutoff {
            let falloff = ((cos_angle - self.spot.cos_cutoff) / (1.0 - self.spot.cos_cutoff))
                .clamp(0.0, 1.0);
            normal.dot(to_light).max(0.0) * self.spot.intensity * falloff
        } else {
            0.0
        };
        self.ambient + key + spot
    }
}

/// Software triangle rasterizer with a depth buffer.
pub struct Rasterizer {
    width: u32,
    height: u32,
    color: Vec<Vec4>,
    depth: Vec<f32>,
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

impl Rasterizer {
    /// Buffers for a `width`×`height` viewport.
    pub fn new(width: u32, height: u32) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            color: vec![Vec4::ZERO; n],
            depth: vec![f32::INFINITY; n],
        }
    }

    /// Reset color to `premul` and depth to infinity.
    pub fn clear(&mut self, premul: Vec4) {
        self.color.fill(premul);
        self.depth.fill(f32::INFINITY);
    }

    /// Draw `mesh` under `model`. Screen triangles sample `texture`; everything else uses `body`.
    pub fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        model: Mat4,
        camera: &Camera,
        lights: &LightRig,
        texture: Option<&Texture>,
        body: Vec4,
    ) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (w, h) = (self.width as f32, self.height as f32);
        let mvp = camera.view_projection(w / h) * model;
        let normal_m = Mat3::from_mat4(model).inverse().transpose();

        for tri in &mesh.triangles {
            let clip = tri.vertices.map(|v| mvp * v.position.extend(1.0));
            if clip.iter().any(|c| c.w <= camera.near) {
                continue;
            }
            let screen = clip.map(|c| {
                let ndc = c.truncate() / c.w;
                Vec3::new((ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h, ndc.z)
            });
            let s2 = screen.map(|s| s.truncate());
            let area = edge(s2[0], s2[1], s2[2]);
            if area.abs() < 1e-6 {
                continue;
            }

            let lo = s2[0].min(s2[1]).min(s2[2]).floor().max(Vec2::ZERO);
            let hi = s2[0].max(s2[1]).max(s2[2]).ceil().min(Vec2::new(w - 1.0, h - 1.0));
            if lo.x > hi.x || lo.y > hi.y {
                continue;
            }

            let inv_w = clip.map(|c| 1.0 / c.w);
            let world = tri
                .vertices
                .map(|v| (model * v.position.extend(1.0)).truncate());
            let normals = tri
                .vertices
                .map(|v| (normal_m * v.normal).normalize_or_zero());

            for y in lo.y as u32..=hi.y as u32 {
                for x in lo.x as u32..=hi.x as u32 {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let b = [
                        edge(s2[1], s2[2], p) / area,
                        edge(s2[2], s2[0], p) / area,
                        edge(s2[0], s2[1], p) / area,
                    ];
                    if b.iter().any(|&bi| bi < 0.0) {
                        continue;
                    }
                    let z = b[0] * screen[0].z + b[1] * screen[1].z + b[2] * screen[2].z;
                    let idx = (y as usize) * (self.width as usize) + (x as usize);
                    if !(0.0..=1.0).contains(&z) || z >= self.depth[idx] {
                        continue;
                    }

                    let pw = [b[0] * inv_w[0], b[1] * inv_w[1], b[2] * inv_w[2]];
                    let sum = pw[0] + pw[1] + pw[2];
                    let pw = pw.map(|v| v / sum);
                    let uv = tri.vertices[0].uv * pw[0]
                        + tri.vertices[1].uv * pw[1]
                        + tri.vertices[2].uv * pw[2];
                    let pos = world[0] * pw[0] + world[1] * pw[1] + world[2] * pw[2];
                    let mut n = (normals[0] * pw[0] + normals[1] * pw[1] + normals[2] * pw[2])
                        .normalize_or_zero();
                    if n.dot(camera.eye - pos) < 0.0 {
                        n = -n;
                    }

                    let base = match (tri.material, texture) {
                        (Material::Screen, Some(t)) => t.sample(uv),
                        _ => body,
                    };
                    if base.w <= 0.0 {
                        continue;
                    }
                    let light = lights.illuminate(pos, n);
                    let rgb = (base.truncate() * light).min(Vec3::splat(base.w));
                    let src = rgb.extend(base.w);
                    self.color[idx] = src + self.color[idx] * (1.0 - base.w);
                    self.depth[idx] = z;
                }
            }
        }
    }

    /// Premultiplied RGBA8 copy of the color buffer.
    pub fn to_rgba8_premul(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.color.len() * 4);
        for c in &self.color {
            for v in c.to_array() {
                out.push((v.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        out
    }

    /// Viewport width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Model matrix for Euler angles in degrees, composed as `Rx * Ry * Rz`.
pub fn rotation_matrix(degrees: Vec3) -> Mat4 {
    let r = degrees * (std::f32::consts::PI / 180.0);
    Mat4::from_rotation_x(r.x) * Mat4::from_rotation_y(r.y) * Mat4::from_rotation_z(r.z)
}

#[cfg(test)]
#[path = "../../tests/unit/preview3d/raster.rs"]
mod tests;
