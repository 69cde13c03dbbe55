//! CPU rasteriser producing isometric snapshots of a model.
//!
//! Orthographic camera 30 degrees above the horizon at 45 degrees yaw, the
//! model turned -90 degrees about Y, nearest-neighbour texturing with alpha
//! test, and Lambert lighting from an ambient term plus three directional
//! lights.

use super::{RenderOptions, RenderRequest, RenderSurface};
use crate::error::Result;
use crate::mesher::{build_meshes, Material, RenderableMesh, TextureSource};
use crate::resolver::ResolvedModel;
use crate::resource_pack::texture::{encode_png, TICK_MS};
use crate::resource_pack::AssetSource;
use crate::texture::TextureCache;
use glam::{Mat4, Vec3};
use image::{Rgba, RgbaImage};
use std::f32::consts::{PI, TAU};
use std::time::Duration;

/// Model units visible across the frame.
pub const VIEW_EXTENT: f32 = 25.6;

const CAMERA_YAW_DEG: f32 = 45.0;
const CAMERA_PITCH_DEG: f32 = 30.0;
const CAMERA_DISTANCE: f32 = 32.0;
const MODEL_YAW_DEG: f32 = -90.0;

const AMBIENT_INTENSITY: f32 = 0.75;
const LIGHT_POWER: f32 = 2.85;
/// Direction towards each light and its relative intensity.
const LIGHTS: [([f32; 3], f32); 3] = [
    ([0.0, 1.0, 0.0], 0.98),
    ([1.0, 0.0, 0.0], 0.8),
    ([-1.0, 0.0, -0.5], 0.608),
];

const GRID_Y: f32 = -8.0;
const GRID_HALF: i32 = 5;
const GRID_CELL: f32 = 16.0;
const AXES_LENGTH: f32 = 80.0;

/// The model currently on the surface.
struct Scene {
    name: String,
    cache: TextureCache,
    meshes: Vec<RenderableMesh>,
}

/// Renders models from an asset source into RGBA frames.
pub struct SoftwareSurface<'a, S: AssetSource + ?Sized> {
    source: &'a S,
    options: RenderOptions,
    /// Extra camera yaw accumulated by auto-rotate, in radians.
    orbit: f32,
    scene: Option<Scene>,
}

impl<'a, S: AssetSource + ?Sized> SoftwareSurface<'a, S> {
    pub fn new(source: &'a S, options: RenderOptions) -> Self {
        Self {
            source,
            options,
            orbit: 0.0,
            scene: None,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Replace the scene with `model`, loading its textures from the source.
    pub fn load(&mut self, name: &str, model: &ResolvedModel) {
        let cache = TextureCache::load(model, self.source);
        let meshes = build_meshes(model, &cache);
        tracing::debug!("Loaded {} into the scene ({} meshes)", name, meshes.len());

        self.scene = Some(Scene {
            name: name.to_string(),
            cache,
            meshes,
        });
    }

    /// Name of the model on the surface, if any.
    pub fn current(&self) -> Option<&str> {
        self.scene.as_ref().map(|scene| scene.name.as_str())
    }

    pub fn clear(&mut self) {
        self.scene = None;
    }

    /// Advance animated textures and auto-rotate. Returns true if the next
    /// frame will differ.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let mut changed = false;
        if let Some(scene) = &mut self.scene {
            changed |= scene.cache.tick(delta);
        }
        if self.options.auto_rotate {
            // OrbitControls speed units: 2.0 is 30 seconds per turn
            let step = delta.as_secs_f32() * self.options.auto_rotate_speed * TAU / 60.0;
            self.orbit = (self.orbit + step).rem_euclid(TAU);
            changed = true;
        }
        changed
    }

    /// [`tick`](Self::tick) by a whole number of game ticks.
    pub fn advance_ticks(&mut self, ticks: u32) -> bool {
        self.tick(Duration::from_millis(u64::from(ticks) * TICK_MS))
    }

    fn camera_direction(&self) -> Vec3 {
        let yaw = CAMERA_YAW_DEG.to_radians() + self.orbit;
        let pitch = CAMERA_PITCH_DEG.to_radians();
        Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), -pitch.cos() * yaw.sin())
    }

    /// Draw the current scene.
    pub fn render(&self) -> RgbaImage {
        let size = self.options.size;
        let mut frame = Frame::new(size, self.options.background);

        let eye = self.camera_direction();
        let view = Mat4::look_at_rh(eye * CAMERA_DISTANCE, Vec3::ZERO, Vec3::Y);
        let scale = size as f32 / VIEW_EXTENT;
        let half = size as f32 / 2.0;
        let project = |p: Vec3| {
            let v = view.transform_point3(p);
            Vec3::new(half + v.x * scale, half - v.y * scale, -v.z)
        };

        if self.options.show_grid {
            draw_grid(&mut frame, &project);
        }
        if self.options.show_axes {
            draw_axes(&mut frame, &project);
        }

        let Some(scene) = &self.scene else {
            return frame.color;
        };

        let model = Mat4::from_rotation_y(MODEL_YAW_DEG.to_radians());
        for mesh in &scene.meshes {
            let world = mesh.geometry.mesh.transformed(&(model * mesh.transform));

            for group in &mesh.geometry.groups {
                let Some(paint) = Paint::new(&mesh.materials[group.material_index], &scene.cache)
                else {
                    continue;
                };

                let indices = &world.indices[group.start..group.start + group.count];
                for tri in indices.chunks_exact(3) {
                    let corners = [tri[0], tri[1], tri[2]].map(|i| world.vertices[i as usize]);
                    let normal = Vec3::from(corners[0].normal);
                    if normal.dot(eye) <= 0.0 {
                        continue;
                    }

                    let light = if paint.shaded() { light_factor(normal) } else { 1.0 };
                    let points = corners.map(|c| project(Vec3::from(c.position)));
                    let uvs = corners.map(|c| c.uv);
                    frame.fill_triangle(points, uvs, |u, v| paint.sample(u, v, light));
                }
            }
        }

        frame.color
    }

    /// Draw the current scene and encode it as PNG.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        encode_png(&self.render())
    }
}

impl<'a, S: AssetSource + ?Sized> RenderSurface for SoftwareSurface<'a, S> {
    fn submit(&mut self, request: RenderRequest) {
        self.load(&request.name, &request.model);
        let frame = self.render();
        request.ready(Box::new(move || encode_png(&frame)));
    }
}

/// Brightness of a lit surface facing `normal`, gamma encoded.
fn light_factor(normal: Vec3) -> f32 {
    let direct: f32 = LIGHTS
        .iter()
        .map(|(direction, intensity)| {
            let l = Vec3::from(*direction).normalize();
            LIGHT_POWER * intensity * normal.dot(l).max(0.0)
        })
        .sum();
    let linear = ((AMBIENT_INTENSITY + direct) / PI).min(1.0);
    linear.powf(1.0 / 2.2)
}

/// What a face is painted with, borrowed from the scene.
enum Paint<'a> {
    Flat { rgba: [f32; 4] },
    Texture {
        image: &'a RgbaImage,
        alpha_test: f32,
        shaded: bool,
    },
}

impl<'a> Paint<'a> {
    fn new(material: &'a Material, cache: &'a TextureCache) -> Option<Self> {
        match material {
            Material::Invisible => None,
            Material::Placeholder { color, opacity } => {
                let [r, g, b] = Material::color_rgb(*color);
                Some(Paint::Flat {
                    rgba: [r, g, b, *opacity],
                })
            }
            Material::Textured {
                source,
                shaded,
                alpha_test,
            } => {
                let image = match source {
                    TextureSource::Static(image) => image,
                    TextureSource::Animated(path) => cache.animated(path)?.buffer(),
                };
                if image.width() == 0 || image.height() == 0 {
                    return None;
                }
                Some(Paint::Texture {
                    image,
                    alpha_test: *alpha_test,
                    shaded: *shaded,
                })
            }
        }
    }

    fn shaded(&self) -> bool {
        match self {
            Paint::Flat { .. } => true,
            Paint::Texture { shaded, .. } => *shaded,
        }
    }

    fn sample(&self, u: f32, v: f32, light: f32) -> Option<[f32; 4]> {
        match self {
            Paint::Flat { rgba } => Some([rgba[0] * light, rgba[1] * light, rgba[2] * light, rgba[3]]),
            Paint::Texture {
                image, alpha_test, ..
            } => {
                let x = ((u * image.width() as f32) as u32).min(image.width() - 1);
                let y = ((v * image.height() as f32) as u32).min(image.height() - 1);
                let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
                let alpha = a as f32 / 255.0;
                if alpha < *alpha_test {
                    return None;
                }
                Some([
                    r as f32 / 255.0 * light,
                    g as f32 / 255.0 * light,
                    b as f32 / 255.0 * light,
                    alpha,
                ])
            }
        }
    }
}

/// Colour and depth buffers.
struct Frame {
    color: RgbaImage,
    depth: Vec<f32>,
    size: u32,
}

impl Frame {
    fn new(size: u32, background: [u8; 4]) -> Self {
        Self {
            color: RgbaImage::from_pixel(size, size, Rgba(background)),
            depth: vec![f32::INFINITY; (size as usize) * (size as usize)],
            size,
        }
    }

    /// Depth-tested write, alpha-blended over what is already there.
    fn plot(&mut self, x: i64, y: i64, depth: f32, rgba: [f32; 4]) {
        if x < 0 || y < 0 || x >= self.size as i64 || y >= self.size as i64 {
            return;
        }
        let index = y as usize * self.size as usize + x as usize;
        if depth >= self.depth[index] {
            return;
        }
        self.depth[index] = depth;

        let pixel = self.color.get_pixel_mut(x as u32, y as u32);
        *pixel = blend_over(rgba, *pixel);
    }

    fn fill_triangle<F>(&mut self, points: [Vec3; 3], uvs: [[f32; 2]; 3], shade: F)
    where
        F: Fn(f32, f32) -> Option<[f32; 4]>,
    {
        let [p0, p1, p2] = points;
        let area = edge(p0, p1, p2);
        if area.abs() < 1e-8 {
            return;
        }

        let max = self.size as f32 - 1.0;
        let min_x = p0.x.min(p1.x).min(p2.x).floor().clamp(0.0, max) as i64;
        let max_x = p0.x.max(p1.x).max(p2.x).ceil().clamp(0.0, max) as i64;
        let min_y = p0.y.min(p1.y).min(p2.y).floor().clamp(0.0, max) as i64;
        let max_y = p0.y.max(p1.y).max(p2.y).ceil().clamp(0.0, max) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
                let w0 = edge(p1, p2, p) / area;
                let w1 = edge(p2, p0, p) / area;
                let w2 = edge(p0, p1, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * p0.z + w1 * p1.z + w2 * p2.z;
                let u = w0 * uvs[0][0] + w1 * uvs[1][0] + w2 * uvs[2][0];
                let v = w0 * uvs[0][1] + w1 * uvs[1][1] + w2 * uvs[2][1];
                if let Some(rgba) = shade(u, v) {
                    self.plot(x, y, depth, rgba);
                }
            }
        }
    }

    fn draw_line(&mut self, a: Vec3, b: Vec3, rgba: [f32; 4]) {
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = a.lerp(b, i as f32 / steps as f32);
            self.plot(p.x.floor() as i64, p.y.floor() as i64, p.z, rgba);
        }
    }
}

/// Signed area test of `p` against the edge `a -> b` in screen space.
fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Straight-alpha "over" compositing of `src` onto `dst`.
fn blend_over(src: [f32; 4], dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3].clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let s = src[i].clamp(0.0, 1.0);
        let d = dst[i] as f32 / 255.0;
        let c = (s * sa + d * da * (1.0 - sa)) / out_a;
        (c * 255.0).round() as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}

fn hex_rgba(color: u32) -> [f32; 4] {
    let [r, g, b] = Material::color_rgb(color);
    [r, g, b, 1.0]
}

fn draw_grid(frame: &mut Frame, project: &impl Fn(Vec3) -> Vec3) {
    let extent = GRID_HALF as f32 * GRID_CELL;
    for i in -GRID_HALF..=GRID_HALF {
        let offset = i as f32 * GRID_CELL;
        let color = if i == 0 { hex_rgba(0x444444) } else { hex_rgba(0x888888) };
        frame.draw_line(
            project(Vec3::new(offset, GRID_Y, -extent)),
            project(Vec3::new(offset, GRID_Y, extent)),
            color,
        );
        frame.draw_line(
            project(Vec3::new(-extent, GRID_Y, offset)),
            project(Vec3::new(extent, GRID_Y, offset)),
            color,
        );
    }
}

fn draw_axes(frame: &mut Frame, project: &impl Fn(Vec3) -> Vec3) {
    let origin = project(Vec3::ZERO);
    for (axis, color) in [(Vec3::X, 0xff0000), (Vec3::Y, 0x00ff00), (Vec3::Z, 0x0000ff)] {
        frame.draw_line(origin, project(axis * AXES_LENGTH), hex_rgba(color));
    }
}
