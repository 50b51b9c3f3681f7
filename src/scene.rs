//! Scene orchestration: the per-frame pipeline and frame pacing.
//!
//! Each `update` runs the full pipeline against the current state:
//! clear, transform and project every object, light the render-mode
//! triangles, rasterize per draw mode, draw overlays, then poll events and
//! present. Nothing persists between frames except the objects themselves;
//! the triplet list and depth buffer are rebuilt from scratch every update.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::camera::Camera;
use crate::color::{colors, ColorRgb};
use crate::geometry::{GeometryError, Shape, Vertex};
use crate::light::Light;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::node::{DrawMode, Node, NodeArena, NodeError, NodeId};
use crate::raster::{DepthBuffer, PixelTriplet, TripletVertex};
use crate::surface::DrawSurface;

/// Default frame cap, in frames per second.
const DEFAULT_FRAMERATE_CAP: u32 = 60;

/// Top-level renderer state: objects, lights, camera and the drawing surface.
pub struct Scene<S: DrawSurface> {
    surface: S,
    arena: NodeArena,
    camera: Camera,
    lights: Vec<Light>,
    triplets: Vec<PixelTriplet>,
    depth: DepthBuffer,
    background: ColorRgb,
    draw_normals: bool,
    draw_origin: bool,
    draw_depth_map: bool,
    framerate_cap: u32,
    framerate: f32,
    frame_counter: u32,
    accum_micros: u64,
    last_frame: Instant,
    created: Instant,
}

impl<S: DrawSurface> Scene<S> {
    /// Creates a scene drawing into `surface`, with the camera at the origin
    /// and a single world directional light shining along +Z.
    pub fn new(surface: S) -> Self {
        let width = surface.width();
        let height = surface.height();
        let camera = Camera::new(Vec3::ZERO, width as f32 / height as f32);

        info!("scene ready on a {width}x{height} surface");

        Self {
            surface,
            arena: NodeArena::new(),
            camera,
            lights: vec![Light::directional(Vec3::FORWARD)],
            triplets: Vec::new(),
            depth: DepthBuffer::new(width, height),
            background: colors::BLACK,
            draw_normals: false,
            draw_origin: false,
            draw_depth_map: false,
            framerate_cap: DEFAULT_FRAMERATE_CAP,
            framerate: 0.0,
            frame_counter: 0,
            accum_micros: 0,
            last_frame: Instant::now(),
            created: Instant::now(),
        }
    }

    /// Registers an object and builds its geometry immediately, so a shape
    /// with bad indices fails here rather than mid-frame.
    pub fn add_object(&mut self, shape: Shape, position: Vec3) -> Result<NodeId, GeometryError> {
        let id = self.arena.insert(shape, position);
        self.arena.get_mut(id).build()?;
        debug!(
            "registered object {:?}: {} vertices, {} triangles",
            id,
            self.arena.get(id).vertex_count(),
            self.arena.get(id).triangle_count()
        );
        Ok(id)
    }

    /// Adds a light and returns its index. Index 0 is the world light the
    /// scene was created with.
    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn light_mut(&mut self, index: usize) -> &mut Light {
        &mut self.lights[index]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.arena.get_mut(id)
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId, offset: Vec3) -> Result<(), NodeError> {
        self.arena.add_child(parent, child, offset)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        self.arena.remove_child(parent, child)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn set_background(&mut self, color: ColorRgb) {
        self.background = color;
    }

    pub fn set_draw_normals(&mut self, on: bool) {
        self.draw_normals = on;
    }

    pub fn set_draw_origin(&mut self, on: bool) {
        self.draw_origin = on;
    }

    /// Replaces render-mode shading with a depth heat map.
    pub fn set_draw_depth_map(&mut self, on: bool) {
        self.draw_depth_map = on;
    }

    /// Sets the frame-rate cap in frames per second. Zero disables pacing:
    /// `sync` then only measures time without sleeping.
    pub fn set_framerate_cap(&mut self, cap: u32) {
        self.framerate_cap = cap;
        self.frame_counter = 0;
        self.accum_micros = 0;
    }

    /// Measured framerate, averaged over the last cap-sized window of frames.
    pub fn framerate(&self) -> f32 {
        self.framerate
    }

    /// Seconds since the scene was created.
    pub fn time_elapsed(&self) -> f32 {
        self.created.elapsed().as_secs_f32()
    }

    /// Number of triangles queued for rasterization in the last update.
    pub fn triplet_count(&self) -> usize {
        self.triplets.len()
    }

    /// Runs one frame of the pipeline. Returns `false` once the surface has
    /// been closed; the frame in progress is still presented.
    pub fn update(&mut self) -> bool {
        let width = self.surface.width();
        let height = self.surface.height();
        if self.depth.width() != width || self.depth.height() != height {
            debug!("viewport resized to {width}x{height}");
            self.depth.resize(width, height);
            self.camera.set_aspect_ratio(width as f32 / height as f32);
        }

        self.surface.clear(self.background);

        // Transform and project every hierarchy from its root
        let roots: Vec<NodeId> = self
            .arena
            .ids()
            .filter(|&id| self.arena.get(id).parent().is_none())
            .collect();
        for root in roots {
            self.arena.render_all_vertices(root, &self.camera);
        }

        self.collect_triplets(width, height);
        self.light_triplets();
        self.rasterize(width, height);

        if self.draw_normals {
            for index in 0..self.triplets.len() {
                let triplet = self.triplets[index];
                self.draw_vector(triplet.center_point(), triplet.normal * 0.25, colors::RED);
            }
        }
        if self.draw_origin {
            self.draw_vector(Vec3::ZERO, Vec3::RIGHT, colors::RED);
            self.draw_vector(Vec3::ZERO, Vec3::UP, colors::GREEN);
            self.draw_vector(Vec3::ZERO, Vec3::FORWARD, colors::BLUE);
        }

        let open = self.surface.process_events();
        self.surface.present();
        if !open {
            info!("surface closed; scene is done");
        }
        open
    }

    /// Sleeps out the remainder of the frame budget and returns the total
    /// frame time in seconds. With a cap of zero no sleep happens and only
    /// the elapsed time is measured.
    ///
    /// A frame that overruns its budget is not compensated for later; the
    /// next frame gets the full budget again.
    pub fn sync(&mut self) -> f32 {
        if self.framerate_cap > 0 {
            let target = 1_000_000u64 / self.framerate_cap as u64;
            let elapsed = self.last_frame.elapsed().as_micros() as u64;
            if elapsed < target {
                thread::sleep(Duration::from_micros(target - elapsed));
            }
        }
        let total = self.last_frame.elapsed().as_micros() as u64;
        self.last_frame = Instant::now();

        self.accum_micros += total;
        self.frame_counter += 1;
        if self.framerate_cap > 0 && self.frame_counter >= self.framerate_cap {
            self.framerate = self.frame_counter as f32 * 1_000_000.0 / self.accum_micros as f32;
            debug!("framerate: {:.1} Hz", self.framerate);
            self.frame_counter = 0;
            self.accum_micros = 0;
        }
        total as f32 * 1.0e-6
    }

    /// Rebuilds the frame's triplet list from the projected geometry.
    fn collect_triplets(&mut self, width: u32, height: u32) {
        self.triplets.clear();
        for id in self.arena.ids() {
            let rotation = self.arena.world_rotation(id);
            let node = self.arena.get(id);
            let mode = node.mode();
            let geometry = node.geometry();
            for triangle in geometry.triangles() {
                let v0 = geometry.vertices()[triangle.i0 as usize];
                let v1 = geometry.vertices()[triangle.i1 as usize];
                let v2 = geometry.vertices()[triangle.i2 as usize];
                if !v0.visible || !v1.visible || !v2.visible {
                    continue;
                }

                let center = (v0.world + v1.world + v2.world) / 3.0;
                // Registered face normals only need rotating, never rescaling
                let normal = rotation * triangle.normal;
                if mode != DrawMode::Wireframe && !self.camera.check_culling(center, normal) {
                    continue;
                }

                let mut triplet = PixelTriplet::new(
                    [
                        make_triplet_vertex(&v0, width, height),
                        make_triplet_vertex(&v1, width, height),
                        make_triplet_vertex(&v2, width, height),
                    ],
                    normal,
                    center,
                    mode,
                );
                if !triplet.good_to_draw() {
                    continue;
                }
                if !triplet.sort_vertical(height as i32 - 1) {
                    continue;
                }
                self.triplets.push(triplet);
            }
        }
    }

    /// Accumulates every enabled light into the render-mode triplets.
    fn light_triplets(&mut self) {
        for triplet in &mut self.triplets {
            if triplet.mode != DrawMode::Render {
                continue;
            }
            triplet.reset_lighting();
            for light in &self.lights {
                if light.is_enabled() {
                    triplet.compute_lighting(light);
                }
            }
            triplet.finalize();
        }
    }

    fn rasterize(&mut self, width: u32, height: u32) {
        let has_render = self.triplets.iter().any(|t| t.mode == DrawMode::Render);
        if has_render {
            self.depth.reset();
            let far = self.camera.z_far();

            // Depth pass: nearest triplet wins each pixel
            for (index, triplet) in self.triplets.iter().enumerate() {
                if triplet.mode != DrawMode::Render {
                    continue;
                }
                let top = triplet.vertices()[0].py;
                let bottom = triplet.vertices()[2].py;
                for scanline in top..=bottom {
                    if let Some((left, right)) = triplet.horizontal_limits(scanline) {
                        for x in left.max(0)..=right.min(width as i32 - 1) {
                            let (sx, sy) = pixel_to_screen(x, scanline, width, height);
                            let depth = triplet.interpolated_depth(sx, sy);
                            if depth < 0.0 || depth > far {
                                continue;
                            }
                            self.depth.set(x, scanline, depth, index);
                        }
                    }
                }
            }

            // Blit pass
            for y in 0..height as i32 {
                for x in 0..width as i32 {
                    if let Some(index) = self.depth.triplet(x, y) {
                        let color = if self.draw_depth_map {
                            ColorRgb::heat_map(self.depth.depth(x, y), far)
                        } else {
                            self.triplets[index].light
                        };
                        self.surface.set_draw_color(color);
                        self.surface.draw_pixel(x, y);
                    }
                }
            }
        }

        for index in 0..self.triplets.len() {
            let triplet = self.triplets[index];
            match triplet.mode {
                DrawMode::Render => {}
                DrawMode::Solid => {
                    self.fill_triangle(&triplet);
                    self.outline_triangle(&triplet, colors::BLACK);
                }
                DrawMode::Wireframe | DrawMode::Mesh => {
                    self.outline_triangle(&triplet, colors::WHITE);
                }
            }
        }
    }

    fn fill_triangle(&mut self, triplet: &PixelTriplet) {
        self.surface.set_draw_color(colors::WHITE);
        let top = triplet.vertices()[0].py;
        let bottom = triplet.vertices()[2].py;
        for scanline in top..=bottom {
            if let Some((left, right)) = triplet.horizontal_limits(scanline) {
                self.surface.draw_line(left, scanline, right, scanline);
            }
        }
    }

    fn outline_triangle(&mut self, triplet: &PixelTriplet, color: ColorRgb) {
        self.surface.set_draw_color(color);
        let [v0, v1, v2] = *triplet.vertices();
        self.surface.draw_line(v0.px, v0.py, v1.px, v1.py);
        self.surface.draw_line(v1.px, v1.py, v2.px, v2.py);
        self.surface.draw_line(v2.px, v2.py, v0.px, v0.py);
    }

    /// Draws a single world-space point, skipping it when projection fails.
    pub fn draw_point(&mut self, point: Vec3, color: ColorRgb) {
        let width = self.surface.width();
        let height = self.surface.height();
        let Some(projected) = self.camera.project_point(point) else {
            return;
        };
        let (x, y) = screen_to_pixel(projected.screen, width, height);
        self.surface.set_draw_color(color);
        self.surface.draw_pixel(x, y);
    }

    /// Draws a world-space vector as a line, skipping it when either endpoint
    /// fails projection.
    pub fn draw_vector(&mut self, origin: Vec3, direction: Vec3, color: ColorRgb) {
        let width = self.surface.width();
        let height = self.surface.height();
        let (Some(from), Some(to)) = (
            self.camera.project_point(origin),
            self.camera.project_point(origin + direction),
        ) else {
            return;
        };
        let (x0, y0) = screen_to_pixel(from.screen, width, height);
        let (x1, y1) = screen_to_pixel(to.screen, width, height);
        self.surface.set_draw_color(color);
        self.surface.draw_line(x0, y0, x1, y1);
    }
}

/// Maps normalized screen coordinates (+Y up) to pixel coordinates (+Y down).
fn screen_to_pixel(screen: Vec2, width: u32, height: u32) -> (i32, i32) {
    (
        ((screen.x + 1.0) * 0.5 * width as f32).round() as i32,
        ((1.0 - screen.y) * 0.5 * height as f32).round() as i32,
    )
}

/// Inverse of `screen_to_pixel`, evaluated at the pixel's grid point.
fn pixel_to_screen(x: i32, y: i32, width: u32, height: u32) -> (f32, f32) {
    (
        2.0 * x as f32 / width as f32 - 1.0,
        1.0 - 2.0 * y as f32 / height as f32,
    )
}

fn check_screen_space(screen: Vec2) -> bool {
    screen.x >= -1.0 && screen.x <= 1.0 && screen.y >= -1.0 && screen.y <= 1.0
}

fn make_triplet_vertex(vertex: &Vertex, width: u32, height: u32) -> TripletVertex {
    let (px, py) = screen_to_pixel(vertex.screen, width, height);
    TripletVertex {
        px,
        py,
        screen: vertex.screen,
        depth: vertex.depth,
        on_screen: check_screen_space(vertex.screen),
    }
}
