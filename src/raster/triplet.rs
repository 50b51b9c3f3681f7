//! Per-triangle rasterization records.
//!
//! A triplet holds the three projected-and-pixelized vertices of one
//! triangle for the current frame only; the whole list is discarded and
//! rebuilt on every update. Scanline traversal works row by row:
//!
//! 1. `sort_vertical` orders the vertices by ascending pixel row
//! 2. `horizontal_limits` intersects a row with the two edges straddling it,
//!    chosen by comparing the row against the middle vertex
//!
//! Lighting accumulates additively into the triplet across all enabled
//! lights, then `finalize` clamps the result.

use crate::color::{colors, ColorRgb};
use crate::light::Light;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::node::DrawMode;

/// One projected vertex of a triplet.
#[derive(Clone, Copy, Debug)]
pub struct TripletVertex {
    /// Horizontal pixel coordinate.
    pub px: i32,
    /// Vertical pixel coordinate (0 at the top of the screen).
    pub py: i32,
    /// Normalized screen-space coordinates the pixel was derived from.
    pub screen: Vec2,
    /// View-space depth at this vertex.
    pub depth: f32,
    /// True when the vertex lies inside the `[-1, 1]` screen bounds.
    pub on_screen: bool,
}

/// Screen-space plane fit used to interpolate depth at any pixel.
///
/// Depth varies linearly over the projected triangle in this renderer's
/// screen parametrization, so a single plane through the three projected
/// vertices answers per-pixel depth queries.
#[derive(Clone, Copy, Debug)]
struct DepthPlane {
    a: f32,
    b: f32,
    c: f32,
}

impl DepthPlane {
    fn fit(v: &[TripletVertex; 3]) -> Self {
        let (x0, y0, z0) = (v[0].screen.x, v[0].screen.y, v[0].depth);
        let (x1, y1, z1) = (v[1].screen.x, v[1].screen.y, v[1].depth);
        let (x2, y2, z2) = (v[2].screen.x, v[2].screen.y, v[2].depth);

        let det = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
        if det.abs() < f32::EPSILON {
            // Degenerate projection; fall back to a constant plane
            return Self {
                a: (z0 + z1 + z2) / 3.0,
                b: 0.0,
                c: 0.0,
            };
        }
        let b = ((z1 - z0) * (y2 - y0) - (z2 - z0) * (y1 - y0)) / det;
        let c = ((x1 - x0) * (z2 - z0) - (x2 - x0) * (z1 - z0)) / det;
        let a = z0 - b * x0 - c * y0;
        Self { a, b, c }
    }

    fn depth_at(&self, sx: f32, sy: f32) -> f32 {
        self.a + self.b * sx + self.c * sy
    }
}

/// Transient rasterization record for one triangle.
#[derive(Clone, Copy, Debug)]
pub struct PixelTriplet {
    vertices: [TripletVertex; 3],
    /// World-space face normal of the source triangle.
    pub normal: Vec3,
    /// World-space triangle center.
    pub center: Vec3,
    /// Draw mode of the owning object.
    pub mode: DrawMode,
    /// Lighting accumulated over the scene's enabled lights.
    pub light: ColorRgb,
    plane: DepthPlane,
}

impl PixelTriplet {
    pub fn new(vertices: [TripletVertex; 3], normal: Vec3, center: Vec3, mode: DrawMode) -> Self {
        let plane = DepthPlane::fit(&vertices);
        Self {
            vertices,
            normal,
            center,
            mode,
            light: colors::BLACK,
            plane,
        }
    }

    pub fn vertices(&self) -> &[TripletVertex; 3] {
        &self.vertices
    }

    /// True when at least one vertex is on the screen; triplets failing this
    /// are never eligible for rasterization.
    pub fn good_to_draw(&self) -> bool {
        self.vertices.iter().any(|v| v.on_screen)
    }

    /// Orders the vertices by ascending pixel row, clamping rows to
    /// `[0, max_y]`.
    ///
    /// Returns `false` for triangles that collapse to nothing after clamping
    /// and rounding; such triangles produce no scanlines and are silently
    /// skipped, not treated as errors.
    pub fn sort_vertical(&mut self, max_y: i32) -> bool {
        for v in self.vertices.iter_mut() {
            v.py = v.py.clamp(0, max_y);
        }
        // Three comparisons suffice for 3 elements
        if self.vertices[1].py < self.vertices[0].py {
            self.vertices.swap(0, 1);
        }
        if self.vertices[2].py < self.vertices[1].py {
            self.vertices.swap(1, 2);
        }
        if self.vertices[1].py < self.vertices[0].py {
            self.vertices.swap(0, 1);
        }

        let flat = self.vertices[0].py == self.vertices[2].py;
        let thin = self.vertices[0].px == self.vertices[1].px
            && self.vertices[1].px == self.vertices[2].px;
        !(flat && thin)
    }

    /// Computes the left/right pixel bounds of the triangle on a scanline.
    ///
    /// Requires `sort_vertical` to have succeeded. The two edges straddling
    /// the row are chosen by comparing the row against the middle vertex;
    /// rows outside `[top, bottom]` return `None`. The bounds are re-derived
    /// on every call rather than trusting incremental edge state.
    pub fn horizontal_limits(&self, scanline: i32) -> Option<(i32, i32)> {
        let [v0, v1, v2] = &self.vertices;
        if scanline < v0.py || scanline > v2.py {
            return None;
        }

        let (x1, x2) = if scanline < v1.py {
            (edge_x(v0, v1, scanline), edge_x(v0, v2, scanline))
        } else {
            (edge_x(v1, v2, scanline), edge_x(v0, v2, scanline))
        };

        let left = x1.min(x2).round() as i32;
        let right = x1.max(x2).round() as i32;
        Some((left, right))
    }

    /// World-space center of the source triangle (used for normal overlays).
    pub fn center_point(&self) -> Vec3 {
        self.center
    }

    /// Interpolated view-space depth at a normalized screen coordinate.
    pub fn interpolated_depth(&self, sx: f32, sy: f32) -> f32 {
        self.plane.depth_at(sx, sy)
    }

    /// Resets accumulated lighting to black for a new frame.
    pub fn reset_lighting(&mut self) {
        self.light = colors::BLACK;
    }

    /// Adds one light's contribution; accumulation saturates at white.
    pub fn compute_lighting(&mut self, light: &Light) {
        self.light += light.contribution(self.center, self.normal);
    }

    /// Clamps the accumulated lighting into the displayable range.
    pub fn finalize(&mut self) {
        self.light = self.light.clamped();
        self.light.a = 1.0;
    }
}

/// X coordinate of the edge `a -> b` at a pixel row, by linear interpolation.
fn edge_x(a: &TripletVertex, b: &TripletVertex, y: i32) -> f32 {
    if b.py == a.py {
        return a.px as f32;
    }
    a.px as f32 + (b.px - a.px) as f32 * (y - a.py) as f32 / (b.py - a.py) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertex(px: i32, py: i32) -> TripletVertex {
        TripletVertex {
            px,
            py,
            screen: Vec2::ZERO,
            depth: 1.0,
            on_screen: true,
        }
    }

    fn triplet(v: [TripletVertex; 3]) -> PixelTriplet {
        PixelTriplet::new(v, Vec3::FORWARD, Vec3::ZERO, DrawMode::Wireframe)
    }

    #[test]
    fn horizontal_limits_reference_triangle() {
        // Vertices at rows (0, x=0), (0, x=10), (10, x=5)
        let mut t = triplet([vertex(0, 0), vertex(10, 0), vertex(5, 10)]);
        assert!(t.sort_vertical(100));

        assert_eq!(t.horizontal_limits(0), Some((0, 10)));
        assert_eq!(t.horizontal_limits(10), Some((5, 5)));
        assert_eq!(t.horizontal_limits(20), None);
    }

    #[test]
    fn limits_midway_down() {
        let mut t = triplet([vertex(0, 0), vertex(10, 0), vertex(5, 10)]);
        assert!(t.sort_vertical(100));
        // Halfway down the edges have closed in symmetrically
        let (x0, x1) = t.horizontal_limits(5).unwrap();
        assert_eq!(x0, 3);
        assert_eq!(x1, 8);
    }

    #[test]
    fn sort_orders_rows_ascending() {
        let mut t = triplet([vertex(5, 10), vertex(0, 0), vertex(10, 0)]);
        assert!(t.sort_vertical(100));
        let rows: Vec<i32> = t.vertices().iter().map(|v| v.py).collect();
        assert_eq!(rows, vec![0, 0, 10]);
    }

    #[test]
    fn degenerate_point_is_rejected() {
        let mut t = triplet([vertex(4, 3), vertex(4, 3), vertex(4, 3)]);
        assert!(!t.sort_vertical(100));
    }

    #[test]
    fn offscreen_triangle_collapses_after_clamping() {
        // Entirely above the screen and collinear in x once clamped to row 0
        let mut t = triplet([vertex(2, -30), vertex(2, -20), vertex(2, -10)]);
        assert!(!t.sort_vertical(100));
    }

    #[test]
    fn good_to_draw_requires_one_on_screen_vertex() {
        let mut off = vertex(0, 0);
        off.on_screen = false;
        let t = triplet([off, off, off]);
        assert!(!t.good_to_draw());

        let t = triplet([off, vertex(1, 1), off]);
        assert!(t.good_to_draw());
    }

    #[test]
    fn lighting_accumulates_and_finalizes() {
        let mut t = triplet([vertex(0, 0), vertex(10, 0), vertex(5, 10)]);
        t.normal = Vec3::new(0.0, 0.0, 1.0);
        t.reset_lighting();
        let light = Light::directional(Vec3::new(0.0, 0.0, -1.0)).with_intensity(0.4);
        t.compute_lighting(&light);
        t.compute_lighting(&light);
        t.finalize();
        assert_relative_eq!(t.light.r, 0.8, epsilon = 1e-5);
        assert_eq!(t.light.a, 1.0);
    }

    #[test]
    fn depth_plane_interpolates_vertex_depths() {
        let mut v = [vertex(0, 0), vertex(10, 0), vertex(5, 10)];
        v[0].screen = Vec2::new(-1.0, 1.0);
        v[0].depth = 2.0;
        v[1].screen = Vec2::new(1.0, 1.0);
        v[1].depth = 4.0;
        v[2].screen = Vec2::new(0.0, -1.0);
        v[2].depth = 3.0;
        let t = triplet(v);

        assert_relative_eq!(t.interpolated_depth(-1.0, 1.0), 2.0, epsilon = 1e-4);
        assert_relative_eq!(t.interpolated_depth(1.0, 1.0), 4.0, epsilon = 1e-4);
        assert_relative_eq!(t.interpolated_depth(0.0, -1.0), 3.0, epsilon = 1e-4);
        // Center of the triangle sits at the mean depth
        assert_relative_eq!(
            t.interpolated_depth(0.0, 1.0 / 3.0),
            3.0,
            epsilon = 1e-4
        );
    }
}
