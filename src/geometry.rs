//! Vertex and triangle containers plus the primitive shape builders.
//!
//! Every object owns one [`Geometry`]: a deduplicated vertex buffer and a list
//! of index triangles. Vertices carry both their immutable original
//! coordinates and the per-frame transformed/projected state, so the transform
//! step never accumulates floating-point error across frames.

use thiserror::Error;

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// Tolerance used when deduplicating vertices added through `add_vertex`.
const VERTEX_MERGE_EPSILON: f32 = 1e-6;

/// Fatal geometry construction errors.
///
/// These violate container invariants and are raised at build time; they are
/// never produced during the per-frame pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("triangle index {index} out of range ({count} vertices registered)")]
    InvalidIndex { index: u32, count: u32 },
}

/// A single vertex: original coordinates plus per-frame transform results.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    /// The immutable model-space position registered at build time.
    pub original: Vec3,
    /// World-space position produced by the most recent transform step.
    pub world: Vec3,
    /// Normalized screen-space projection of `world`.
    pub screen: Vec2,
    /// View-space depth of the projected point.
    pub depth: f32,
    /// True when the most recent projection succeeded (in front of the near plane).
    pub visible: bool,
}

impl Vertex {
    fn new(position: Vec3) -> Self {
        Self {
            original: position,
            world: position,
            screen: Vec2::ZERO,
            depth: 0.0,
            visible: false,
        }
    }
}

/// An index triangle with its face normal in model space.
///
/// The normal is derived from the original vertex positions at registration
/// time (counter-clockwise winding) and rotated alongside the object.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub i0: u32,
    pub i1: u32,
    pub i2: u32,
    pub normal: Vec3,
}

/// Deduplicated vertex buffer and triangle list for one object.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a vertex, reusing an existing one at the same position.
    ///
    /// Returns the index to pass to `add_triangle`/`add_quad`.
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> u32 {
        let position = Vec3::new(x, y, z);
        for (i, v) in self.vertices.iter().enumerate() {
            if v.original.distance(position) < VERTEX_MERGE_EPSILON {
                return i as u32;
            }
        }
        self.vertices.push(Vertex::new(position));
        (self.vertices.len() - 1) as u32
    }

    /// Registers a triangle over three previously added vertices.
    ///
    /// Fails fast with [`GeometryError::InvalidIndex`] if any index does not
    /// reference an existing vertex; a dangling index would silently corrupt
    /// the per-frame pipeline otherwise.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) -> Result<(), GeometryError> {
        let count = self.vertices.len() as u32;
        for index in [i0, i1, i2] {
            if index >= count {
                return Err(GeometryError::InvalidIndex { index, count });
            }
        }

        let p0 = self.vertices[i0 as usize].original;
        let p1 = self.vertices[i1 as usize].original;
        let p2 = self.vertices[i2 as usize].original;
        let normal = (p1 - p0).cross(p2 - p0).normalize();

        self.triangles.push(Triangle { i0, i1, i2, normal });
        Ok(())
    }

    /// Registers a quadrilateral as two triangles sharing the `i0`-`i2` diagonal.
    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) -> Result<(), GeometryError> {
        self.add_triangle(i0, i1, i2)?;
        self.add_triangle(i0, i2, i3)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

/// The closed set of primitive shapes an object can be built from.
///
/// Each variant generates its geometry through the shared registration
/// primitives, replacing the deep builder inheritance of classic scene-graph
/// designs with tag dispatch.
#[derive(Clone, Debug)]
pub enum Shape {
    /// Axis-aligned rectangle in the XY plane, centered on the origin.
    Plane { width: f32, height: f32 },
    /// Axis-aligned box centered on the origin.
    Cube { width: f32, height: f32, depth: f32 },
    /// Flat disc in the XY plane approximated by `sides` rim vertices.
    Circle { radius: f32, sides: u32 },
    /// Cylinder along the Z axis with capped ends.
    Cylinder { radius: f32, depth: f32, sides: u32 },
    /// Cone along the Z axis with a capped base.
    Cone { radius: f32, depth: f32, sides: u32 },
    /// Latitude/longitude sphere.
    Sphere { radius: f32, divisions: u32 },
    /// Pre-built geometry supplied by the application.
    Custom(Geometry),
}

impl Shape {
    /// Generates this shape's vertices and triangles into `geom`.
    pub fn build_into(&self, geom: &mut Geometry) -> Result<(), GeometryError> {
        match *self {
            Shape::Plane { width, height } => build_plane(geom, width / 2.0, height / 2.0),
            Shape::Cube {
                width,
                height,
                depth,
            } => build_cube(geom, width / 2.0, height / 2.0, depth / 2.0),
            Shape::Circle { radius, sides } => {
                let rim = approximate_circle(geom, radius, sides.max(3), 0.0);
                fill_disc(geom, &rim, 0.0, false)
            }
            Shape::Cylinder {
                radius,
                depth,
                sides,
            } => build_cylinder(geom, radius, depth / 2.0, sides.max(3)),
            Shape::Cone {
                radius,
                depth,
                sides,
            } => build_cone(geom, radius, depth / 2.0, sides.max(3)),
            Shape::Sphere { radius, divisions } => build_sphere(geom, radius, divisions.max(2)),
            Shape::Custom(ref source) => {
                *geom = source.clone();
                Ok(())
            }
        }
    }
}

fn build_plane(geom: &mut Geometry, dx: f32, dy: f32) -> Result<(), GeometryError> {
    let v0 = geom.add_vertex(-dx, -dy, 0.0);
    let v1 = geom.add_vertex(dx, -dy, 0.0);
    let v2 = geom.add_vertex(dx, dy, 0.0);
    let v3 = geom.add_vertex(-dx, dy, 0.0);
    geom.add_quad(v0, v1, v2, v3)
}

fn build_cube(geom: &mut Geometry, dx: f32, dy: f32, dz: f32) -> Result<(), GeometryError> {
    // Near face (-z) then far face (+z); shared corners are merged by add_vertex
    let n0 = geom.add_vertex(-dx, -dy, -dz);
    let n1 = geom.add_vertex(dx, -dy, -dz);
    let n2 = geom.add_vertex(dx, dy, -dz);
    let n3 = geom.add_vertex(-dx, dy, -dz);
    let f0 = geom.add_vertex(-dx, -dy, dz);
    let f1 = geom.add_vertex(dx, -dy, dz);
    let f2 = geom.add_vertex(dx, dy, dz);
    let f3 = geom.add_vertex(-dx, dy, dz);

    // Winding chosen so every face normal points out of the box
    geom.add_quad(n0, n3, n2, n1)?; // front (-z)
    geom.add_quad(f0, f1, f2, f3)?; // back (+z)
    geom.add_quad(n1, n2, f2, f1)?; // right (+x)
    geom.add_quad(n0, f0, f3, n3)?; // left (-x)
    geom.add_quad(n3, f3, f2, n2)?; // top (+y)
    geom.add_quad(n0, n1, f1, f0) // bottom (-y)
}

/// Adds `sides` vertices around a circle at the given z offset and returns them.
fn approximate_circle(geom: &mut Geometry, radius: f32, sides: u32, z: f32) -> Vec<u32> {
    (0..sides)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / sides as f32;
            geom.add_vertex(radius * angle.cos(), radius * angle.sin(), z)
        })
        .collect()
}

/// Triangulates a rim of vertices around a central vertex at `z`.
fn fill_disc(geom: &mut Geometry, rim: &[u32], z: f32, flip: bool) -> Result<(), GeometryError> {
    let center = geom.add_vertex(0.0, 0.0, z);
    for i in 0..rim.len() {
        let a = rim[i];
        let b = rim[(i + 1) % rim.len()];
        if flip {
            geom.add_triangle(center, b, a)?;
        } else {
            geom.add_triangle(center, a, b)?;
        }
    }
    Ok(())
}

fn build_cylinder(geom: &mut Geometry, radius: f32, dz: f32, sides: u32) -> Result<(), GeometryError> {
    let near = approximate_circle(geom, radius, sides, -dz);
    let far = approximate_circle(geom, radius, sides, dz);
    for i in 0..sides as usize {
        let j = (i + 1) % sides as usize;
        geom.add_quad(near[i], near[j], far[j], far[i])?;
    }
    fill_disc(geom, &near, -dz, true)?;
    fill_disc(geom, &far, dz, false)
}

fn build_cone(geom: &mut Geometry, radius: f32, dz: f32, sides: u32) -> Result<(), GeometryError> {
    let base = approximate_circle(geom, radius, sides, -dz);
    let apex = geom.add_vertex(0.0, 0.0, dz);
    for i in 0..sides as usize {
        let j = (i + 1) % sides as usize;
        geom.add_triangle(apex, base[i], base[j])?;
    }
    fill_disc(geom, &base, -dz, true)
}

fn build_sphere(geom: &mut Geometry, radius: f32, divisions: u32) -> Result<(), GeometryError> {
    // Latitude rings between the poles; shared seam vertices merge automatically
    let rings = divisions;
    let segments = divisions * 2;
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(rings as usize + 1);
    for ring in 0..=rings {
        let polar = std::f32::consts::PI * ring as f32 / rings as f32;
        let mut row = Vec::with_capacity(segments as usize);
        for seg in 0..segments {
            let azimuth = std::f32::consts::TAU * seg as f32 / segments as f32;
            row.push(geom.add_vertex(
                radius * polar.sin() * azimuth.cos(),
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
            ));
        }
        grid.push(row);
    }

    for ring in 0..rings as usize {
        for seg in 0..segments as usize {
            let next = (seg + 1) % segments as usize;
            let (a, b) = (grid[ring][seg], grid[ring][next]);
            let (c, d) = (grid[ring + 1][next], grid[ring + 1][seg]);
            if ring == 0 {
                // Top cap: a == b at the pole
                geom.add_triangle(a, d, c)?;
            } else if ring == rings as usize - 1 {
                // Bottom cap: c == d at the pole
                geom.add_triangle(a, d, b)?;
            } else {
                geom.add_quad(a, d, c, b)?;
            }
        }
    }
    Ok(())
}
