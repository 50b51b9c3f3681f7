//! A CPU-based real-time 3D scene renderer.
//!
//! This crate rasterizes hierarchical scenes of primitive shapes entirely on
//! the CPU, using SDL2 only for window management, input and display.
//!
//! # Quick Start
//!
//! ```ignore
//! use softscene::prelude::*;
//!
//! let surface = SdlSurface::new("My App", 800, 600)?;
//! let mut scene = Scene::new(surface);
//! let cube = scene.add_object(
//!     Shape::Cube { width: 1.0, height: 1.0, depth: 1.0 },
//!     Vec3::new(0.0, 0.0, 4.0),
//! )?;
//! scene.node_mut(cube).set_mode(DrawMode::Render);
//! while scene.update() {
//!     scene.sync();
//! }
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod color;
pub mod geometry;
pub mod light;
pub mod math;
pub mod node;
pub mod scene;
pub mod surface;

// Internal modules - used within the crate only
pub(crate) mod raster;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use geometry::{Geometry, GeometryError, Shape};
pub use node::{DrawMode, NodeError, NodeId};
pub use scene::Scene;
pub use surface::{BufferSurface, DrawSurface, SdlSurface, SurfaceError};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softscene::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::scene::Scene;

    // Objects
    pub use crate::geometry::{Geometry, Shape};
    pub use crate::node::{DrawMode, NodeId};

    // Camera & lighting
    pub use crate::camera::Camera;
    pub use crate::color::{colors, ColorRgb};
    pub use crate::light::Light;

    // Math
    pub use crate::math::angle::WrappedAngle;
    pub use crate::math::mat3::Mat3;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    // Surfaces & input
    pub use crate::surface::{BufferSurface, DrawSurface, SdlSurface, SurfaceError};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::raster::{DepthBuffer, PixelTriplet, TripletVertex};
}
