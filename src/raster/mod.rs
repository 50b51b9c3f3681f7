//! Rasterization records and the depth buffer.
//!
//! [`PixelTriplet`] is the transient, per-frame unit of work: one triangle
//! after projection and pixel conversion, ready for scanline traversal.
//! [`DepthBuffer`] resolves overlapping triangles per pixel with a
//! nearest-wins policy.

mod depth;
mod triplet;

pub use depth::DepthBuffer;
pub use triplet::{PixelTriplet, TripletVertex};
