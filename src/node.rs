//! Transform nodes and the arena that owns them.
//!
//! Objects form a parent/child hierarchy. Instead of raw back-pointers with
//! manual lifetimes, every node lives in a [`NodeArena`] and relations are
//! stored as stable [`NodeId`] handles, so destroying or reorganizing nodes
//! can never leave a dangling reference.

use thiserror::Error;

use crate::camera::Camera;
use crate::geometry::{Geometry, GeometryError, Shape};
use crate::math::mat3::Mat3;
use crate::math::vec3::Vec3;

/// How an object's triangles are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Triangle outlines with no backface culling.
    #[default]
    Wireframe,
    /// Triangle outlines with backface culling.
    Mesh,
    /// Filled triangles with a wireframe outline overlay.
    Solid,
    /// Depth-buffered rasterization with light shading.
    Render,
}

/// Hierarchy errors. These indicate application bugs and are raised
/// immediately rather than silently restructuring the tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeError {
    #[error("node {0:?} does not exist in this arena")]
    UnknownNode(NodeId),
    #[error("node {0:?} already has a parent; remove it first")]
    AlreadyParented(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}

/// Stable handle to a node in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A positioned, rotatable owner of geometry.
///
/// `position` is relative to the parent node (world-relative for roots).
/// Vertices are always transformed from their original coordinates so
/// repeated rotation never accumulates floating-point drift.
#[derive(Debug)]
pub struct Node {
    shape: Shape,
    geometry: Geometry,
    built: bool,
    position: Vec3,
    original_position: Vec3,
    rotation: Mat3,
    mode: DrawMode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(shape: Shape, position: Vec3) -> Self {
        Self {
            shape,
            geometry: Geometry::new(),
            built: false,
            position,
            original_position: position,
            rotation: Mat3::identity(),
            mode: DrawMode::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// One-time geometry construction. Subsequent calls are no-ops.
    pub fn build(&mut self) -> Result<(), GeometryError> {
        if self.built {
            return Ok(());
        }
        self.shape.build_into(&mut self.geometry)?;
        self.built = true;
        Ok(())
    }

    /// Rotates by the given Euler angles, composing with the current rotation.
    pub fn rotate(&mut self, theta: f32, phi: f32, psi: f32) -> &mut Self {
        self.rotation = Mat3::from_euler(theta, phi, psi) * self.rotation;
        self
    }

    /// Replaces the current rotation with the given Euler angles.
    pub fn set_rotation(&mut self, theta: f32, phi: f32, psi: f32) -> &mut Self {
        self.rotation = Mat3::from_euler(theta, phi, psi);
        self
    }

    /// Moves relative to the current position.
    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.position = self.position + offset;
        self
    }

    /// Sets the position explicitly.
    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    /// Restores the position the node was created (or parented) with.
    pub fn reset_position(&mut self) -> &mut Self {
        self.position = self.original_position;
        self
    }

    pub fn set_mode(&mut self, mode: DrawMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }
}

/// Arena owning every node in a scene.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node and returns its handle. Geometry is not built yet;
    /// the scene builds it on registration.
    pub fn insert(&mut self, shape: Shape, position: Vec3) -> NodeId {
        self.nodes.push(Node::new(shape, position));
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Attaches `child` under `parent` at the given parent-relative offset.
    ///
    /// Fails fast if the child already has a parent: silent reparenting would
    /// leave the old parent holding a stale child handle.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        offset: Vec3,
    ) -> Result<(), NodeError> {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return Err(NodeError::UnknownNode(if parent.0 >= self.nodes.len() {
                parent
            } else {
                child
            }));
        }
        if self.nodes[child.0].parent.is_some() {
            return Err(NodeError::AlreadyParented(child));
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].position = offset;
        self.nodes[child.0].original_position = offset;
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Detaches `child` from `parent`, making it a root again.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(NodeError::NotAChild { parent, child })?;
        self.nodes[parent.0].children.remove(position);
        self.nodes[child.0].parent = None;
        Ok(())
    }

    /// Transforms and projects every vertex of `id` and its descendants.
    ///
    /// Each node's effective transform composes the parent chain:
    /// `eff_rot = parent_rot * rot`, `eff_pos = parent_pos + parent_rot * position`.
    /// World coordinates are recomputed from the original vertex positions.
    pub fn render_all_vertices(&mut self, id: NodeId, camera: &Camera) {
        self.render_with_parent(id, Mat3::identity(), Vec3::ZERO, camera);
    }

    /// Computes the effective world rotation of a node through its parent chain.
    pub fn world_rotation(&self, id: NodeId) -> Mat3 {
        self.world_transform(id).0
    }

    /// Computes the effective world position of a node through its parent chain.
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        match self.nodes[id.0].parent {
            None => self.nodes[id.0].position,
            Some(parent) => {
                let (rot, pos) = self.world_transform(parent);
                pos + rot * self.nodes[id.0].position
            }
        }
    }

    fn world_transform(&self, id: NodeId) -> (Mat3, Vec3) {
        match self.nodes[id.0].parent {
            None => (self.nodes[id.0].rotation, self.nodes[id.0].position),
            Some(parent) => {
                let (prot, ppos) = self.world_transform(parent);
                (
                    prot * self.nodes[id.0].rotation,
                    ppos + prot * self.nodes[id.0].position,
                )
            }
        }
    }

    fn render_with_parent(
        &mut self,
        id: NodeId,
        parent_rot: Mat3,
        parent_pos: Vec3,
        camera: &Camera,
    ) {
        let node = &mut self.nodes[id.0];
        let rot = parent_rot * node.rotation;
        let pos = parent_pos + parent_rot * node.position;

        for vertex in node.geometry.vertices_mut() {
            vertex.world = rot * vertex.original + pos;
            match camera.project_point(vertex.world) {
                Some(projected) => {
                    vertex.screen = projected.screen;
                    vertex.depth = projected.depth;
                    vertex.visible = true;
                }
                None => {
                    vertex.visible = false;
                }
            }
        }

        let children = node.children.clone();
        for child in children {
            self.render_with_parent(child, rot, pos, camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube() -> Shape {
        Shape::Cube {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    fn test_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, -5.0), 4.0 / 3.0)
    }

    #[test]
    fn build_is_idempotent() {
        let mut arena = NodeArena::new();
        let id = arena.insert(cube(), Vec3::ZERO);
        arena.get_mut(id).build().unwrap();
        let vertices = arena.get(id).vertex_count();
        let triangles = arena.get(id).triangle_count();
        arena.get_mut(id).build().unwrap();
        assert_eq!(arena.get(id).vertex_count(), vertices);
        assert_eq!(arena.get(id).triangle_count(), triangles);
        assert_eq!(vertices, 8);
        assert_eq!(triangles, 12);
    }

    #[test]
    fn reparenting_fails_fast() {
        let mut arena = NodeArena::new();
        let a = arena.insert(cube(), Vec3::ZERO);
        let b = arena.insert(cube(), Vec3::ZERO);
        let c = arena.insert(cube(), Vec3::ZERO);
        arena.add_child(a, c, Vec3::ZERO).unwrap();
        let err = arena.add_child(b, c, Vec3::ZERO).unwrap_err();
        assert_eq!(err, NodeError::AlreadyParented(c));
    }

    #[test]
    fn child_follows_parent_translation() {
        let mut arena = NodeArena::new();
        let parent = arena.insert(cube(), Vec3::ZERO);
        let child = arena.insert(cube(), Vec3::ZERO);
        arena
            .add_child(parent, child, Vec3::new(1.0, 0.0, 0.0))
            .unwrap();
        arena.get_mut(parent).translate(Vec3::new(2.0, 0.0, 0.0));
        let world = arena.world_position(child);
        assert_relative_eq!(world.x, 3.0, epsilon = 1e-6);
        assert_relative_eq!(world.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(world.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn child_offset_rotates_with_parent() {
        let mut arena = NodeArena::new();
        let parent = arena.insert(cube(), Vec3::ZERO);
        let child = arena.insert(cube(), Vec3::ZERO);
        arena
            .add_child(parent, child, Vec3::new(1.0, 0.0, 0.0))
            .unwrap();
        // Quarter turn about Z carries the +X offset onto +Y
        arena
            .get_mut(parent)
            .set_rotation(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let world = arena.world_position(child);
        assert_relative_eq!(world.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(world.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_round_trip_restores_vertices() {
        let mut arena = NodeArena::new();
        let id = arena.insert(cube(), Vec3::ZERO);
        arena.get_mut(id).build().unwrap();
        let camera = test_camera();

        arena.render_all_vertices(id, &camera);
        let before: Vec<_> = arena
            .get(id)
            .geometry()
            .vertices()
            .iter()
            .map(|v| v.world)
            .collect();

        // Apply a rotation, then undo it with the composed inverse
        arena.get_mut(id).rotate(0.3, 0.0, 0.0);
        arena.get_mut(id).rotate(-0.3, 0.0, 0.0);
        arena.render_all_vertices(id, &camera);

        for (v, expected) in arena.get(id).geometry().vertices().iter().zip(before) {
            assert_relative_eq!(v.world.x, expected.x, epsilon = 1e-5);
            assert_relative_eq!(v.world.y, expected.y, epsilon = 1e-5);
            assert_relative_eq!(v.world.z, expected.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn incremental_rotation_composes() {
        let mut arena = NodeArena::new();
        let id = arena.insert(cube(), Vec3::ZERO);
        arena.get_mut(id).build().unwrap();
        let camera = test_camera();

        // Two quarter turns about X must equal a half turn, not overwrite
        arena.get_mut(id).rotate(std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        arena.get_mut(id).rotate(std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        arena.render_all_vertices(id, &camera);
        let rotated = arena.get(id).geometry().vertices()[0].world;

        let mut reference = NodeArena::new();
        let rid = reference.insert(cube(), Vec3::ZERO);
        reference.get_mut(rid).build().unwrap();
        reference
            .get_mut(rid)
            .set_rotation(std::f32::consts::PI, 0.0, 0.0);
        reference.render_all_vertices(rid, &camera);
        let expected = reference.get(rid).geometry().vertices()[0].world;

        assert_relative_eq!(rotated.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, expected.z, epsilon = 1e-5);
    }
}
