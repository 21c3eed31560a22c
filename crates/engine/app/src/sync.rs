//! Physics → render state copy
//!
//! Visual nodes are never simulated; each frame their transforms are
//! overwritten from the bodies they are linked to.

use terrafall_physics::rapier3d::prelude::RigidBodyHandle;
use terrafall_physics::PhysicsBackend;
use tracing::trace;

use crate::render::{NodeId, NodeTransform, SceneRenderer};

/// A physics body paired with the node that displays it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLink {
    pub body: RigidBodyHandle,
    pub node: NodeId,
}

/// Copies body poses onto their visual nodes
#[derive(Debug, Clone, Default)]
pub struct StateSynchronizer {
    links: Vec<BodyLink>,
}

impl StateSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a body to a node; re-linking a node replaces its body
    pub fn link(&mut self, body: RigidBodyHandle, node: NodeId) {
        match self.links.iter_mut().find(|link| link.node == node) {
            Some(existing) => existing.body = body,
            None => self.links.push(BodyLink { body, node }),
        }
    }

    pub fn links(&self) -> &[BodyLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Push every linked body's pose to the renderer
    ///
    /// Links whose body no longer exists are skipped. Returns the number
    /// of transforms written.
    pub fn sync<P, R>(&self, physics: &P, renderer: &mut R) -> usize
    where
        P: PhysicsBackend + ?Sized,
        R: SceneRenderer + ?Sized,
    {
        let mut written = 0;
        for link in &self.links {
            let Some(state) = physics.body_state(link.body) else {
                trace!(node = link.node.0, "Skipping link to missing body");
                continue;
            };
            renderer.set_transform(link.node, NodeTransform::from_body_state(&state));
            written += 1;
        }
        written
    }
}
