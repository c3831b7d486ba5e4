//! This module defines the `NavNode` struct, a routing waypoint in the `NavGraph`.
use bevy::math::IVec3;
use smallvec::SmallVec;

use crate::NodeId;

/// A `NavNode` for use in `NavGraph`.
#[derive(Debug, Clone)]
pub(crate) struct NavNode {
    /// The cell of the node.
    pub(crate) pos: IVec3,
    /// Ids of the nodes this node links to.
    pub(crate) neighbors: SmallVec<[NodeId; 8]>,
}

impl NavNode {
    pub(crate) fn new(pos: IVec3) -> Self {
        NavNode {
            pos,
            neighbors: SmallVec::new(),
        }
    }

    /// Records a link to `other`. Returns `false` if it already existed.
    pub(crate) fn link(&mut self, other: NodeId) -> bool {
        if self.neighbors.contains(&other) {
            return false;
        }

        self.neighbors.push(other);
        true
    }
}

impl PartialEq for NavNode {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for NavNode {}
