//! The long-lived navigation graph used for coarse routing.
use bevy::math::{IVec2, IVec3};
use rustc_hash::FxHashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    cell,
    field::{CollisionField, HazardField, HazardTypes},
    node::NavNode,
    raycast::{line_of_sight, line_type_mask},
    NodeId,
};

/// Sparse set of routing nodes with bidirectional links.
///
/// Every link carries a 16-bit mask of the tile types its straight line
/// crosses (bit `t - 1` for type `t`), checked against the avoided types of a
/// request at query time.
#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    nodes: slab::Slab<NavNode>,
    node_ids: FxHashMap<IVec3, NodeId>,
    edge_masks: FxHashMap<(NodeId, NodeId), u16>,
}

#[inline(always)]
fn edge_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl NavGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node at `pos`, returning the existing id if there already is one.
    pub fn add_node(&mut self, pos: IVec3) -> NodeId {
        if let Some(&id) = self.node_ids.get(&pos) {
            return id;
        }

        let id = self.nodes.insert(NavNode::new(pos));
        self.node_ids.insert(pos, id);

        id
    }

    /// Links two nodes in both directions, adding them if needed.
    ///
    /// Connecting an already linked pair replaces its mask.
    pub fn connect(&mut self, a: IVec3, b: IVec3, mask: u16) {
        if a == b {
            return;
        }

        let a_id = self.add_node(a);
        let b_id = self.add_node(b);

        if let Some(node) = self.nodes.get_mut(a_id) {
            node.link(b_id);
        }
        if let Some(node) = self.nodes.get_mut(b_id) {
            node.link(a_id);
        }

        self.edge_masks.insert(edge_key(a_id, b_id), mask);
    }

    pub fn has_node(&self, pos: IVec3) -> bool {
        self.node_ids.contains_key(&pos)
    }

    pub(crate) fn node_id(&self, pos: IVec3) -> Option<NodeId> {
        self.node_ids.get(&pos).copied()
    }

    pub(crate) fn node_pos(&self, id: NodeId) -> Option<IVec3> {
        self.nodes.get(id).map(|node| node.pos)
    }

    pub(crate) fn neighbor_ids(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Positions linked to `pos`, empty if there is no node there.
    pub fn neighbors(&self, pos: IVec3) -> impl Iterator<Item = IVec3> + '_ {
        self.node_id(pos)
            .into_iter()
            .flat_map(|id| self.neighbor_ids(id).iter())
            .filter_map(|&id| self.node_pos(id))
    }

    /// Mask of the link between `a` and `b`, `0` when they are not linked.
    pub fn edge_mask(&self, a: IVec3, b: IVec3) -> u16 {
        match (self.node_id(a), self.node_id(b)) {
            (Some(a), Some(b)) => self.edge_mask_by_id(a, b),
            _ => 0,
        }
    }

    pub(crate) fn edge_mask_by_id(&self, a: NodeId, b: NodeId) -> u16 {
        self.edge_masks.get(&edge_key(a, b)).copied().unwrap_or(0)
    }

    /// A link is traversable unless it crosses one of the avoided types.
    pub fn is_edge_traversable(&self, a: IVec3, b: IVec3, avoid: &HazardTypes) -> bool {
        self.edge_mask(a, b) & avoid.mask() == 0
    }

    pub(crate) fn is_edge_traversable_by_id(&self, a: NodeId, b: NodeId, avoid: &HazardTypes) -> bool {
        self.edge_mask_by_id(a, b) & avoid.mask() == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected links.
    pub fn edge_count(&self) -> usize {
        self.edge_masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node positions in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.nodes.iter().map(|(_, node)| node.pos)
    }

    /// Inclusive `(min, max)` of the node positions in x and y.
    pub fn bounds(&self) -> Option<(IVec2, IVec2)> {
        self.nodes().fold(None, |bounds, pos| {
            let p = pos.truncate();
            Some(match bounds {
                None => (p, p),
                Some((min, max)) => (min.min(p), max.max(p)),
            })
        })
    }

    /// Nearest node to `cell` on its plane by ring scan, exact cell first.
    ///
    /// The first hit in ring order wins, which is not always the closest by
    /// straight-line distance.
    pub fn nearest_node(&self, cell: IVec3, max_radius: i32) -> Option<IVec3> {
        cell::spiral(cell, max_radius).find(|pos| self.has_node(*pos))
    }

    /// Builds a graph on a regular lattice.
    ///
    /// Nodes go on every walkable lattice point in `min..=max`, `spacing` apart.
    /// Lattice neighbours in the 8 directions are linked when every cell on the
    /// straight line between them is walkable.
    pub fn from_lattice<F>(field: &F, min: IVec2, max: IVec2, plane: i32, spacing: i32) -> NavGraph
    where
        F: CollisionField + HazardField + Sync,
    {
        if spacing <= 0 {
            panic!("Lattice spacing must be positive");
        }

        let mut points = Vec::new();
        let mut x = min.x;
        while x <= max.x {
            let mut y = min.y;
            while y <= max.y {
                if field.is_walkable(x, y, plane) {
                    points.push(IVec3::new(x, y, plane));
                }
                y += spacing;
            }
            x += spacing;
        }

        let mut graph = NavGraph::new();
        for &point in &points {
            graph.add_node(point);
        }

        // Forward half of the 8 directions, the other half is covered from the far end.
        let forward = [
            IVec3::new(spacing, 0, 0),
            IVec3::new(0, spacing, 0),
            IVec3::new(spacing, spacing, 0),
            IVec3::new(spacing, -spacing, 0),
        ];

        let link = |from: &IVec3| {
            let from = *from;
            let graph = &graph;
            forward.into_iter().filter_map(move |offset| {
                let to = from + offset;
                if !graph.has_node(to) || !line_of_sight(field, from, to) {
                    return None;
                }
                Some((from, to, line_type_mask(field, from, to)))
            })
        };

        #[cfg(feature = "parallel")]
        let links: Vec<_> = points.par_iter().flat_map_iter(link).collect();

        #[cfg(not(feature = "parallel"))]
        let links: Vec<_> = points.iter().flat_map(link).collect();

        for (from, to, mask) in links {
            graph.connect(from, to, mask);
        }

        graph
    }
}
