//! This module defines the `Path` component.
use bevy::math::IVec3;
use bevy::prelude::Component;

use crate::waypoint::{to_waypoints, Waypoint};

/// The path struct and component containing the result of a path request.
///
/// This is returned by [`crate::pathfind::Pathfinder::find_path`].
/// If using [`crate::plugin::SeawayPlugin`] this is inserted as a component on a vessel entity
/// after the plugin systems have planned a route to its goal.
#[derive(Debug, Clone, Component)]
pub struct Path {
    pub(crate) path: Vec<IVec3>,
    pub(crate) graph_path: Vec<IVec3>,
    cost: u32,
    goal: IVec3,
}

impl Path {
    /// Create a new path from a vector of cells
    /// # Arguments
    /// * `path` - The dense cells from start to goal
    /// * `cost` - The total movement cost of the path
    ///
    pub fn new(path: Vec<IVec3>, cost: u32) -> Self {
        let goal = path.last().copied().unwrap_or_default();

        Path {
            path,
            graph_path: Vec::new(),
            cost,
            goal,
        }
    }

    pub(crate) fn with_graph_path(mut self, graph_path: Vec<IVec3>) -> Self {
        self.graph_path = graph_path;
        self
    }

    /// Returns true if the path contains the given cell
    pub fn is_position_in_path(&self, pos: IVec3) -> bool {
        self.path.contains(&pos)
    }

    /// Returns the dense path as a slice of cells, start and goal included.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bevy::math::IVec3;
    /// use bevy_seaway::prelude::*;
    ///
    /// let path = Path::new(vec![IVec3::new(1, 2, 0), IVec3::new(2, 3, 0)], 14);
    /// assert_eq!(path.path(), &[IVec3::new(1, 2, 0), IVec3::new(2, 3, 0)]);
    /// ```
    pub fn path(&self) -> &[IVec3] {
        &self.path
    }

    /// The navigation graph nodes the path was refined from. Empty when the
    /// path came from a full grid search.
    pub fn graph_path(&self) -> &[IVec3] {
        &self.graph_path
    }

    /// Returns the movement cost of the path
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// The cell the path ends at. This can differ from the requested goal when
    /// the hull did not fit there.
    pub fn goal(&self) -> IVec3 {
        self.goal
    }

    /// Returns the length of the path
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns true if the path is empty
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Sparse heading-tagged waypoints for the path.
    pub fn waypoints(&self) -> Vec<Waypoint> {
        to_waypoints(&self.path)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Path {}

impl IntoIterator for Path {
    type Item = IVec3;
    type IntoIter = std::vec::IntoIter<IVec3>;

    fn into_iter(self) -> Self::IntoIter {
        self.path.into_iter()
    }
}
