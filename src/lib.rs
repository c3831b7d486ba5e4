//! Hull-aware vessel pathfinding for Bevy.
use std::cmp::Ordering;
use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

mod astar;
pub mod cell;
pub mod components;
pub mod corridor;
pub mod dir;
pub mod error;
pub mod field;
pub mod graph;
pub mod grid;
pub mod heading;
pub mod hull;
mod macros;
mod node;
pub mod path;
pub mod pathfind;
pub mod plugin;
pub mod proximity;
pub mod raycast;
pub mod settings;
pub mod waypoint;

pub mod prelude {
    pub use crate::components::{AvoidCells, Goal, Hull, PathfindFailed, VesselPosition, Waypoints};
    pub use crate::corridor::Corridor;
    pub use crate::dir::Dir;
    pub use crate::error::PathError;
    pub use crate::field::{CollisionField, HazardField, HazardTypes, NoHazards};
    pub use crate::graph::NavGraph;
    pub use crate::grid::{Grid, Tile};
    pub use crate::heading::Heading;
    pub use crate::hull::{Footprint, FootprintProvider};
    pub use crate::path::Path;
    pub use crate::pathfind::Pathfinder;
    pub use crate::plugin::{Chart, PathingSet, SeawayPlugin};
    pub use crate::settings::{PathfindSettings, PathfindSettingsBuilder};
    pub use crate::waypoint::{to_waypoints, Waypoint};
}

pub type NodeId = usize;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

pub(crate) struct SmallestCostHolder<Id> {
    estimated_cost: Id,
    cost: Id,
    index: usize,
}

impl<Id: PartialEq> PartialEq for SmallestCostHolder<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl<Id: Eq> Eq for SmallestCostHolder<Id> {}

impl<Id: Ord> PartialOrd for SmallestCostHolder<Id> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Id: Ord> Ord for SmallestCostHolder<Id> {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.cmp(&other.cost),
            s => s,
        }
    }
}
