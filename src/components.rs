//! Components carried by vessel entities.
use bevy::{math::IVec3, prelude::*};
use rustc_hash::FxHashSet;

use crate::{hull::Footprint, waypoint::Waypoint};

/// The cell the vessel's pivot currently sits on.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VesselPosition(pub IVec3);

/// The vessel's footprint, relative to its pivot.
#[derive(Component, Debug, Clone)]
pub struct Hull(pub Footprint);

/// Where the vessel should go. Changing it triggers a new path request.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal(pub IVec3);

/// Cells the vessel should prefer not to cross.
#[derive(Component, Debug, Clone, Default)]
pub struct AvoidCells(pub FxHashSet<IVec3>);

/// Heading-tagged course changes for the current path.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Waypoints(pub Vec<Waypoint>);

/// Inserted when no path to the current goal exists.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PathfindFailed;
