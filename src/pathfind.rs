//! This module defines the `Pathfinder`, the entry point for path requests.
use bevy::{log, math::IVec3};
use rustc_hash::FxHashSet;

use crate::{
    astar::{astar_graph, astar_grid, TileSearch},
    cell,
    corridor::Corridor,
    error::PathError,
    field::{CollisionField, HazardField, HazardTypes, NoHazards},
    graph::NavGraph,
    heading::Heading,
    hull::{Footprint, FootprintProvider, HullCache},
    path::Path,
    settings::PathfindSettings,
    timed,
    waypoint::{to_waypoints, Waypoint},
};

/// Plans hull-aware paths over a collision field.
///
/// A `Pathfinder` borrows the world for the duration of a request and holds
/// everything scoped to that request: settings and the tile types to avoid.
/// Each search allocates its own open set and caches, so any number of
/// pathfinders may share the same field and graph.
///
/// # Example
/// ```
/// use bevy::math::{IVec2, IVec3};
/// use bevy_seaway::prelude::*;
///
/// let mut grid = Grid::new(32, 32, 1);
/// grid.fill_solid(IVec3::new(16, 0, 0), IVec3::new(16, 20, 0));
///
/// let hull = Footprint::new(vec![IVec2::ZERO, IVec2::new(0, 1)], Heading::North);
/// let pathfinder = Pathfinder::new(&grid);
///
/// let path = pathfinder
///     .find_path(&hull, IVec3::new(4, 8, 0), IVec3::new(28, 8, 0), None)
///     .unwrap();
///
/// assert_eq!(path.path().last(), Some(&IVec3::new(28, 8, 0)));
/// assert!(path.path().iter().all(|cell| grid.is_walkable(cell.x, cell.y, 0)));
/// ```
pub struct Pathfinder<'a, C, H = NoHazards> {
    collision: &'a C,
    hazard_field: &'a H,
    graph: Option<&'a NavGraph>,
    settings: PathfindSettings,
    hazards: HazardTypes,
}

impl<'a, C: CollisionField> Pathfinder<'a, C, NoHazards> {
    /// Pathfinder over `collision` with no hazards and no navigation graph.
    pub fn new(collision: &'a C) -> Self {
        Pathfinder {
            collision,
            hazard_field: &NoHazards,
            graph: None,
            settings: PathfindSettings::default(),
            hazards: HazardTypes::none(),
        }
    }
}

impl<'a, C: CollisionField, H: HazardField> Pathfinder<'a, C, H> {
    /// Classify tiles with `hazard_field`.
    pub fn with_hazard_field<H2: HazardField>(self, hazard_field: &'a H2) -> Pathfinder<'a, C, H2> {
        Pathfinder {
            collision: self.collision,
            hazard_field,
            graph: self.graph,
            settings: self.settings,
            hazards: self.hazards,
        }
    }

    /// Route through `graph` first when one is given.
    pub fn with_graph(mut self, graph: Option<&'a NavGraph>) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_settings(mut self, settings: PathfindSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Tile types to stay away from. Replaces any previous set.
    pub fn with_avoid_types(mut self, types: &[u8]) -> Self {
        self.hazards = HazardTypes::new(types);
        self
    }

    pub fn with_hazard_types(mut self, hazards: HazardTypes) -> Self {
        self.hazards = hazards;
        self
    }

    pub fn settings(&self) -> &PathfindSettings {
        &self.settings
    }

    pub fn hazard_types(&self) -> &HazardTypes {
        &self.hazards
    }

    /// Plans a path for `vessel` from `start` to `goal`.
    ///
    /// Cells in `avoid` stay passable but carry an extra cost. Returns `None`
    /// when no path exists; see [`Pathfinder::try_find_path`] for the reason.
    pub fn find_path<P: FootprintProvider + ?Sized>(
        &self,
        vessel: &P,
        start: IVec3,
        goal: IVec3,
        avoid: Option<&FxHashSet<IVec3>>,
    ) -> Option<Path> {
        match self.try_find_path(vessel, start, goal, avoid) {
            Ok(path) => Some(path),
            Err(err) => {
                log::debug!("No path from {} to {}: {}", start, goal, err);
                None
            }
        }
    }

    /// Plans a path for `vessel` from `start` to `goal`, reporting why it failed.
    ///
    /// With a navigation graph the route is planned over the graph first and
    /// refined tile by tile within a corridor around it. Any failure there
    /// falls back to a search over the whole grid.
    ///
    /// If the hull cannot fit at `goal` the nearest cell where it does within
    /// the goal search radius is used instead; [`Path::goal`] reports it.
    pub fn try_find_path<P: FootprintProvider + ?Sized>(
        &self,
        vessel: &P,
        start: IVec3,
        goal: IVec3,
        avoid: Option<&FxHashSet<IVec3>>,
    ) -> Result<Path, PathError> {
        for cell in [start, goal] {
            if cell::pack(cell).is_none() {
                log::warn!("Cell is outside the supported range: {}", cell);
                return Err(PathError::OutOfRange(cell));
            }
        }

        let footprint = self.footprint(vessel)?;
        let radius = self.settings.goal_search_radius();
        let target = footprint
            .nearest_fitting_cell(self.collision, goal, radius)
            .ok_or(PathError::NoFittingGoal { goal, radius })?;

        if target != goal {
            log::debug!("Hull does not fit at {}, heading for {} instead", goal, target);
        }

        let hull = HullCache::new(&footprint);
        let search = TileSearch {
            collision: self.collision,
            hazard_field: self.hazard_field,
            hazards: &self.hazards,
            hull: &hull,
            settings: &self.settings,
            avoid,
        };

        if let Some(graph) = self.graph {
            match self.route_with_graph(graph, &search, start, goal, target) {
                Ok(path) => return Ok(path),
                Err(err) if err.is_graph_failure() => {
                    log::debug!("Graph routing failed ({}), searching the full grid", err);
                }
                Err(err) => {
                    log::debug!("Corridor search failed ({}), searching the full grid", err);
                }
            }
        }

        let (cells, cost) = timed!("Grid search", { astar_grid(&search, start, target, None)? });

        log::debug!("Path found: {} cells, cost {}", cells.len(), cost);
        Ok(Path::new(cells, cost))
    }

    fn route_with_graph(
        &self,
        graph: &NavGraph,
        search: &TileSearch<C, H>,
        start: IVec3,
        goal: IVec3,
        target: IVec3,
    ) -> Result<Path, PathError> {
        let node_radius = self.settings.node_search_radius();

        let start_node = graph.nearest_node(start, node_radius);
        let goal_node = graph.nearest_node(goal, node_radius);

        let (start_node, goal_node) = match (start_node, goal_node) {
            (Some(s), Some(g)) => (s, g),
            (s, _) => {
                if let Some((min, max)) = graph.bounds() {
                    log::debug!("Graph bounds: x=[{}..{}], y=[{}..{}]", min.x, max.x, min.y, max.y);
                }
                let missing = if s.is_none() { start } else { goal };
                return Err(PathError::NoNodeNear(missing));
            }
        };

        let nodes = timed!("Graph search", {
            astar_graph(
                graph,
                start_node,
                goal_node,
                &self.hazards,
                self.settings.graph_max_iterations(),
            )?
        });

        let mut corridor = Corridor::new(
            nodes,
            start,
            target,
            self.settings.corridor_deviation(),
            self.settings.corridor_pull_weight(),
        );

        let (cells, cost) = timed!("Corridor search", {
            astar_grid(search, start, target, Some(&mut corridor))?
        });

        log::debug!(
            "Path found: {} cells, cost {}, {} graph nodes",
            cells.len(),
            cost,
            corridor.nodes().len()
        );

        let nodes = corridor.nodes().to_vec();
        Ok(Path::new(cells, cost).with_graph_path(nodes))
    }

    fn footprint<P: FootprintProvider + ?Sized>(&self, vessel: &P) -> Result<Footprint, PathError> {
        match vessel.footprint() {
            Some(footprint) if !footprint.is_empty() => Ok(footprint),
            _ => {
                log::warn!("Vessel footprint is unavailable or empty");
                Err(PathError::EmptyFootprint)
            }
        }
    }

    /// Converts a dense path into heading-tagged waypoints.
    pub fn to_waypoints(&self, path: &[IVec3]) -> Vec<Waypoint> {
        to_waypoints(path)
    }

    /// Does the vessel fit at `cell` facing `heading`?
    pub fn can_fit_at<P: FootprintProvider + ?Sized>(&self, vessel: &P, cell: IVec3, heading: Heading) -> bool {
        vessel
            .footprint()
            .is_some_and(|footprint| footprint.fits(self.collision, cell, heading))
    }

    /// First heading under which the vessel fits at `cell`.
    pub fn find_any_fitting_heading<P: FootprintProvider + ?Sized>(
        &self,
        vessel: &P,
        cell: IVec3,
    ) -> Option<Heading> {
        vessel
            .footprint()
            .and_then(|footprint| footprint.any_fitting_heading(self.collision, cell))
    }

    /// Nearest cell to `goal` within `radius` where the vessel fits under some heading.
    pub fn find_nearest_fitting_cell<P: FootprintProvider + ?Sized>(
        &self,
        vessel: &P,
        goal: IVec3,
        radius: i32,
    ) -> Option<IVec3> {
        vessel
            .footprint()
            .and_then(|footprint| footprint.nearest_fitting_cell(self.collision, goal, radius))
    }

    /// Nearest cell to `goal` within `radius` where the vessel fits facing `heading`.
    pub fn find_nearest_fitting_cell_with_heading<P: FootprintProvider + ?Sized>(
        &self,
        vessel: &P,
        goal: IVec3,
        heading: Heading,
        radius: i32,
    ) -> Option<IVec3> {
        vessel.footprint().and_then(|footprint| {
            footprint.nearest_fitting_cell_with_heading(self.collision, goal, heading, radius)
        })
    }
}
