use bevy::{log, prelude::*};

use crate::{
    components::{AvoidCells, Goal, Hull, PathfindFailed, VesselPosition, Waypoints},
    field::HazardTypes,
    graph::NavGraph,
    grid::Grid,
    path::Path,
    pathfind::Pathfinder,
    settings::PathfindSettings,
};

/// Plans paths for vessel entities whenever their [`Goal`] changes.
///
/// Requires a [`Chart`] resource. Entities need [`VesselPosition`], [`Hull`]
/// and [`Goal`], and may carry [`AvoidCells`].
#[derive(Default)]
pub struct SeawayPlugin;

impl Plugin for SeawayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, plan_paths.in_set(PathingSet));
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathingSet;

/// The world the plugin plans over.
#[derive(Resource, Debug, Clone)]
pub struct Chart {
    pub grid: Grid,
    pub graph: Option<NavGraph>,
    pub settings: PathfindSettings,
    pub hazards: HazardTypes,
}

impl Chart {
    pub fn new(grid: Grid) -> Self {
        Chart {
            grid,
            graph: None,
            settings: PathfindSettings::default(),
            hazards: HazardTypes::none(),
        }
    }

    pub fn with_graph(mut self, graph: NavGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn with_settings(mut self, settings: PathfindSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_avoid_types(mut self, types: &[u8]) -> Self {
        self.hazards = HazardTypes::new(types);
        self
    }

    /// A pathfinder borrowing this chart.
    pub fn pathfinder(&self) -> Pathfinder<'_, Grid, Grid> {
        Pathfinder::new(&self.grid)
            .with_hazard_field(&self.grid)
            .with_graph(self.graph.as_ref())
            .with_settings(self.settings.clone())
            .with_hazard_types(self.hazards.clone())
    }
}

#[allow(clippy::type_complexity)]
fn plan_paths(
    chart: Option<Res<Chart>>,
    mut commands: Commands,
    query: Query<(Entity, &VesselPosition, &Hull, &Goal, Option<&AvoidCells>), Changed<Goal>>,
) {
    let Some(chart) = chart else {
        return;
    };

    let pathfinder = chart.pathfinder();

    for (entity, position, hull, goal, avoid) in query.iter() {
        if position.0 == goal.0 {
            commands.entity(entity).remove::<(Path, Waypoints, PathfindFailed)>();
            continue;
        }

        log::debug!("Pathfinding for entity: {:?}", entity);

        match pathfinder.find_path(&hull.0, position.0, goal.0, avoid.map(|cells| &cells.0)) {
            Some(path) => {
                let waypoints = Waypoints(path.waypoints());
                commands
                    .entity(entity)
                    .insert((path, waypoints))
                    .remove::<PathfindFailed>();
            }
            None => {
                log::debug!("No path for entity {:?} to {}", entity, goal.0);
                commands
                    .entity(entity)
                    .remove::<(Path, Waypoints)>()
                    .insert(PathfindFailed);
            }
        }
    }
}
