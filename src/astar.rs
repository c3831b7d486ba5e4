//! A* algorithms used by the crate.
use bevy::math::IVec3;
use indexmap::map::Entry::{Occupied, Vacant};
use rustc_hash::FxHashSet;
use std::collections::BinaryHeap;

use crate::{
    cell::{self, chebyshev},
    corridor::Corridor,
    dir::{Dir, ORTHOGONAL_COST},
    error::PathError,
    field::{CollisionField, HazardField, HazardTypes},
    graph::NavGraph,
    hull::{HullCache, UNROTATED_SLOT},
    proximity::{hazard_cost, ProximityCache},
    settings::PathfindSettings,
    FxIndexMap, NodeId, SmallestCostHolder,
};

/// Turn penalty indexed by the heading difference in 22.5° steps.
pub const TURN_COSTS: [u32; 9] = [0, 0, 5, 15, 40, 80, 150, 250, 400];
/// How many steps back the turn penalty looks for the previous course.
pub const TURN_LOOKBACK: usize = 3;

/// Parent index of the start node.
const NO_PARENT: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    parent: usize,
    g: u32,
    closed: bool,
}

/// Admissible estimate of the remaining cost from `from` to `goal`.
///
/// Every move costs at least [`ORTHOGONAL_COST`] and advances the Chebyshev
/// distance by at most one.
#[inline(always)]
pub fn heuristic(from: IVec3, goal: IVec3) -> u32 {
    chebyshev(from, goal) * ORTHOGONAL_COST
}

/// Everything the tile search reads while scoring edges.
pub(crate) struct TileSearch<'a, C, H> {
    pub(crate) collision: &'a C,
    pub(crate) hazard_field: &'a H,
    pub(crate) hazards: &'a HazardTypes,
    pub(crate) hull: &'a HullCache,
    pub(crate) settings: &'a PathfindSettings,
    pub(crate) avoid: Option<&'a FxHashSet<IVec3>>,
}

fn reconstruct(visited: &FxIndexMap<IVec3, SearchNode>, index: usize) -> Vec<IVec3> {
    let mut current = index;
    let mut steps = vec![];

    while current != NO_PARENT {
        let Some((pos, node)) = visited.get_index(current) else {
            break;
        };
        steps.push(*pos);
        current = node.parent;
    }

    steps.reverse();
    steps
}

/// Turn and alternation penalties for leaving `current` in direction `next`.
fn turn_costs(
    visited: &FxIndexMap<IVec3, SearchNode>,
    current: usize,
    next: Dir,
    alternation_cost: u32,
) -> (u32, u32) {
    let Some((&current_pos, current_node)) = visited.get_index(current) else {
        return (0, 0);
    };
    let parent = current_node.parent;
    let Some((&parent_pos, parent_node)) = visited.get_index(parent) else {
        return (0, 0);
    };

    let current_dir = Dir::between(parent_pos, current_pos);

    let mut alternation = 0;
    if let Some((&grand_pos, _)) = visited.get_index(parent_node.parent) {
        if let (Some(prev_dir), Some(current_dir)) = (Dir::between(grand_pos, parent_pos), current_dir) {
            if prev_dir != current_dir
                && next == prev_dir
                && prev_dir.heading().difference(current_dir.heading()) <= 2
            {
                alternation = alternation_cost;
            }
        }
    }

    let mut ancestor = parent;
    let mut prev_ancestor = current;
    for _ in 1..TURN_LOOKBACK {
        let Some((_, node)) = visited.get_index(ancestor) else {
            break;
        };
        if node.parent == NO_PARENT {
            break;
        }
        prev_ancestor = ancestor;
        ancestor = node.parent;
    }

    let turn = match (visited.get_index(ancestor), visited.get_index(prev_ancestor)) {
        (Some((&from, _)), Some((&to, _))) => Dir::between(from, to)
            .map(|start_dir| TURN_COSTS[start_dir.heading().difference(next.heading()) as usize])
            .unwrap_or(0),
        _ => 0,
    };

    (turn, alternation)
}

/// A* search over the tile grid for a vessel with the hull in `search`.
///
/// The goal must already be a cell where the hull fits; it is exempt from the
/// per-step hull check. With a `corridor`, cells outside of it are never
/// expanded and cells inside are biased towards its centerline.
///
/// # Returns
/// The dense cell path from `start` to `goal` and its total cost.
pub(crate) fn astar_grid<C: CollisionField, H: HazardField>(
    search: &TileSearch<C, H>,
    start: IVec3,
    goal: IVec3,
    mut corridor: Option<&mut Corridor>,
) -> Result<(Vec<IVec3>, u32), PathError> {
    let settings = search.settings;
    let max_iterations = settings.max_iterations();
    let weight = settings.heuristic_weight();
    let near_start = settings.near_start_radius();

    let mut proximity = ProximityCache::default();
    let mut to_visit = BinaryHeap::new();
    let mut visited: FxIndexMap<IVec3, SearchNode> = FxIndexMap::default();

    visited.insert(
        start,
        SearchNode {
            parent: NO_PARENT,
            g: 0,
            closed: false,
        },
    );
    to_visit.push(SmallestCostHolder {
        estimated_cost: heuristic(start, goal) * weight / 100,
        cost: 0,
        index: 0,
    });

    let mut iterations = 0;

    while iterations < max_iterations {
        let Some(SmallestCostHolder { index, .. }) = to_visit.pop() else {
            break;
        };
        iterations += 1;

        let (current_pos, current_g) = {
            let Some((&pos, node)) = visited.get_index_mut(index) else {
                continue;
            };

            // Duplicate heap entries are skipped rather than removed.
            if node.closed {
                continue;
            }
            node.closed = true;
            (pos, node.g)
        };

        if current_pos == goal {
            return Ok((reconstruct(&visited, index), current_g));
        }

        for dir in Dir::all() {
            let neighbor = current_pos + dir.offset();

            if cell::pack(neighbor).is_none() {
                continue;
            }

            if visited.get(&neighbor).is_some_and(|node| node.closed) {
                continue;
            }

            let pull = match corridor.as_deref_mut() {
                Some(corridor) => match corridor.distance_squared_cached(neighbor) {
                    Some(distance) => corridor.pull_penalty(distance),
                    None => continue,
                },
                None => 0,
            };

            if neighbor != goal {
                let slot = if (neighbor.x - start.x).abs() <= near_start
                    && (neighbor.y - start.y).abs() <= near_start
                {
                    UNROTATED_SLOT
                } else {
                    dir.index()
                };

                if !search.hull.fits(search.collision, neighbor, slot) {
                    continue;
                }
            }

            let sample = proximity.get_or_sample(
                search.collision,
                search.hazard_field,
                search.hazards,
                neighbor,
                settings.hazard_buffer_radius(),
            );
            let Some(multiplier) = sample.multiplier() else {
                continue;
            };

            let (turn, alternation) =
                turn_costs(&visited, index, dir, settings.alternation_cost());

            let own_type = search
                .hazard_field
                .tile_type_at(neighbor.x, neighbor.y, neighbor.z);
            let terrain = hazard_cost(
                search.hazards.contains(own_type),
                sample.hazard,
                settings.hazard_cost(),
            );

            let avoid = match search.avoid {
                Some(avoid) if avoid.contains(&neighbor) => settings.avoid_cost(),
                _ => 0,
            };

            let edge = (dir.base_cost() * multiplier)
                .saturating_add(turn)
                .saturating_add(alternation)
                .saturating_add(terrain)
                .saturating_add(avoid);
            let new_cost = current_g.saturating_add(edge);

            let n = match visited.entry(neighbor) {
                Vacant(e) => {
                    let n = e.index();
                    e.insert(SearchNode {
                        parent: index,
                        g: new_cost,
                        closed: false,
                    });
                    n
                }
                Occupied(mut e) => {
                    if e.get().g > new_cost {
                        let node = e.get_mut();
                        node.parent = index;
                        node.g = new_cost;
                        e.index()
                    } else {
                        continue;
                    }
                }
            };

            let h = heuristic(neighbor, goal) * weight / 100;
            to_visit.push(SmallestCostHolder {
                estimated_cost: new_cost.saturating_add(h).saturating_add(pull),
                cost: new_cost,
                index: n,
            });
        }
    }

    Err(PathError::Unreachable { iterations })
}

/// A* search over the [`NavGraph`] between two of its nodes.
///
/// Edge cost and heuristic are both the Chebyshev distance between node
/// cells. Links crossing any of the `avoid` types are skipped.
pub(crate) fn astar_graph(
    graph: &NavGraph,
    start: IVec3,
    goal: IVec3,
    avoid: &HazardTypes,
    max_iterations: usize,
) -> Result<Vec<IVec3>, PathError> {
    let start_id = graph.node_id(start).ok_or(PathError::NoNodeNear(start))?;
    let goal_id = graph.node_id(goal).ok_or(PathError::NoNodeNear(goal))?;

    if start_id == goal_id {
        return Ok(vec![start]);
    }

    let mut to_visit = BinaryHeap::new();
    let mut visited: FxIndexMap<NodeId, SearchNode> = FxIndexMap::default();

    visited.insert(
        start_id,
        SearchNode {
            parent: NO_PARENT,
            g: 0,
            closed: false,
        },
    );
    to_visit.push(SmallestCostHolder {
        estimated_cost: chebyshev(start, goal),
        cost: 0,
        index: 0,
    });

    let mut iterations = 0;

    while iterations < max_iterations {
        let Some(SmallestCostHolder { index, .. }) = to_visit.pop() else {
            break;
        };
        iterations += 1;

        let (current_id, current_g) = {
            let Some((&id, node)) = visited.get_index_mut(index) else {
                continue;
            };
            if node.closed {
                continue;
            }
            node.closed = true;
            (id, node.g)
        };

        if current_id == goal_id {
            let mut current = index;
            let mut steps = vec![];

            while current != NO_PARENT {
                let Some((&id, node)) = visited.get_index(current) else {
                    break;
                };
                if let Some(pos) = graph.node_pos(id) {
                    steps.push(pos);
                }
                current = node.parent;
            }

            steps.reverse();
            return Ok(steps);
        }

        let Some(current_pos) = graph.node_pos(current_id) else {
            continue;
        };

        for &neighbor_id in graph.neighbor_ids(current_id) {
            if visited.get(&neighbor_id).is_some_and(|node| node.closed) {
                continue;
            }

            if !graph.is_edge_traversable_by_id(current_id, neighbor_id, avoid) {
                continue;
            }

            let Some(neighbor_pos) = graph.node_pos(neighbor_id) else {
                continue;
            };

            let new_cost = current_g + chebyshev(current_pos, neighbor_pos);

            let n = match visited.entry(neighbor_id) {
                Vacant(e) => {
                    let n = e.index();
                    e.insert(SearchNode {
                        parent: index,
                        g: new_cost,
                        closed: false,
                    });
                    n
                }
                Occupied(mut e) => {
                    if e.get().g > new_cost {
                        let node = e.get_mut();
                        node.parent = index;
                        node.g = new_cost;
                        e.index()
                    } else {
                        continue;
                    }
                }
            };

            to_visit.push(SmallestCostHolder {
                estimated_cost: new_cost + chebyshev(neighbor_pos, goal),
                cost: new_cost,
                index: n,
            });
        }
    }

    Err(PathError::NoGraphRoute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        field::NoHazards,
        grid::Grid,
        heading::Heading,
        hull::Footprint,
        settings::PathfindSettingsBuilder,
    };
    use bevy::math::IVec2;

    fn single_cell_hull() -> HullCache {
        HullCache::new(&Footprint::new(vec![IVec2::ZERO], Heading::East))
    }

    fn search_grid(
        grid: &Grid,
        start: IVec3,
        goal: IVec3,
        avoid: Option<&FxHashSet<IVec3>>,
        corridor: Option<&mut Corridor>,
    ) -> Result<(Vec<IVec3>, u32), PathError> {
        let hull = single_cell_hull();
        let settings = PathfindSettings::default();
        let hazards = HazardTypes::none();
        let search = TileSearch {
            collision: grid,
            hazard_field: &NoHazards,
            hazards: &hazards,
            hull: &hull,
            settings: &settings,
            avoid,
        };

        astar_grid(&search, start, goal, corridor)
    }

    #[test]
    fn test_straight_line_in_open_water() {
        let grid = Grid::new(21, 21, 1);
        let start = IVec3::new(5, 10, 0);
        let goal = IVec3::new(15, 10, 0);

        let (path, cost) = search_grid(&grid, start, goal, None, None).unwrap();

        let expected: Vec<_> = (5..=15).map(|x| IVec3::new(x, 10, 0)).collect();
        assert_eq!(path, expected);
        assert_eq!(cost, 100);
    }

    #[test]
    fn test_start_is_goal() {
        let grid = Grid::new(8, 8, 1);
        let start = IVec3::new(3, 3, 0);

        let (path, cost) = search_grid(&grid, start, start, None, None).unwrap();
        assert_eq!(path, vec![start]);
        assert_eq!(cost, 0);
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let mut grid = Grid::new(16, 16, 1);
        grid.fill_solid(IVec3::new(9, 9, 0), IVec3::new(13, 9, 0));
        grid.fill_solid(IVec3::new(9, 13, 0), IVec3::new(13, 13, 0));
        grid.fill_solid(IVec3::new(9, 9, 0), IVec3::new(9, 13, 0));
        grid.fill_solid(IVec3::new(13, 9, 0), IVec3::new(13, 13, 0));

        let result = search_grid(&grid, IVec3::new(2, 2, 0), IVec3::new(11, 11, 0), None, None);
        assert!(matches!(result, Err(PathError::Unreachable { .. })));
    }

    #[test]
    fn test_iteration_budget() {
        let grid = Grid::new(32, 32, 1);
        let hull = single_cell_hull();
        let settings = PathfindSettingsBuilder::new().max_iterations(5).build();
        let hazards = HazardTypes::none();
        let search = TileSearch {
            collision: &grid,
            hazard_field: &NoHazards,
            hazards: &hazards,
            hull: &hull,
            settings: &settings,
            avoid: None,
        };

        let result = astar_grid(&search, IVec3::new(1, 1, 0), IVec3::new(30, 30, 0), None);
        assert_eq!(result, Err(PathError::Unreachable { iterations: 5 }));
    }

    #[test]
    fn test_avoid_cells_are_detoured() {
        let grid = Grid::new(21, 21, 1);
        let mut avoid = FxHashSet::default();
        avoid.insert(IVec3::new(10, 10, 0));

        let (path, _) = search_grid(
            &grid,
            IVec3::new(5, 10, 0),
            IVec3::new(15, 10, 0),
            Some(&avoid),
            None,
        )
        .unwrap();

        assert!(!path.contains(&IVec3::new(10, 10, 0)));
        assert_eq!(path.last(), Some(&IVec3::new(15, 10, 0)));
    }

    #[test]
    fn test_goal_is_exempt_from_hull_check() {
        // Wide basin at the start, a one-cell channel east, and a north-south
        // slot at the end that the hull only fits lengthwise.
        let mut grid = Grid::filled(30, 21, 1, crate::grid::Tile::solid());
        for x in 1..=8 {
            for y in 9..=11 {
                grid.set_walkable(IVec3::new(x, y, 0), true);
            }
        }
        for x in 9..=14 {
            grid.set_walkable(IVec3::new(x, 10, 0), true);
        }
        for y in 9..=11 {
            grid.set_walkable(IVec3::new(15, y, 0), true);
        }

        let hull = HullCache::new(&Footprint::new(
            vec![IVec2::new(0, -1), IVec2::ZERO, IVec2::new(0, 1)],
            Heading::North,
        ));
        let settings = PathfindSettings::default();
        let hazards = HazardTypes::none();
        let search = TileSearch {
            collision: &grid,
            hazard_field: &NoHazards,
            hazards: &hazards,
            hull: &hull,
            settings: &settings,
            avoid: None,
        };

        let start = IVec3::new(5, 10, 0);
        let goal = IVec3::new(15, 10, 0);
        assert!(!hull.fits(&grid, goal, Dir::EAST.index()));
        assert!(hull.fits(&grid, goal, UNROTATED_SLOT));

        let (path, _) = astar_grid(&search, start, goal, None).unwrap();

        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path[path.len() - 2], IVec3::new(14, 10, 0));
    }

    #[test]
    fn test_huge_costs_saturate() {
        let mut grid = Grid::new(11, 11, 1);
        for y in 0..=10 {
            grid.set_tile_type(IVec3::new(5, y, 0), 3);
        }
        let hull = single_cell_hull();
        let settings = PathfindSettingsBuilder::new()
            .hazard_cost(u32::MAX)
            .avoid_cost(u32::MAX)
            .build();
        let hazards = HazardTypes::new(&[3]);
        let avoid: FxHashSet<IVec3> = (0..=10).map(|y| IVec3::new(6, y, 0)).collect();
        let search = TileSearch {
            collision: &grid,
            hazard_field: &grid,
            hazards: &hazards,
            hull: &hull,
            settings: &settings,
            avoid: Some(&avoid),
        };

        let (path, cost) = astar_grid(&search, IVec3::new(2, 5, 0), IVec3::new(8, 5, 0), None).unwrap();

        assert_eq!(path.last(), Some(&IVec3::new(8, 5, 0)));
        assert_eq!(cost, u32::MAX);
    }

    #[test]
    fn test_corridor_confines_search() {
        let grid = Grid::new(64, 64, 1);
        let start = IVec3::new(10, 30, 0);
        let goal = IVec3::new(50, 30, 0);
        let mut corridor = Corridor::new(
            vec![IVec3::new(12, 30, 0), IVec3::new(48, 30, 0)],
            start,
            goal,
            4,
            2,
        );

        let (path, _) = search_grid(&grid, start, goal, None, Some(&mut corridor)).unwrap();
        for cell in &path {
            assert!(corridor.distance_squared(*cell).is_some());
        }
    }

    #[test]
    fn test_corridor_without_passage_fails() {
        let mut grid = Grid::new(64, 64, 1);
        grid.fill_solid(IVec3::new(30, 20, 0), IVec3::new(30, 40, 0));
        let start = IVec3::new(10, 30, 0);
        let goal = IVec3::new(50, 30, 0);
        let mut corridor = Corridor::new(vec![start, goal], start, goal, 4, 2);

        let result = search_grid(&grid, start, goal, None, Some(&mut corridor));
        assert!(matches!(result, Err(PathError::Unreachable { .. })));

        // Without the corridor the wall can be passed around.
        assert!(search_grid(&grid, start, goal, None, None).is_ok());
    }

    #[test]
    fn test_heuristic_is_admissible() {
        let mut grid = Grid::new(40, 40, 1);
        grid.fill_solid(IVec3::new(20, 0, 0), IVec3::new(20, 30, 0));
        let start = IVec3::new(5, 5, 0);
        let goal = IVec3::new(35, 8, 0);

        let (path, cost) = search_grid(&grid, start, goal, None, None).unwrap();
        assert!(heuristic(start, goal) <= cost);
        assert!(path.len() as u32 > chebyshev(start, goal));
    }

    #[test]
    fn test_turn_costs_follow_lookback() {
        let mut visited: FxIndexMap<IVec3, SearchNode> = FxIndexMap::default();
        let node = |parent| SearchNode {
            parent,
            g: 0,
            closed: true,
        };
        // East, east, east.
        visited.insert(IVec3::new(0, 0, 0), node(NO_PARENT));
        visited.insert(IVec3::new(1, 0, 0), node(0));
        visited.insert(IVec3::new(2, 0, 0), node(1));
        visited.insert(IVec3::new(3, 0, 0), node(2));

        assert_eq!(turn_costs(&visited, 3, Dir::EAST, 25), (0, 0));
        assert_eq!(turn_costs(&visited, 3, Dir::NORTHEAST, 25), (TURN_COSTS[2], 0));
        assert_eq!(turn_costs(&visited, 3, Dir::NORTH, 25), (TURN_COSTS[4], 0));
        assert_eq!(turn_costs(&visited, 3, Dir::WEST, 25), (TURN_COSTS[8], 0));
        assert_eq!(turn_costs(&visited, 0, Dir::WEST, 25), (0, 0));
    }

    #[test]
    fn test_alternation_penalty() {
        let mut visited: FxIndexMap<IVec3, SearchNode> = FxIndexMap::default();
        let node = |parent| SearchNode {
            parent,
            g: 0,
            closed: true,
        };
        // East then north-east; going east again is a zig-zag.
        visited.insert(IVec3::new(0, 0, 0), node(NO_PARENT));
        visited.insert(IVec3::new(1, 0, 0), node(0));
        visited.insert(IVec3::new(2, 1, 0), node(1));

        assert_eq!(turn_costs(&visited, 2, Dir::EAST, 25).1, 25);
        assert_eq!(turn_costs(&visited, 2, Dir::NORTHEAST, 25).1, 0);
        assert_eq!(turn_costs(&visited, 2, Dir::SOUTHEAST, 25).1, 0);
    }

    fn chain_graph() -> NavGraph {
        let mut graph = NavGraph::new();
        let a = IVec3::new(0, 0, 0);
        let b = IVec3::new(10, 0, 0);
        let c = IVec3::new(20, 0, 0);
        let d = IVec3::new(10, 10, 0);
        graph.connect(a, b, crate::field::type_bit(4));
        graph.connect(b, c, 0);
        graph.connect(a, d, 0);
        graph.connect(d, c, 0);
        graph
    }

    #[test]
    fn test_graph_route() {
        let graph = chain_graph();
        let path = astar_graph(
            &graph,
            IVec3::new(0, 0, 0),
            IVec3::new(20, 0, 0),
            &HazardTypes::none(),
            1000,
        )
        .unwrap();

        assert_eq!(
            path,
            vec![IVec3::new(0, 0, 0), IVec3::new(10, 0, 0), IVec3::new(20, 0, 0)]
        );
    }

    #[test]
    fn test_graph_route_avoids_masked_links() {
        let graph = chain_graph();
        let path = astar_graph(
            &graph,
            IVec3::new(0, 0, 0),
            IVec3::new(20, 0, 0),
            &HazardTypes::new(&[4]),
            1000,
        )
        .unwrap();

        assert_eq!(
            path,
            vec![IVec3::new(0, 0, 0), IVec3::new(10, 10, 0), IVec3::new(20, 0, 0)]
        );
    }

    #[test]
    fn test_graph_route_same_node() {
        let graph = chain_graph();
        let node = IVec3::new(10, 0, 0);
        let path = astar_graph(&graph, node, node, &HazardTypes::none(), 1000).unwrap();
        assert_eq!(path, vec![node]);
    }

    #[test]
    fn test_graph_route_disconnected() {
        let mut graph = chain_graph();
        graph.add_node(IVec3::new(100, 100, 0));
        let result = astar_graph(
            &graph,
            IVec3::new(0, 0, 0),
            IVec3::new(100, 100, 0),
            &HazardTypes::none(),
            1000,
        );
        assert_eq!(result, Err(PathError::NoGraphRoute));
    }
}
