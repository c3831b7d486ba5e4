//! Tunable knobs for the pathfinder.

/// Holder for internal crate settings. Build it with [`PathfindSettingsBuilder`].
#[derive(Clone, Debug)]
pub struct PathfindSettings(pub(crate) PathfindInternalSettings);

impl Default for PathfindSettings {
    fn default() -> Self {
        PathfindSettingsBuilder::default().build()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct PathfindInternalSettings {
    pub(crate) max_iterations: usize,
    pub(crate) graph_max_iterations: usize,
    pub(crate) heuristic_weight: u32,
    pub(crate) near_start_radius: i32,
    pub(crate) goal_search_radius: i32,
    pub(crate) node_search_radius: i32,
    pub(crate) corridor_deviation: u32,
    pub(crate) corridor_pull_weight: u32,
    pub(crate) hazard_cost: u32,
    pub(crate) hazard_buffer_radius: i32,
    pub(crate) avoid_cost: u32,
    pub(crate) alternation_cost: u32,
}

impl PathfindSettings {
    /// Maximum heap pops of the tile-level search.
    pub fn max_iterations(&self) -> usize {
        self.0.max_iterations
    }

    /// Maximum heap pops of the graph search.
    pub fn graph_max_iterations(&self) -> usize {
        self.0.graph_max_iterations
    }

    /// Heuristic weight in percent.
    pub fn heuristic_weight(&self) -> u32 {
        self.0.heuristic_weight
    }

    pub fn near_start_radius(&self) -> i32 {
        self.0.near_start_radius
    }

    pub fn goal_search_radius(&self) -> i32 {
        self.0.goal_search_radius
    }

    pub fn node_search_radius(&self) -> i32 {
        self.0.node_search_radius
    }

    pub fn corridor_deviation(&self) -> u32 {
        self.0.corridor_deviation
    }

    pub fn corridor_pull_weight(&self) -> u32 {
        self.0.corridor_pull_weight
    }

    pub fn hazard_cost(&self) -> u32 {
        self.0.hazard_cost
    }

    pub fn hazard_buffer_radius(&self) -> i32 {
        self.0.hazard_buffer_radius
    }

    pub fn avoid_cost(&self) -> u32 {
        self.0.avoid_cost
    }

    pub fn alternation_cost(&self) -> u32 {
        self.0.alternation_cost
    }
}

/// Builder for [`PathfindSettings`].
///
/// Example usage:
/// ```
/// use bevy_seaway::prelude::*;
///
/// let settings = PathfindSettingsBuilder::new()
///     .max_iterations(200_000)
///     .corridor_deviation(12)
///     .goal_search_radius(4)
///     .build();
///
/// assert_eq!(settings.corridor_deviation(), 12);
/// ```
#[derive(Clone, Debug)]
pub struct PathfindSettingsBuilder {
    settings: PathfindInternalSettings,
}

impl Default for PathfindSettingsBuilder {
    fn default() -> Self {
        PathfindSettingsBuilder {
            settings: PathfindInternalSettings {
                max_iterations: 1_000_000,
                graph_max_iterations: 100_000,
                heuristic_weight: 150,
                near_start_radius: 3,
                goal_search_radius: 10,
                node_search_radius: 100,
                corridor_deviation: 25,
                corridor_pull_weight: 2,
                hazard_cost: 10_000,
                hazard_buffer_radius: 4,
                avoid_cost: 100,
                alternation_cost: 25,
            },
        }
    }
}

impl PathfindSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iteration budget of the tile-level search. Must be at least 1.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        if max_iterations == 0 {
            panic!("Max iterations must be at least 1");
        }

        self.settings.max_iterations = max_iterations;
        self
    }

    /// Iteration budget of the graph search. Must be at least 1.
    pub fn graph_max_iterations(mut self, max_iterations: usize) -> Self {
        if max_iterations == 0 {
            panic!("Graph max iterations must be at least 1");
        }

        self.settings.graph_max_iterations = max_iterations;
        self
    }

    /// Weight applied to the heuristic, in percent. 100 is plain A*,
    /// larger values trade path quality for fewer expansions.
    pub fn heuristic_weight(mut self, percent: u32) -> Self {
        if percent < 100 {
            panic!("Heuristic weight must be at least 100 percent");
        }

        self.settings.heuristic_weight = percent;
        self
    }

    /// Cells within this Chebyshev radius of the start are tested with the
    /// vessel's current, unrotated footprint.
    pub fn near_start_radius(mut self, radius: i32) -> Self {
        if radius < 0 {
            panic!("Near start radius cannot be negative");
        }

        self.settings.near_start_radius = radius;
        self
    }

    /// How far to look for a substitute goal when the hull does not fit at the requested one.
    pub fn goal_search_radius(mut self, radius: i32) -> Self {
        if radius < 0 {
            panic!("Goal search radius cannot be negative");
        }

        self.settings.goal_search_radius = radius;
        self
    }

    /// How far to look for the nearest navigation graph node.
    pub fn node_search_radius(mut self, radius: i32) -> Self {
        if radius < 0 {
            panic!("Node search radius cannot be negative");
        }

        self.settings.node_search_radius = radius;
        self
    }

    /// Maximum distance of a refined path cell from the graph route. Must be at least 1.
    pub fn corridor_deviation(mut self, deviation: u32) -> Self {
        if deviation == 0 {
            panic!("Corridor deviation must be at least 1");
        }

        self.settings.corridor_deviation = deviation;
        self
    }

    /// Strength of the pull towards the corridor centerline. `0` disables it.
    pub fn corridor_pull_weight(mut self, weight: u32) -> Self {
        self.settings.corridor_pull_weight = weight;
        self
    }

    /// Flat cost of entering a hazardous tile. Also the base of the buffer falloff.
    pub fn hazard_cost(mut self, cost: u32) -> Self {
        self.settings.hazard_cost = cost;
        self
    }

    /// Radius around a cell scanned for hazardous tiles.
    pub fn hazard_buffer_radius(mut self, radius: i32) -> Self {
        if !(0..=crate::proximity::MAX_HAZARD_BUFFER).contains(&radius) {
            panic!(
                "Hazard buffer radius must be within 0..={}",
                crate::proximity::MAX_HAZARD_BUFFER
            );
        }

        self.settings.hazard_buffer_radius = radius;
        self
    }

    /// Cost of entering one of the caller supplied avoid cells.
    pub fn avoid_cost(mut self, cost: u32) -> Self {
        self.settings.avoid_cost = cost;
        self
    }

    /// Flat penalty for a low-amplitude zig-zag.
    pub fn alternation_cost(mut self, cost: u32) -> Self {
        self.settings.alternation_cost = cost;
        self
    }

    /// Builds the [`PathfindSettings`] from the current builder state.
    pub fn build(self) -> PathfindSettings {
        PathfindSettings(self.settings)
    }
}
