//! Reasons a path request can fail.
use bevy::math::IVec3;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("the vessel footprint is unavailable or empty")]
    EmptyFootprint,
    #[error("cell {0} is outside the supported coordinate range")]
    OutOfRange(IVec3),
    #[error("the hull does not fit within {radius} cells of goal {goal}")]
    NoFittingGoal { goal: IVec3, radius: i32 },
    #[error("goal not reached after {iterations} iterations")]
    Unreachable { iterations: usize },
    #[error("no navigation graph node near {0}")]
    NoNodeNear(IVec3),
    #[error("no navigation graph route between the nearest nodes")]
    NoGraphRoute,
}

impl PathError {
    /// Failures of the coarse graph stage rather than the tile search.
    pub fn is_graph_failure(&self) -> bool {
        matches!(self, PathError::NoNodeNear(_) | PathError::NoGraphRoute)
    }
}
