//! The 8 travel directions used when expanding a cell.
use bevy::math::IVec3;

use crate::heading::Heading;

/// Cost of an orthogonal step.
pub const ORTHOGONAL_COST: u32 = 10;
/// Cost of a diagonal step, roughly `ORTHOGONAL_COST * sqrt(2)`.
pub const DIAGONAL_COST: u32 = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    WEST = 0,
    EAST = 1,
    SOUTH = 2,
    NORTH = 3,
    SOUTHWEST = 4,
    SOUTHEAST = 5,
    NORTHWEST = 6,
    NORTHEAST = 7,
}

pub use self::Dir::*;

/// Index = `(dx + 1) * 3 + (dy + 1)`.
const DELTA_LUT: [Option<Dir>; 9] = [
    Some(SOUTHWEST),
    Some(WEST),
    Some(NORTHWEST),
    Some(SOUTH),
    None,
    Some(NORTH),
    Some(SOUTHEAST),
    Some(EAST),
    Some(NORTHEAST),
];

impl Dir {
    /// All 8 directions in expansion order.
    pub const ALL: [Dir; 8] = [WEST, EAST, SOUTH, NORTH, SOUTHWEST, SOUTHEAST, NORTHWEST, NORTHEAST];

    pub fn all() -> std::iter::Copied<std::slice::Iter<'static, Dir>> {
        Self::ALL.iter().copied()
    }

    /// Slot index into the hull cache.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn vector(self) -> (i32, i32) {
        match self {
            WEST => (-1, 0),
            EAST => (1, 0),
            SOUTH => (0, -1),
            NORTH => (0, 1),
            SOUTHWEST => (-1, -1),
            SOUTHEAST => (1, -1),
            NORTHWEST => (-1, 1),
            NORTHEAST => (1, 1),
        }
    }

    #[inline(always)]
    pub fn offset(self) -> IVec3 {
        let (dx, dy) = self.vector();
        IVec3::new(dx, dy, 0)
    }

    pub fn is_diagonal(self) -> bool {
        matches!(self, SOUTHWEST | SOUTHEAST | NORTHWEST | NORTHEAST)
    }

    /// Base movement cost for a step in this direction.
    #[inline(always)]
    pub fn base_cost(self) -> u32 {
        if self.is_diagonal() {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        }
    }

    /// The heading a vessel faces when travelling in this direction.
    pub fn heading(self) -> Heading {
        match self {
            WEST => Heading::West,
            EAST => Heading::East,
            SOUTH => Heading::South,
            NORTH => Heading::North,
            SOUTHWEST => Heading::SouthWest,
            SOUTHEAST => Heading::SouthEast,
            NORTHWEST => Heading::NorthWest,
            NORTHEAST => Heading::NorthEast,
        }
    }

    /// Direction of a single step `from -> to`, `None` if the cells coincide.
    #[inline(always)]
    pub fn between(from: IVec3, to: IVec3) -> Option<Dir> {
        let dx = (to.x - from.x).signum();
        let dy = (to.y - from.y).signum();
        DELTA_LUT[((dx + 1) * 3 + (dy + 1)) as usize]
    }

    pub fn opposite(self) -> Dir {
        match self {
            WEST => EAST,
            EAST => WEST,
            SOUTH => NORTH,
            NORTH => SOUTH,
            SOUTHWEST => NORTHEAST,
            SOUTHEAST => NORTHWEST,
            NORTHWEST => SOUTHEAST,
            NORTHEAST => SOUTHWEST,
        }
    }
}
