//! Distance to the nearest obstacle and hazard around a cell.
use bevy::math::IVec3;
use rustc_hash::FxHashMap;

use crate::{
    cell,
    field::{CollisionField, HazardField, HazardTypes},
};

/// Rings scanned for obstacles.
pub const MAX_PROXIMITY_SCAN: i32 = 5;
/// Largest hazard buffer radius the scan supports.
pub const MAX_HAZARD_BUFFER: i32 = MAX_PROXIMITY_SCAN;

/// Cost multiplier indexed by obstacle distance, capped at the last entry.
/// `None` blocks the edge.
pub const PROXIMITY_COSTS: [Option<u32>; 9] = [
    None,
    Some(50),
    Some(25),
    Some(12),
    Some(6),
    Some(3),
    Some(1),
    Some(1),
    Some(1),
];

/// Result of a proximity scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proximity {
    /// Ring of the nearest blocked cell, `MAX_PROXIMITY_SCAN + 1` when none was found.
    pub obstacle: u32,
    /// Ring of the nearest hazardous cell, `0` when none was found.
    pub hazard: u32,
}

impl Proximity {
    pub const CLEAR: Proximity = Proximity {
        obstacle: MAX_PROXIMITY_SCAN as u32 + 1,
        hazard: 0,
    };

    /// Multiplier applied to the base step cost, `None` when the cell is unusable.
    pub fn multiplier(&self) -> Option<u32> {
        proximity_multiplier(self.obstacle)
    }
}

#[inline(always)]
pub fn proximity_multiplier(distance: u32) -> Option<u32> {
    PROXIMITY_COSTS[(distance as usize).min(PROXIMITY_COSTS.len() - 1)]
}

/// Terrain cost of entering a cell.
///
/// A hazardous cell costs `base`. Otherwise the cost halves for every ring
/// between the cell and the nearest hazard.
#[inline(always)]
pub fn hazard_cost(own_is_hazard: bool, hazard_distance: u32, base: u32) -> u32 {
    if own_is_hazard {
        base
    } else if hazard_distance > 0 {
        base.checked_shr(hazard_distance).unwrap_or(0)
    } else {
        0
    }
}

/// Ring cells at `r` in scan order: cardinals, corners, then edges walking
/// outward from the axes.
fn scan_ring(x: i32, y: i32, r: i32) -> impl Iterator<Item = (i32, i32)> {
    let cardinals = [(x, y + r), (x, y - r), (x + r, y), (x - r, y)];
    let corners = [(x + r, y + r), (x + r, y - r), (x - r, y + r), (x - r, y - r)];
    let edges = (1..r).flat_map(move |i| {
        [
            (x + i, y + r),
            (x - i, y + r),
            (x + i, y - r),
            (x - i, y - r),
            (x + r, y + i),
            (x + r, y - i),
            (x - r, y + i),
            (x - r, y - i),
        ]
    });

    cardinals.into_iter().chain(corners).chain(edges)
}

/// Scans outward from `cell` for the nearest blocked and hazardous cells.
///
/// Hazards are only looked for within `buffer_radius` rings. The scan stops as
/// soon as both have been found.
pub fn sample<C: CollisionField, H: HazardField>(
    collision: &C,
    hazard_field: &H,
    hazards: &HazardTypes,
    cell: IVec3,
    buffer_radius: i32,
) -> Proximity {
    let (x, y, plane) = (cell.x, cell.y, cell.z);
    let mut proximity = Proximity::CLEAR;
    let mut obstacle_found = false;
    let scan_hazards = !hazards.is_empty();

    for r in 1..=MAX_PROXIMITY_SCAN {
        if !obstacle_found
            && scan_ring(x, y, r).any(|(cx, cy)| !collision.is_walkable(cx, cy, plane))
        {
            proximity.obstacle = r as u32;
            obstacle_found = true;
        }

        if scan_hazards
            && proximity.hazard == 0
            && r <= buffer_radius
            && scan_ring(x, y, r).any(|(cx, cy)| hazards.contains(hazard_field.tile_type_at(cx, cy, plane)))
        {
            proximity.hazard = r as u32;
        }

        if obstacle_found && (proximity.hazard > 0 || !scan_hazards) {
            break;
        }
    }

    proximity
}

/// Per-search memo of [`sample`] results keyed by packed cell.
#[derive(Default)]
pub(crate) struct ProximityCache {
    cache: FxHashMap<u32, Proximity>,
}

impl ProximityCache {
    pub(crate) fn get_or_sample<C: CollisionField, H: HazardField>(
        &mut self,
        collision: &C,
        hazard_field: &H,
        hazards: &HazardTypes,
        cell: IVec3,
        buffer_radius: i32,
    ) -> Proximity {
        let Some(key) = cell::pack(cell) else {
            return sample(collision, hazard_field, hazards, cell, buffer_radius);
        };

        *self
            .cache
            .entry(key)
            .or_insert_with(|| sample(collision, hazard_field, hazards, cell, buffer_radius))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }
}
