//! Corridor around a coarse graph route that confines the tile search.
use bevy::math::IVec3;
use rustc_hash::FxHashMap;

use crate::cell::{self, distance_squared};

/// Band of cells within `deviation` of a route polyline.
///
/// The polyline is the graph node route, extended by the actual start and
/// goal cells which may sit some way off the nearest nodes.
#[derive(Debug, Clone)]
pub struct Corridor {
    nodes: Vec<IVec3>,
    start: IVec3,
    goal: IVec3,
    deviation: u32,
    pull_weight: u32,
    memo: FxHashMap<u32, Option<u32>>,
}

impl Corridor {
    pub fn new(nodes: Vec<IVec3>, start: IVec3, goal: IVec3, deviation: u32, pull_weight: u32) -> Self {
        Corridor {
            nodes,
            start,
            goal,
            deviation,
            pull_weight,
            memo: FxHashMap::default(),
        }
    }

    pub fn nodes(&self) -> &[IVec3] {
        &self.nodes
    }

    pub fn deviation(&self) -> u32 {
        self.deviation
    }

    /// Squared distance of `cell` from the route, `None` when outside the band.
    ///
    /// A route with fewer than two nodes does not constrain anything and every
    /// cell sits on its centerline.
    pub fn distance_squared(&self, cell: IVec3) -> Option<u32> {
        if self.nodes.len() < 2 {
            return Some(0);
        }

        let mut min = distance_squared(cell, self.start).min(distance_squared(cell, self.goal));

        for segment in self.nodes.windows(2) {
            min = min.min(point_to_segment_distance_squared(cell, segment[0], segment[1]));
        }

        if let (Some(first), Some(last)) = (self.nodes.first(), self.nodes.last()) {
            min = min
                .min(distance_squared(cell, *first))
                .min(distance_squared(cell, *last));
        }

        let limit = self.deviation as i64 * self.deviation as i64;
        (min <= limit).then_some(min as u32)
    }

    /// Memoized [`Corridor::distance_squared`].
    pub(crate) fn distance_squared_cached(&mut self, cell: IVec3) -> Option<u32> {
        let Some(key) = cell::pack(cell) else {
            return self.distance_squared(cell);
        };

        if let Some(&cached) = self.memo.get(&key) {
            return cached;
        }

        let distance = self.distance_squared(cell);
        self.memo.insert(key, distance);
        distance
    }

    /// Extra priority for cells away from the centerline. Never added to g.
    #[inline(always)]
    pub fn pull_penalty(&self, distance_squared: u32) -> u32 {
        distance_squared
            .checked_div(self.deviation)
            .map_or(0, |steps| steps.saturating_mul(self.pull_weight))
    }
}

/// Squared distance from `p` to the segment `a..b`.
///
/// The projection uses integer math and truncating division, so the result
/// can overshoot the true distance by a fraction of a cell.
pub fn point_to_segment_distance_squared(p: IVec3, a: IVec3, b: IVec3) -> i64 {
    let (px, py) = (p.x as i64, p.y as i64);
    let (x1, y1) = (a.x as i64, a.y as i64);
    let (x2, y2) = (b.x as i64, b.y as i64);

    let dx = x2 - x1;
    let dy = y2 - y1;
    let length_squared = dx * dx + dy * dy;

    if length_squared == 0 {
        return (px - x1).pow(2) + (py - y1).pow(2);
    }

    let dot = (px - x1) * dx + (py - y1) * dy;
    let (proj_x, proj_y) = if dot <= 0 {
        (x1, y1)
    } else if dot >= length_squared {
        (x2, y2)
    } else {
        (x1 + dot * dx / length_squared, y1 + dot * dy / length_squared)
    };

    (px - proj_x).pow(2) + (py - proj_y).pow(2)
}
