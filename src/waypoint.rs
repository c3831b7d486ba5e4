//! Reduces a dense cell path to sparse heading-tagged waypoints.
use bevy::math::IVec3;

use crate::heading::Heading;

/// Cells in the smoothing window.
pub const WINDOW_SIZE: usize = 4;
/// Longest segment before a waypoint is forced.
pub const MAX_SEGMENT_LENGTH: usize = 25;
/// Furthest a cell may stray from its segment's straight line.
pub const MAX_DEVIATION: f64 = 2.0;

/// A commanded course change: reach `position`, facing `heading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Waypoint {
    pub position: IVec3,
    pub heading: Heading,
}

impl Waypoint {
    pub fn new(position: IVec3, heading: Heading) -> Self {
        Waypoint { position, heading }
    }
}

fn heading_or(from: IVec3, to: IVec3, fallback: Heading) -> Heading {
    Heading::between(from, to).unwrap_or(fallback)
}

/// Converts a dense path into waypoints.
///
/// A window of [`WINDOW_SIZE`] cells gives a smoothed local heading. A new
/// waypoint is placed at the start of the window when that heading is more
/// than one step off the segment heading, when the segment reaches
/// [`MAX_SEGMENT_LENGTH`] cells, or when a cell of the segment strays more
/// than [`MAX_DEVIATION`] from the straight line between its ends.
///
/// The first and last waypoints are always the first and last cells, every
/// waypoint is a cell of `path` in path order, and consecutive waypoints are
/// fewer than [`MAX_SEGMENT_LENGTH`] cells apart along it. Paths shorter than
/// two cells give no waypoints.
///
/// Rasterizing the waypoints and extracting again keeps straight runs and
/// clean turns unchanged, but on winding paths it may shift or add interior
/// waypoints because the turn detection window starts on different cells.
///
/// # Example
/// ```
/// use bevy::math::IVec3;
/// use bevy_seaway::prelude::*;
///
/// let path: Vec<_> = (0..10).map(|i| IVec3::new(i, i, 0)).collect();
/// let waypoints = to_waypoints(&path);
///
/// assert_eq!(waypoints.len(), 2);
/// assert_eq!(waypoints[0].heading, Heading::NorthEast);
/// ```
pub fn to_waypoints(path: &[IVec3]) -> Vec<Waypoint> {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return Vec::new();
    };
    if path.len() < 2 {
        return Vec::new();
    }

    let lookahead = path[WINDOW_SIZE.min(path.len() - 1)];
    let start_heading = heading_or(first, lookahead, Heading::default());

    let mut waypoints = vec![Waypoint::new(first, start_heading)];
    let mut segment_start = 0;
    let mut segment_heading = start_heading;

    for i in WINDOW_SIZE..path.len() {
        let window_start = i - WINDOW_SIZE;
        // Would repeat the waypoint the segment started on.
        if window_start == segment_start {
            continue;
        }

        let local_heading = heading_or(path[window_start], path[i], segment_heading);

        let turned = local_heading.difference(segment_heading) > 1;
        let too_long = i - segment_start >= MAX_SEGMENT_LENGTH;

        if turned || too_long || deviates(path, segment_start, i) {
            let turn_point = path[window_start];
            let heading = heading_or(path[segment_start], turn_point, segment_heading);
            waypoints.push(Waypoint::new(turn_point, heading));

            segment_start = window_start;
            segment_heading = local_heading;
        }
    }

    let final_heading = heading_or(path[segment_start], last, segment_heading);
    waypoints.push(Waypoint::new(last, final_heading));

    waypoints
}

/// Does any cell strictly between `start` and `end` lie further than
/// [`MAX_DEVIATION`] from the line joining them?
fn deviates(path: &[IVec3], start: usize, end: usize) -> bool {
    let a = path[start];
    let b = path[end];

    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let length = (dx * dx + dy * dy).sqrt();

    if length < 1.0 {
        return false;
    }

    let offset = b.x as f64 * a.y as f64 - b.y as f64 * a.x as f64;

    path[start + 1..end].iter().any(|p| {
        let distance = (dy * p.x as f64 - dx * p.y as f64 + offset).abs() / length;
        distance > MAX_DEVIATION
    })
}
