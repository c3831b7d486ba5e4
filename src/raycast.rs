//! Line tracing over the tile plane.
use bevy::math::IVec3;

use crate::field::{type_bit, CollisionField, HazardField};

/// Traces an 8-connected Bresenham line from `start` to `end`, both included.
///
/// The plane of `start` is kept for every cell.
///
/// # Example
///
/// ```
/// use bevy::math::IVec3;
/// use bevy_seaway::raycast::bresenham_line;
///
/// let line = bresenham_line(IVec3::new(0, 0, 0), IVec3::new(4, 2, 0));
///
/// assert_eq!(line.first(), Some(&IVec3::new(0, 0, 0)));
/// assert_eq!(line.last(), Some(&IVec3::new(4, 2, 0)));
/// assert_eq!(line.len(), 5);
/// ```
pub fn bresenham_line(start: IVec3, end: IVec3) -> Vec<IVec3> {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };

    let mut err = dx + dy;
    let mut current = start;
    let mut line = Vec::with_capacity((dx.max(-dy) + 1) as usize);

    loop {
        line.push(current);

        if current.x == end.x && current.y == end.y {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.x += sx;
        }
        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
    }

    line
}

/// Check if every cell on the line between `start` and `end` is walkable.
pub fn line_of_sight<C: CollisionField>(field: &C, start: IVec3, end: IVec3) -> bool {
    bresenham_line(start, end)
        .iter()
        .all(|c| field.is_walkable(c.x, c.y, c.z))
}

/// Mask of the maskable tile types crossed by the line between `start` and `end`.
pub fn line_type_mask<H: HazardField>(field: &H, start: IVec3, end: IVec3) -> u16 {
    bresenham_line(start, end)
        .iter()
        .fold(0, |mask, c| mask | type_bit(field.tile_type_at(c.x, c.y, c.z)))
}
