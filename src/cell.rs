//! Packing of grid cells into integer keys and small integer geometry helpers.
use bevy::math::IVec3;

const X_BITS: u32 = 14;
const Y_BITS: u32 = 15;
const PLANE_BITS: u32 = 3;

const X_MASK: u32 = (1 << X_BITS) - 1;
const Y_MASK: u32 = (1 << Y_BITS) - 1;
const PLANE_MASK: u32 = (1 << PLANE_BITS) - 1;

/// Largest x coordinate that can be packed.
pub const MAX_X: i32 = X_MASK as i32;
/// Largest y coordinate that can be packed.
pub const MAX_Y: i32 = Y_MASK as i32;
/// Largest plane that can be packed.
pub const MAX_PLANE: i32 = PLANE_MASK as i32;

/// Packs a cell `(x, y, plane)` into a single `u32` key.
///
/// Layout is `x | y << 14 | plane << 29`. Returns `None` for cells outside
/// the packable range so callers never alias two cells onto one key.
#[inline(always)]
pub fn pack(cell: IVec3) -> Option<u32> {
    if cell.x < 0 || cell.x > MAX_X || cell.y < 0 || cell.y > MAX_Y || cell.z < 0 || cell.z > MAX_PLANE {
        return None;
    }

    Some(cell.x as u32 | (cell.y as u32) << X_BITS | (cell.z as u32) << (X_BITS + Y_BITS))
}

/// Inverse of [`pack`].
#[inline(always)]
pub fn unpack(key: u32) -> IVec3 {
    IVec3::new(
        (key & X_MASK) as i32,
        ((key >> X_BITS) & Y_MASK) as i32,
        ((key >> (X_BITS + Y_BITS)) & PLANE_MASK) as i32,
    )
}

/// Chebyshev distance between two cells, ignoring the plane.
#[inline(always)]
pub fn chebyshev(a: IVec3, b: IVec3) -> u32 {
    let dx = (a.x - b.x).unsigned_abs();
    let dy = (a.y - b.y).unsigned_abs();
    dx.max(dy)
}

/// Squared euclidean distance between two cells, ignoring the plane.
#[inline(always)]
pub fn distance_squared(a: IVec3, b: IVec3) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

/// Iterates the perimeter of the square ring at `radius` around `center`.
///
/// Order is column-major from `(-r, -r)`; callers treat the first hit as the
/// nearest, which only approximates true euclidean nearest-neighbour.
pub(crate) fn ring(center: IVec3, radius: i32) -> impl Iterator<Item = IVec3> {
    (-radius..=radius).flat_map(move |dx| {
        (-radius..=radius).filter_map(move |dy| {
            if dx.abs() != radius && dy.abs() != radius {
                return None;
            }
            Some(IVec3::new(center.x + dx, center.y + dy, center.z))
        })
    })
}

/// Ring scan from `center` outward up to `max_radius`, center first.
pub(crate) fn spiral(center: IVec3, max_radius: i32) -> impl Iterator<Item = IVec3> {
    std::iter::once(center).chain((1..=max_radius).flat_map(move |r| ring(center, r)))
}
