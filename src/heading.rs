//! The 16 discrete vessel orientations.
use bevy::math::IVec3;
use strum::{EnumIter, FromRepr, IntoEnumIterator};

/// Number of discrete headings. Each step is 22.5°.
pub const HEADING_COUNT: i32 = 16;

/// One of 16 orientations spaced 22.5° apart, measured clockwise from south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, EnumIter, FromRepr)]
#[repr(u8)]
pub enum Heading {
    #[default]
    South = 0,
    SouthSouthWest = 1,
    SouthWest = 2,
    WestSouthWest = 3,
    West = 4,
    WestNorthWest = 5,
    NorthWest = 6,
    NorthNorthWest = 7,
    North = 8,
    NorthNorthEast = 9,
    NorthEast = 10,
    EastNorthEast = 11,
    East = 12,
    EastSouthEast = 13,
    SouthEast = 14,
    SouthSouthEast = 15,
}

impl Heading {
    /// All 16 headings in value order.
    pub fn all() -> impl Iterator<Item = Heading> {
        Heading::iter()
    }

    /// Raw heading value in `0..16`.
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Heading for any integer value, wrapping around the circle.
    pub fn from_value(value: i32) -> Heading {
        // rem_euclid keeps the value in 0..16 so from_repr always matches
        Heading::from_repr(value.rem_euclid(HEADING_COUNT) as u8).unwrap_or_default()
    }

    /// Heading that best points along the displacement `from -> to`.
    ///
    /// Returns `None` when both cells are the same.
    pub fn between(from: IVec3, to: IVec3) -> Option<Heading> {
        let dx = (to.x - from.x) as f64;
        let dy = (to.y - from.y) as f64;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let degrees = (-dx).atan2(-dy).to_degrees().rem_euclid(360.0);
        Some(Heading::from_value((degrees / 22.5).round() as i32))
    }

    /// Signed shortest rotation from `self` to `other`, normalized to `[-8, 7]`.
    pub fn rotation_to(self, other: Heading) -> i32 {
        normalize_rotation(other.value() - self.value())
    }

    /// Unsigned wrap-aware difference in `0..=8`.
    pub fn difference(self, other: Heading) -> i32 {
        heading_difference(self.value(), other.value())
    }

    /// Rotation angle in radians for a number of heading steps.
    pub(crate) fn steps_to_radians(steps: i32) -> f64 {
        steps as f64 * std::f64::consts::PI / 8.0
    }
}

/// Normalizes a heading delta to the shortest signed rotation in `[-8, 7]`.
#[inline(always)]
pub fn normalize_rotation(delta: i32) -> i32 {
    (delta + 8).rem_euclid(HEADING_COUNT) - 8
}

/// Wrap-aware absolute difference of two heading values, in `0..=8`.
#[inline(always)]
pub fn heading_difference(a: i32, b: i32) -> i32 {
    let diff = (a - b).rem_euclid(HEADING_COUNT);
    diff.min(HEADING_COUNT - diff)
}
