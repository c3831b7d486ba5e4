//! Read-only views of the world the pathfinder consumes.
//!
//! Both fields must stay stable for the duration of one search and be safe to
//! read from several searches at once.

/// Answers point walkability queries.
pub trait CollisionField {
    fn is_walkable(&self, x: i32, y: i32, plane: i32) -> bool;
}

/// Classifies cells by terrain type. `0` means "no special type".
pub trait HazardField {
    fn tile_type_at(&self, x: i32, y: i32, plane: i32) -> u8;
}

impl<T: CollisionField + ?Sized> CollisionField for &T {
    #[inline(always)]
    fn is_walkable(&self, x: i32, y: i32, plane: i32) -> bool {
        (**self).is_walkable(x, y, plane)
    }
}

impl<T: HazardField + ?Sized> HazardField for &T {
    #[inline(always)]
    fn tile_type_at(&self, x: i32, y: i32, plane: i32) -> u8 {
        (**self).tile_type_at(x, y, plane)
    }
}

/// A hazard field with no hazards anywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHazards;

impl HazardField for NoHazards {
    fn tile_type_at(&self, _x: i32, _y: i32, _plane: i32) -> u8 {
        0
    }
}

/// Highest tile type that can be recorded in a graph edge mask.
pub const MAX_MASKED_TYPE: u8 = 16;

/// The set of tile types a single request wants to stay away from.
#[derive(Clone)]
pub struct HazardTypes {
    lookup: [bool; 256],
    mask: u16,
    any: bool,
}

impl HazardTypes {
    /// Builds the set from raw type values. Type `0` is ignored.
    pub fn new(types: &[u8]) -> Self {
        let mut lookup = [false; 256];
        let mut mask = 0;
        let mut any = false;
        for &t in types {
            if t == 0 {
                continue;
            }
            lookup[t as usize] = true;
            mask |= type_bit(t);
            any = true;
        }

        HazardTypes { lookup, mask, any }
    }

    /// No types are hazardous.
    pub fn none() -> Self {
        Self::new(&[])
    }

    #[inline(always)]
    pub fn contains(&self, tile_type: u8) -> bool {
        self.lookup[tile_type as usize]
    }

    /// Bitmask of the hazardous types in `1..=16`, bit `t - 1` for type `t`.
    pub fn mask(&self) -> u16 {
        self.mask
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        !self.any
    }
}

impl Default for HazardTypes {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for HazardTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let types: Vec<u8> = (0..=255u8).filter(|&t| self.contains(t)).collect();
        f.debug_tuple("HazardTypes").field(&types).finish()
    }
}

/// Graph mask bit for a tile type, `0` for types that cannot be masked.
#[inline(always)]
pub fn type_bit(tile_type: u8) -> u16 {
    if (1..=MAX_MASKED_TYPE).contains(&tile_type) {
        1 << (tile_type - 1)
    } else {
        0
    }
}
