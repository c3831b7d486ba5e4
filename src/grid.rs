//! This module contains the `Grid`, a dense tile map implementing both
//! [`CollisionField`] and [`HazardField`].
use bevy::math::{IVec3, UVec3};
use ndarray::{Array3, ArrayView3};

use crate::field::{CollisionField, HazardField};

/// A single tile of the [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Whether a hull cell may occupy this tile.
    pub walkable: bool,
    /// Terrain classification, `0` for plain water.
    pub tile_type: u8,
}

impl Tile {
    pub fn new(walkable: bool, tile_type: u8) -> Self {
        Tile {
            walkable,
            tile_type,
        }
    }

    /// Open tile with no special type.
    pub fn open() -> Self {
        Tile::new(true, 0)
    }

    /// Blocked tile.
    pub fn solid() -> Self {
        Tile::new(false, 0)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::open()
    }
}

/// Dense `width x height x planes` tile storage.
///
/// Cells outside the grid read as blocked with tile type `0`.
///
/// # Example
/// ```
/// use bevy::math::IVec3;
/// use bevy_seaway::prelude::*;
///
/// let mut grid = Grid::new(16, 16, 1);
/// grid.set_walkable(IVec3::new(4, 4, 0), false);
///
/// assert!(!grid.is_walkable(4, 4, 0));
/// assert!(!grid.is_walkable(-1, 0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    dimensions: UVec3,
    tiles: Array3<Tile>,
}

impl Grid {
    /// Creates a grid filled with open tiles.
    pub fn new(width: u32, height: u32, planes: u32) -> Self {
        Self::filled(width, height, planes, Tile::open())
    }

    /// Creates a grid filled with `tile`.
    pub fn filled(width: u32, height: u32, planes: u32, tile: Tile) -> Self {
        if width == 0 || height == 0 || planes == 0 {
            panic!("Grid dimensions must be non-zero");
        }

        Grid {
            dimensions: UVec3::new(width, height, planes),
            tiles: Array3::from_elem((width as usize, height as usize, planes as usize), tile),
        }
    }

    pub fn dimensions(&self) -> UVec3 {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.x
    }

    pub fn height(&self) -> u32 {
        self.dimensions.y
    }

    pub fn planes(&self) -> u32 {
        self.dimensions.z
    }

    /// Read-only view of the tile data.
    pub fn view(&self) -> ArrayView3<Tile> {
        self.tiles.view()
    }

    /// Checks if a cell is within the bounds of the grid.
    pub fn in_bounds(&self, cell: IVec3) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.z >= 0
            && (cell.x as u32) < self.dimensions.x
            && (cell.y as u32) < self.dimensions.y
            && (cell.z as u32) < self.dimensions.z
    }

    pub fn tile(&self, cell: IVec3) -> Option<Tile> {
        if !self.in_bounds(cell) {
            return None;
        }

        Some(self.tiles[[cell.x as usize, cell.y as usize, cell.z as usize]])
    }

    /// Replaces the tile at `cell`. Panics if `cell` is out of bounds.
    pub fn set_tile(&mut self, cell: IVec3, tile: Tile) {
        if !self.in_bounds(cell) {
            panic!("Attempted to set tile at out-of-bounds position {cell}");
        }

        self.tiles[[cell.x as usize, cell.y as usize, cell.z as usize]] = tile;
    }

    pub fn set_walkable(&mut self, cell: IVec3, walkable: bool) {
        let tile = self.tile(cell).unwrap_or_default();
        self.set_tile(cell, Tile { walkable, ..tile });
    }

    pub fn set_tile_type(&mut self, cell: IVec3, tile_type: u8) {
        let tile = self.tile(cell).unwrap_or_default();
        self.set_tile(cell, Tile { tile_type, ..tile });
    }

    /// Blocks every cell in the inclusive rectangle `min..=max` on `min.z`.
    pub fn fill_solid(&mut self, min: IVec3, max: IVec3) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                self.set_walkable(IVec3::new(x, y, min.z), false);
            }
        }
    }
}

impl CollisionField for Grid {
    #[inline(always)]
    fn is_walkable(&self, x: i32, y: i32, plane: i32) -> bool {
        self.tile(IVec3::new(x, y, plane))
            .map(|tile| tile.walkable)
            .unwrap_or(false)
    }
}

impl HazardField for Grid {
    #[inline(always)]
    fn tile_type_at(&self, x: i32, y: i32, plane: i32) -> u8 {
        self.tile(IVec3::new(x, y, plane))
            .map(|tile| tile.tile_type)
            .unwrap_or(0)
    }
}
