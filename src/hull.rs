//! Vessel footprints and the per-search rotated footprint cache.
use bevy::math::{IVec2, IVec3};
use smallvec::SmallVec;

use crate::{cell, dir::Dir, field::CollisionField, heading::Heading};

/// Slot of the unrotated footprint in a [`HullCache`].
pub const UNROTATED_SLOT: usize = 8;
const SLOT_COUNT: usize = 9;

/// Hull cells are always tested on the water plane.
const HULL_PLANE: i32 = 0;

type Offsets = SmallVec<[IVec2; 32]>;

/// The cells a vessel occupies relative to its pivot, captured at `heading`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    pub offsets: Vec<IVec2>,
    pub heading: Heading,
}

impl Footprint {
    pub fn new(offsets: Vec<IVec2>, heading: Heading) -> Self {
        Footprint { offsets, heading }
    }

    /// Builds a footprint from world cells occupied by a vessel pivoted at `pivot`.
    pub fn from_cells(cells: impl IntoIterator<Item = IVec3>, pivot: IVec3, heading: Heading) -> Self {
        let offsets = cells
            .into_iter()
            .map(|cell| IVec2::new(cell.x - pivot.x, cell.y - pivot.y))
            .collect();

        Footprint { offsets, heading }
    }

    /// A `width x height` rectangle centred on the pivot.
    pub fn rectangle(width: i32, height: i32, heading: Heading) -> Self {
        let offsets = (0..width)
            .flat_map(|x| (0..height).map(move |y| IVec2::new(x - width / 2, y - height / 2)))
            .collect();

        Footprint { offsets, heading }
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offsets rotated so the footprint faces `heading`.
    pub fn rotated(&self, heading: Heading) -> impl Iterator<Item = IVec2> + '_ {
        rotate_offsets(&self.offsets, self.heading.rotation_to(heading))
    }

    /// World cells the hull would cover pivoted at `at` facing `heading`.
    pub fn project(&self, at: IVec3, heading: Heading) -> Vec<IVec3> {
        self.rotated(heading)
            .map(|o| IVec3::new(at.x + o.x, at.y + o.y, HULL_PLANE))
            .collect()
    }

    /// Does the hull fit at `cell` facing `heading`?
    pub fn fits<C: CollisionField>(&self, field: &C, cell: IVec3, heading: Heading) -> bool {
        self.rotated(heading)
            .all(|o| field.is_walkable(cell.x + o.x, cell.y + o.y, HULL_PLANE))
    }

    /// First heading in value order under which the hull fits at `cell`.
    pub fn any_fitting_heading<C: CollisionField>(&self, field: &C, cell: IVec3) -> Option<Heading> {
        Heading::all().find(|&heading| self.fits(field, cell, heading))
    }

    /// Nearest cell to `goal` where the hull fits under some heading.
    ///
    /// `goal` itself is tried first, then square rings out to `radius`. The
    /// first hit in ring order wins.
    pub fn nearest_fitting_cell<C: CollisionField>(&self, field: &C, goal: IVec3, radius: i32) -> Option<IVec3> {
        cell::spiral(goal, radius).find(|&cell| self.any_fitting_heading(field, cell).is_some())
    }

    /// Like [`Footprint::nearest_fitting_cell`] for one fixed heading.
    pub fn nearest_fitting_cell_with_heading<C: CollisionField>(
        &self,
        field: &C,
        goal: IVec3,
        heading: Heading,
        radius: i32,
    ) -> Option<IVec3> {
        cell::spiral(goal, radius).find(|&cell| self.fits(field, cell, heading))
    }
}

/// Source of the live footprint of the vessel being planned for.
///
/// Sampled exactly once at the start of a search.
pub trait FootprintProvider {
    fn footprint(&self) -> Option<Footprint>;
}

impl FootprintProvider for Footprint {
    fn footprint(&self) -> Option<Footprint> {
        Some(self.clone())
    }
}

impl<F: Fn() -> Option<Footprint>> FootprintProvider for F {
    fn footprint(&self) -> Option<Footprint> {
        self()
    }
}

/// Rotates every offset by `steps * 22.5°` and rounds to the nearest cell.
pub(crate) fn rotate_offsets(offsets: &[IVec2], steps: i32) -> impl Iterator<Item = IVec2> + '_ {
    let radians = Heading::steps_to_radians(steps);
    let (sin, cos) = radians.sin_cos();

    offsets.iter().map(move |o| {
        let x = o.x as f64;
        let y = o.y as f64;
        IVec2::new(
            (x * cos - y * sin).round() as i32,
            (x * sin + y * cos).round() as i32,
        )
    })
}

/// Footprint offsets pre-rotated for each travel direction plus the
/// unrotated current orientation.
///
/// All rotation happens from the original offsets at construction, so the
/// search loop only does integer additions.
#[derive(Clone, Debug)]
pub struct HullCache {
    slots: [Offsets; SLOT_COUNT],
}

impl HullCache {
    pub fn new(footprint: &Footprint) -> Self {
        let mut slots: [Offsets; SLOT_COUNT] = Default::default();

        for dir in Dir::all() {
            let steps = footprint.heading.rotation_to(dir.heading());
            slots[dir.index()] = rotate_offsets(&footprint.offsets, steps).collect();
        }

        slots[UNROTATED_SLOT] = footprint.offsets.iter().copied().collect();

        HullCache { slots }
    }

    pub fn offsets(&self, slot: usize) -> &[IVec2] {
        &self.slots[slot]
    }

    /// Tests every offset of `slot` placed at `cell`, stopping at the first blocked one.
    #[inline(always)]
    pub fn fits<C: CollisionField>(&self, field: &C, cell: IVec3, slot: usize) -> bool {
        self.slots[slot]
            .iter()
            .all(|o| field.is_walkable(cell.x + o.x, cell.y + o.y, HULL_PLANE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn bow_footprint() -> Footprint {
        // Three cells in a line pointing south from the pivot.
        Footprint::new(
            vec![IVec2::new(0, 0), IVec2::new(0, -1), IVec2::new(0, -2)],
            Heading::South,
        )
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let rotated: Vec<_> = rotate_offsets(&[IVec2::new(0, -2)], 4).collect();
        assert_eq!(rotated, vec![IVec2::new(2, 0)]);

        let rotated: Vec<_> = rotate_offsets(&[IVec2::new(0, -2)], -4).collect();
        assert_eq!(rotated, vec![IVec2::new(-2, 0)]);
    }

    #[test]
    fn test_rotation_half_turn() {
        let rotated: Vec<_> = rotate_offsets(&[IVec2::new(3, 1)], -8).collect();
        assert_eq!(rotated, vec![IVec2::new(-3, -1)]);
    }

    #[test]
    fn test_cache_slots_match_direct_rotation() {
        let footprint = bow_footprint();
        let cache = HullCache::new(&footprint);

        for dir in Dir::all() {
            let direct: Vec<_> = footprint.rotated(dir.heading()).collect();
            assert_eq!(cache.offsets(dir.index()), direct.as_slice());
        }

        assert_eq!(cache.offsets(UNROTATED_SLOT), footprint.offsets.as_slice());
        assert_eq!(cache.offsets(Dir::SOUTH.index()), footprint.offsets.as_slice());
    }

    #[test]
    fn test_empty_footprint_always_fits() {
        let footprint = Footprint::new(vec![], Heading::North);
        let cache = HullCache::new(&footprint);
        let grid = Grid::filled(4, 4, 1, crate::grid::Tile::solid());

        for slot in 0..9 {
            assert!(cache.offsets(slot).is_empty());
            assert!(cache.fits(&grid, IVec3::new(1, 1, 0), slot));
        }
    }

    #[test]
    fn test_fits_checks_every_offset() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set_walkable(IVec3::new(5, 3, 0), false);
        let cache = HullCache::new(&bow_footprint());

        // Facing south from (5, 5) the hull covers (5, 3).
        assert!(!cache.fits(&grid, IVec3::new(5, 5, 0), Dir::SOUTH.index()));
        // Facing north it covers (5, 6) and (5, 7) instead.
        assert!(cache.fits(&grid, IVec3::new(5, 5, 0), Dir::NORTH.index()));
    }

    #[test]
    fn test_any_fitting_heading() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set_walkable(IVec3::new(5, 3, 0), false);
        let footprint = bow_footprint();

        assert_eq!(
            footprint.any_fitting_heading(&grid, IVec3::new(5, 5, 0)),
            Some(Heading::SouthSouthWest)
        );
        assert!(!footprint.fits(&grid, IVec3::new(5, 5, 0), Heading::South));
    }

    #[test]
    fn test_project() {
        let footprint = bow_footprint();
        let cells = footprint.project(IVec3::new(4, 4, 0), Heading::South);
        assert_eq!(
            cells,
            vec![IVec3::new(4, 4, 0), IVec3::new(4, 3, 0), IVec3::new(4, 2, 0)]
        );
    }

    /// 15x15 water with a wall at x = 7 open only at (7, 7).
    fn gap_grid() -> Grid {
        let mut grid = Grid::new(15, 15, 1);
        grid.fill_solid(IVec3::new(7, 0, 0), IVec3::new(7, 14, 0));
        grid.set_walkable(IVec3::new(7, 7, 0), true);
        grid
    }

    #[test]
    fn test_square_hull_never_fits_gap() {
        let grid = gap_grid();
        let hull = Footprint::rectangle(3, 3, Heading::North);

        assert_eq!(hull.any_fitting_heading(&grid, IVec3::new(7, 7, 0)), None);
        assert_eq!(hull.nearest_fitting_cell(&grid, IVec3::new(7, 7, 0), 1), None);
    }

    #[test]
    fn test_nearest_fitting_cell_on_last_ring() {
        let grid = gap_grid();
        let hull = Footprint::rectangle(3, 3, Heading::North);

        // Ring 2 is the first with room, scanned from its lowest x then lowest y.
        assert_eq!(
            hull.nearest_fitting_cell(&grid, IVec3::new(7, 7, 0), 2),
            Some(IVec3::new(5, 5, 0))
        );
    }

    #[test]
    fn test_nearest_fitting_cell_prefers_goal() {
        let grid = gap_grid();
        let hull = Footprint::rectangle(3, 3, Heading::North);
        let goal = IVec3::new(3, 3, 0);

        assert_eq!(hull.nearest_fitting_cell(&grid, goal, 0), Some(goal));
        assert_eq!(hull.nearest_fitting_cell(&grid, goal, 5), Some(goal));
    }

    #[test]
    fn test_nearest_fitting_cell_with_heading() {
        let mut grid = Grid::new(10, 10, 1);
        grid.set_walkable(IVec3::new(5, 3, 0), false);
        let footprint = bow_footprint();

        assert_eq!(
            footprint.nearest_fitting_cell_with_heading(&grid, IVec3::new(5, 5, 0), Heading::North, 2),
            Some(IVec3::new(5, 5, 0))
        );
        // Facing south the bow hits (5, 3) so a neighbour is picked.
        assert_eq!(
            footprint.nearest_fitting_cell_with_heading(&grid, IVec3::new(5, 5, 0), Heading::South, 2),
            Some(IVec3::new(4, 4, 0))
        );
    }

    #[test]
    fn test_rectangle_and_from_cells() {
        let rect = Footprint::rectangle(3, 3, Heading::North);
        assert_eq!(rect.offsets.len(), 9);
        assert!(rect.offsets.contains(&IVec2::new(-1, -1)));
        assert!(rect.offsets.contains(&IVec2::new(1, 1)));

        let pivot = IVec3::new(10, 10, 0);
        let footprint = Footprint::from_cells(
            [IVec3::new(10, 10, 0), IVec3::new(11, 10, 0)],
            pivot,
            Heading::East,
        );
        assert_eq!(footprint.offsets, vec![IVec2::ZERO, IVec2::new(1, 0)]);
    }
}
