//! `OnTileChange`: turning a [`TileChangeEvent`] into spawn/despawn batches
//! by computing the symmetric difference of the old and new neighborhoods
//! (§4.8).

use ironspire_core::Guid;
use ironspire_spatial::{Grid, TilePos};

/// Objects that become visible to someone standing at `new` but weren't
/// visible from `old` (§4.8 "symmetric difference", §8 scenario 6).
pub fn objects_entering_view(grid: &Grid, old: TilePos, new: TilePos) -> Vec<Guid> {
    let mut entering = Vec::new();
    grid.for_each_tile_in_sight_without(new, old, |_, tile| {
        entering.extend_from_slice(tile.objects());
    });
    entering
}

/// Objects that fall out of visibility after the move.
pub fn objects_leaving_view(grid: &Grid, old: TilePos, new: TilePos) -> Vec<Guid> {
    let mut leaving = Vec::new();
    grid.for_each_tile_in_sight_without(old, new, |_, tile| {
        leaving.extend_from_slice(tile.objects());
    });
    leaving
}

/// Watchers who gain sight of the object that moved from `old` to `new` —
/// the mover must be spawned into their view.
pub fn watchers_gaining_sight(grid: &Grid, old: TilePos, new: TilePos) -> Vec<Guid> {
    let mut gaining = Vec::new();
    grid.for_each_tile_in_sight_without(new, old, |_, tile| {
        gaining.extend_from_slice(tile.watchers());
    });
    gaining
}

/// Watchers who lose sight of the object that moved from `old` to `new` —
/// the mover must be despawned from their view.
pub fn watchers_losing_sight(grid: &Grid, old: TilePos, new: TilePos) -> Vec<Guid> {
    let mut losing = Vec::new();
    grid.for_each_tile_in_sight_without(old, new, |_, tile| {
        losing.extend_from_slice(tile.watchers());
    });
    losing
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironspire_core::GuidKind;

    fn populated_grid(radius: i32) -> Grid {
        let mut grid = Grid::new(radius);
        for x in -5..=5 {
            for z in -5..=5 {
                let guid = Guid::new(GuidKind::Unit, 1, ((x + 10) * 100 + (z + 10)) as u32);
                grid.insert_object(TilePos::new(x, z), guid);
                grid.insert_watcher(TilePos::new(x, z), guid);
            }
        }
        grid
    }

    #[test]
    fn moving_one_tile_east_only_touches_the_trailing_and_leading_columns() {
        let grid = populated_grid(2);
        let old = TilePos::new(0, 0);
        let new = TilePos::new(1, 0);

        let entering = objects_entering_view(&grid, old, new);
        let leaving = objects_leaving_view(&grid, old, new);

        assert!(!entering.is_empty());
        assert!(!leaving.is_empty());
        // Entering and leaving sets must be disjoint: no tile is both
        // newly visible and newly invisible at once.
        assert!(entering.iter().all(|g| !leaving.contains(g)));
    }

    #[test]
    fn standing_still_produces_no_transitions() {
        let grid = populated_grid(2);
        let pos = TilePos::new(0, 0);
        assert!(objects_entering_view(&grid, pos, pos).is_empty());
        assert!(objects_leaving_view(&grid, pos, pos).is_empty());
    }

    #[test]
    fn watcher_transitions_mirror_object_transitions() {
        let grid = populated_grid(2);
        let old = TilePos::new(0, 0);
        let new = TilePos::new(2, 0);

        let gaining = watchers_gaining_sight(&grid, old, new);
        let losing = watchers_losing_sight(&grid, old, new);
        assert!(!gaining.is_empty());
        assert!(!losing.is_empty());
    }
}
