//! [`Grid`]: the tile lattice owned by a world instance (§3, §4.3).

use rustc_hash::FxHashMap;

use ironspire_core::Guid;

use crate::tile::Tile;
use crate::tile_pos::TilePos;

/// Emitted by [`Grid::move_object`] once the atomic remove/insert has
/// happened. The caller (the instance tick, C5) is responsible for handing
/// this to the replication layer (C8) synchronously; the grid itself holds
/// no observer registry, keeping it free of borrow-juggling callback
/// storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChangeEvent {
    pub guid: Guid,
    pub old_tile: Option<TilePos>,
    pub new_tile: TilePos,
}

/// A square lattice of [`Tile`]s sized lazily to whatever the world's
/// objects and watchers actually touch (§4.3).
#[derive(Debug)]
pub struct Grid {
    tiles: FxHashMap<TilePos, Tile>,
    sight_radius: i32,
}

impl Grid {
    pub fn new(sight_radius: i32) -> Self {
        Self {
            tiles: FxHashMap::default(),
            sight_radius,
        }
    }

    pub fn sight_radius(&self) -> i32 {
        self.sight_radius
    }

    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    /// Returns the tile at `pos`, creating it empty if it does not exist.
    pub fn require_tile(&mut self, pos: TilePos) -> &mut Tile {
        self.tiles.entry(pos).or_default()
    }

    /// Visits every tile in the `(2R+1)²` window centered on `center`, where
    /// `R` is the grid's sight radius. Tiles that don't exist yet are
    /// skipped rather than created.
    pub fn for_each_tile_in_sight(&self, center: TilePos, mut f: impl FnMut(TilePos, &Tile)) {
        for (pos, tile) in self.sight_window(center) {
            if let Some(tile) = self.tiles.get(&tile) {
                f(pos, tile);
            }
        }
    }

    /// Visits every tile in sight of `a` but not in sight of `b`: the set
    /// difference `sight(a) \ sight(b)`. Used to compute despawn batches
    /// when an object moves from `a` to `b` (or spawn batches by swapping
    /// the arguments) (§4.3, §8 scenario 6).
    pub fn for_each_tile_in_sight_without(
        &self,
        a: TilePos,
        b: TilePos,
        mut f: impl FnMut(TilePos, &Tile),
    ) {
        for (pos, _) in self.sight_window(a) {
            if pos.distance_in_tiles(b) > self.sight_radius {
                if let Some(tile) = self.tiles.get(&pos) {
                    f(pos, tile);
                }
            }
        }
    }

    fn sight_window(&self, center: TilePos) -> impl Iterator<Item = (TilePos, TilePos)> + '_ {
        let r = self.sight_radius;
        (-r..=r).flat_map(move |dx| {
            (-r..=r).map(move |dz| {
                let pos = TilePos::new(center.x + dx, center.z + dz);
                (pos, pos)
            })
        })
    }

    pub fn insert_watcher(&mut self, pos: TilePos, guid: Guid) {
        self.require_tile(pos).insert_watcher(guid);
    }

    pub fn remove_watcher(&mut self, pos: TilePos, guid: Guid) {
        if let Some(tile) = self.tiles.get_mut(&pos) {
            tile.remove_watcher(guid);
            self.prune_if_empty(pos);
        }
    }

    /// Inserts `guid` into `pos` with no prior tile. Used for the object's
    /// first spawn into the grid.
    pub fn insert_object(&mut self, pos: TilePos, guid: Guid) -> TileChangeEvent {
        self.require_tile(pos).insert_object(guid);
        TileChangeEvent {
            guid,
            old_tile: None,
            new_tile: pos,
        }
    }

    pub fn remove_object(&mut self, pos: TilePos, guid: Guid) {
        if let Some(tile) = self.tiles.get_mut(&pos) {
            tile.remove_object(guid);
            self.prune_if_empty(pos);
        }
    }

    /// Atomically (i) removes `guid` from `old`, (ii) inserts it into `new`,
    /// returning the event the caller broadcasts to watchers (iii) (§4.3).
    /// A no-op move (`old == new`) still returns an event; callers should
    /// check for equality themselves if they want to skip redundant work.
    pub fn move_object(&mut self, old: TilePos, new: TilePos, guid: Guid) -> TileChangeEvent {
        if old != new {
            if let Some(tile) = self.tiles.get_mut(&old) {
                tile.remove_object(guid);
                self.prune_if_empty(old);
            }
            self.require_tile(new).insert_object(guid);
        }
        TileChangeEvent {
            guid,
            old_tile: Some(old),
            new_tile: new,
        }
    }

    fn prune_if_empty(&mut self, pos: TilePos) {
        if self.tiles.get(&pos).is_some_and(Tile::is_empty) {
            self.tiles.remove(&pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironspire_core::GuidKind;

    #[test]
    fn object_is_in_at_most_one_tile() {
        let mut grid = Grid::new(2);
        let guid = Guid::new(GuidKind::Unit, 1, 1);
        grid.insert_object(TilePos::new(0, 0), guid);
        grid.move_object(TilePos::new(0, 0), TilePos::new(1, 0), guid);

        assert!(grid.tile(TilePos::new(0, 0)).is_none());
        assert_eq!(grid.tile(TilePos::new(1, 0)).unwrap().objects(), &[guid]);
    }

    #[test]
    fn sight_window_covers_2r_plus_1_square() {
        let mut grid = Grid::new(1);
        for x in -1..=1 {
            for z in -1..=1 {
                grid.insert_object(TilePos::new(x, z), Guid::new(GuidKind::Unit, 1, (x + z + 10) as u32));
            }
        }
        let mut seen = 0;
        grid.for_each_tile_in_sight(TilePos::new(0, 0), |_, _| seen += 1);
        assert_eq!(seen, 9);
    }

    #[test]
    fn tile_change_without_computes_symmetric_difference() {
        let mut grid = Grid::new(2);
        // Populate every tile in a 7x7 block so both windows are fully present.
        for x in -4..=4 {
            for z in -4..=4 {
                grid.insert_object(TilePos::new(x, z), Guid::new(GuidKind::Unit, 1, ((x + 10) * 100 + z + 10) as u32));
            }
        }

        let mut left_only = Vec::new();
        grid.for_each_tile_in_sight_without(TilePos::new(0, 0), TilePos::new(1, 0), |pos, _| {
            left_only.push(pos);
        });
        // Moving one tile east: the column at x=-2 drops out of sight, nothing else does.
        assert!(left_only.iter().all(|p| p.x == -2));
        assert_eq!(left_only.len(), 5);
    }

    #[test]
    fn empty_tiles_are_pruned() {
        let mut grid = Grid::new(2);
        let guid = Guid::new(GuidKind::Unit, 1, 1);
        grid.insert_object(TilePos::new(5, 5), guid);
        grid.remove_object(TilePos::new(5, 5), guid);
        assert!(grid.tile(TilePos::new(5, 5)).is_none());
    }
}
