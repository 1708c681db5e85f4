//! The [`FieldMap`] itself: fixed-size cells, per-cell dirty bit, and the
//! initial/delta serializers that every object in [`ironspire_entity`]
//! replicates through.

use bytes::{Buf, BufMut};

use crate::scalar::FieldScalar;

/// A fixed-size, ordered sequence of 32-bit cells with a dirty bit per cell.
///
/// The cell count is fixed at construction (per the owning game object
/// variant) and never changes afterwards; field ids are stable and
/// append-only across revisions of the variant that owns the map.
#[derive(Debug, Clone)]
pub struct FieldMap {
    cells: Vec<u32>,
    dirty: Vec<u32>,
}

impl FieldMap {
    /// Creates a field map with `cell_count` cells, all zeroed and clean.
    pub fn new(cell_count: usize) -> Self {
        Self {
            cells: vec![0; cell_count],
            dirty: vec![0; Self::word_count(cell_count)],
        }
    }

    fn word_count(cell_count: usize) -> usize {
        cell_count.div_ceil(32)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[track_caller]
    fn check_range(&self, id: u16, span: usize) {
        let start = id as usize;
        assert!(
            start + span <= self.cells.len(),
            "field id {start} (span {span}) out of range for a {}-cell field map",
            self.cells.len()
        );
    }

    fn mark_dirty(&mut self, cell_idx: usize) {
        self.dirty[cell_idx / 32] |= 1 << (cell_idx % 32);
    }

    fn is_dirty(&self, cell_idx: usize) -> bool {
        self.dirty[cell_idx / 32] & (1 << (cell_idx % 32)) != 0
    }

    /// Writes `value` starting at `id`, dirtying every cell touched.
    /// Out-of-range ids or a value whose span overruns the map are a
    /// programming error and panic immediately; there is no runtime
    /// recovery path (§4.1).
    pub fn set<T: FieldScalar>(&mut self, id: u16, value: T) {
        self.set_ex(id, value, true);
    }

    /// As [`Self::set`], but lets the caller suppress the dirty bit (used
    /// when restoring state from a persisted snapshot).
    pub fn set_ex<T: FieldScalar>(&mut self, id: u16, value: T, mark_dirty: bool) {
        self.check_range(id, T::CELL_COUNT);
        let mut buf = [0u32; 2];
        value.write_cells(&mut buf[..T::CELL_COUNT]);
        let start = id as usize;
        for i in 0..T::CELL_COUNT {
            self.cells[start + i] = buf[i];
            if mark_dirty {
                self.mark_dirty(start + i);
            }
        }
    }

    pub fn get<T: FieldScalar>(&self, id: u16) -> T {
        self.check_range(id, T::CELL_COUNT);
        let start = id as usize;
        T::read_cells(&self.cells[start..start + T::CELL_COUNT])
    }

    /// Sets the bits in `mask` on the single cell at `id`. Always dirties
    /// the cell, even if `mask` was already fully set.
    pub fn add_flag(&mut self, id: u16, mask: u32) {
        self.check_range(id, 1);
        let idx = id as usize;
        self.cells[idx] |= mask;
        self.mark_dirty(idx);
    }

    /// Clears the bits in `mask` on the single cell at `id`. Always dirties
    /// the cell.
    pub fn remove_flag(&mut self, id: u16, mask: u32) {
        self.check_range(id, 1);
        let idx = id as usize;
        self.cells[idx] &= !mask;
        self.mark_dirty(idx);
    }

    /// Clears every dirty bit without touching cell values. Called once per
    /// tick after replication has flushed delta blocks (§4.5 step vii).
    pub fn clear_changes(&mut self) {
        self.dirty.fill(0);
    }

    pub fn has_changes(&self) -> bool {
        self.dirty.iter().any(|w| *w != 0)
    }

    /// Every non-zero cell as `(id, raw value)`, for the sparse persisted
    /// snapshot form (§6 "Persisted Character/Item snapshot") rather than
    /// the bitmap-prefixed wire form [`Self::serialize_initial`] produces.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u16, u32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell != 0)
            .map(|(i, &cell)| (i as u16, cell))
    }

    /// Serializes every non-zero cell: the bitmap of non-zero cells followed
    /// by their values, for a client just entering view of the object.
    pub fn serialize_initial(&self, buf: &mut impl BufMut) {
        let mut mask = vec![0u32; self.dirty.len()];
        for (i, &cell) in self.cells.iter().enumerate() {
            if cell != 0 {
                mask[i / 32] |= 1 << (i % 32);
            }
        }
        Self::write_block(buf, &mask, &self.cells);
    }

    /// Serializes only the cells dirtied since the last [`Self::clear_changes`].
    pub fn serialize_delta(&self, buf: &mut impl BufMut) {
        Self::write_block(buf, &self.dirty, &self.cells);
    }

    fn write_block(buf: &mut impl BufMut, mask: &[u32], cells: &[u32]) {
        buf.put_u8(mask.len() as u8);
        for word in mask {
            buf.put_u32_le(*word);
        }
        for (i, &cell) in cells.iter().enumerate() {
            if mask[i / 32] & (1 << (i % 32)) != 0 {
                buf.put_u32_le(cell);
            }
        }
    }

    /// Applies a block produced by [`Self::serialize_initial`] or
    /// [`Self::serialize_delta`] onto this map, as an observer reconstructing
    /// remote state would. Does not dirty any cells; observers never
    /// re-replicate what they received.
    pub fn apply_block(&mut self, buf: &mut impl Buf) {
        let word_count = buf.get_u8() as usize;
        let mut mask = vec![0u32; word_count];
        for word in mask.iter_mut() {
            *word = buf.get_u32_le();
        }
        for i in 0..self.cells.len().min(word_count * 32) {
            if mask[i / 32] & (1 << (i % 32)) != 0 {
                self.cells[i] = buf.get_u32_le();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    #[should_panic]
    fn out_of_range_id_is_fatal() {
        let mut map = FieldMap::new(4);
        map.set::<u32>(10, 1);
    }

    #[test]
    #[should_panic]
    fn composite_value_spanning_past_end_is_fatal() {
        let mut map = FieldMap::new(4);
        map.set::<u64>(3, 1); // needs cells 3 and 4, only 4 cells exist (0..4)
    }

    #[test]
    fn set_dirties_exactly_touched_cells() {
        let mut map = FieldMap::new(8);
        map.set::<u32>(2, 42);
        assert!(map.is_dirty(2));
        assert!(!map.is_dirty(1));
        assert!(!map.is_dirty(3));
    }

    #[test]
    fn repeated_set_with_equal_value_still_dirties() {
        let mut map = FieldMap::new(4);
        map.set::<u32>(0, 7);
        map.clear_changes();
        map.set::<u32>(0, 7);
        assert!(map.has_changes());
    }

    #[test]
    fn u64_dirties_both_contiguous_cells() {
        let mut map = FieldMap::new(4);
        map.set::<u64>(0, 0xDEAD_BEEF_0000_0001);
        assert!(map.is_dirty(0));
        assert!(map.is_dirty(1));
        assert_eq!(map.get::<u64>(0), 0xDEAD_BEEF_0000_0001);
    }

    #[test]
    fn flags_round_trip_and_dirty() {
        let mut map = FieldMap::new(4);
        map.add_flag(1, 0b0101);
        assert_eq!(map.get::<u32>(1), 0b0101);
        map.clear_changes();
        map.remove_flag(1, 0b0001);
        assert_eq!(map.get::<u32>(1), 0b0100);
        assert!(map.is_dirty(1));
    }

    #[test]
    fn initial_then_delta_blocks_reproduce_state_on_observer() {
        let mut source = FieldMap::new(6);
        source.set::<u32>(0, 10);
        source.set::<u64>(2, 99);
        source.set::<f32>(4, 1.5);

        let mut initial_buf = BytesMut::new();
        source.serialize_initial(&mut initial_buf);

        let mut observer = FieldMap::new(6);
        observer.apply_block(&mut initial_buf);

        assert_eq!(observer.get::<u32>(0), 10);
        assert_eq!(observer.get::<u64>(2), 99);
        assert_eq!(observer.get::<f32>(4), 1.5);

        // Now a delta changes one field; the observer must pick it up without
        // disturbing the others.
        source.clear_changes();
        source.set::<u32>(0, 20);

        let mut delta_buf = BytesMut::new();
        source.serialize_delta(&mut delta_buf);
        observer.apply_block(&mut delta_buf);

        assert_eq!(observer.get::<u32>(0), 20);
        assert_eq!(observer.get::<u64>(2), 99);
    }

    #[test]
    fn zero_cells_are_excluded_from_initial_block() {
        let mut map = FieldMap::new(4);
        map.set::<u32>(1, 0); // explicit zero write
        let mut buf = BytesMut::new();
        map.serialize_initial(&mut buf);

        let mut observer = FieldMap::new(4);
        observer.apply_block(&mut buf);
        assert_eq!(observer.get::<u32>(0), 0);
        assert_eq!(observer.get::<u32>(1), 0);
    }

    #[test]
    fn iter_nonzero_yields_only_set_cells() {
        let mut map = FieldMap::new(8);
        map.set::<u32>(0, 10);
        map.set::<u32>(5, 99);
        let cells: Vec<_> = map.iter_nonzero().collect();
        assert_eq!(cells, vec![(0, 10), (5, 99)]);
    }

    #[test]
    fn set_ex_without_dirty_restores_state_silently() {
        let mut map = FieldMap::new(4);
        map.set_ex::<u32>(0, 77, false);
        assert!(!map.has_changes());
        assert_eq!(map.get::<u32>(0), 77);
    }
}
