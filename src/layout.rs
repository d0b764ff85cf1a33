use super::bits::{ascii_to_mask, mask_to_ascii, Mask, MASK_NONE};
use super::{Grid, DIM1, DIM2, DIM4};
use lazy_static::lazy_static;

/// Storage slot of the first row tracker. Cell slots are `0..DIM4`.
pub const ROW_BASE: usize = DIM4;
pub const BOX_BASE: usize = ROW_BASE + DIM2;
pub const COL_BASE: usize = BOX_BASE + DIM2;
pub const SLOT_COUNT: usize = COL_BASE + DIM2;

/// Storage slots touched by one cell: the cell itself and its three trackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSlots {
    pub cell: usize,
    pub row: usize,
    pub boxx: usize,
    pub col: usize,
}

impl CellSlots {
    fn new(cell: usize) -> Self {
        let (y, x) = (cell / DIM2, cell % DIM2);
        let b = y / DIM1 * DIM1 + x / DIM1;
        CellSlots {
            cell,
            row: ROW_BASE + y,
            boxx: BOX_BASE + b,
            col: COL_BASE + x,
        }
    }
}

lazy_static! {
    /// Row, box and column tracker slots of every cell, in cell order.
    pub static ref CELL_SLOTS: [CellSlots; DIM4] = {
        let mut table = [CellSlots::new(0); DIM4];
        for (i, slots) in table.iter_mut().enumerate() {
            *slots = CellSlots::new(i);
        }
        table
    };
}

/// Position of `(slot, lane)` in the flattened storage of an `L`-lane batch.
#[inline(always)]
pub const fn offset<const L: usize>(slot: usize, lane: usize) -> usize {
    slot * L + lane
}

/// Candidate masks and trackers of `L` puzzles, slot-major and lane-minor:
/// `data[slot]` holds the values of every lane at one structural position.
///
/// Cell slots hold the committed value of the cell, or `0` while it is
/// unresolved. Tracker slots hold the digits not yet placed in the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchState<const L: usize> {
    pub(crate) data: [[Mask; L]; SLOT_COUNT],
    pub(crate) missing: [u16; L],
    pub(crate) rejected: [bool; L],
}

impl<const L: usize> Default for BatchState<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const L: usize> BatchState<L> {
    pub fn new() -> Self {
        BatchState {
            data: [[MASK_NONE; L]; SLOT_COUNT],
            missing: [DIM4 as u16; L],
            rejected: [false; L],
        }
    }

    /// Lane-strided transform: cell slot `i` of lane `l` receives the mask of
    /// character `i` of puzzle `l` (`1 << (d - 1)`, or all nine bits for a
    /// blank). Trackers are left alone until `setup`.
    pub fn load(&mut self, puzzles: &[Grid; L]) {
        for (lane, puzzle) in puzzles.iter().enumerate() {
            for (slot, &c) in puzzle.as_bytes().iter().enumerate() {
                self.data[slot][lane] = ascii_to_mask(c);
            }
        }
    }

    pub fn from_puzzles(puzzles: &[Grid; L]) -> Self {
        let mut state = Self::new();
        state.load(puzzles);
        state.setup();
        state
    }

    #[inline(always)]
    pub fn get(&self, slot: usize, lane: usize) -> Mask {
        self.data.as_flattened()[offset::<L>(slot, lane)]
    }

    #[inline(always)]
    pub fn set(&mut self, slot: usize, lane: usize, value: Mask) {
        self.data.as_flattened_mut()[offset::<L>(slot, lane)] = value;
    }

    pub fn missing(&self, lane: usize) -> u16 {
        self.missing[lane]
    }

    pub fn is_rejected(&self, lane: usize) -> bool {
        self.rejected[lane]
    }

    pub fn is_solved(&self, lane: usize) -> bool {
        !self.rejected[lane] && self.missing[lane] == 0
    }

    /// Candidates of an unresolved cell: the intersection of its trackers.
    #[inline(always)]
    pub fn candidates(&self, slots: &CellSlots, lane: usize) -> Mask {
        self.get(slots.row, lane) & self.get(slots.boxx, lane) & self.get(slots.col, lane)
    }

    /// Places `bit` into an unresolved cell and removes it from the cell's
    /// trackers in the same step.
    #[inline(always)]
    pub fn commit(&mut self, slots: &CellSlots, lane: usize, bit: Mask) {
        debug_assert_eq!(self.get(slots.cell, lane), MASK_NONE);
        self.set(slots.cell, lane, bit);
        for &group in &[slots.row, slots.boxx, slots.col] {
            let v = self.get(group, lane);
            self.set(group, lane, v & !bit);
        }
        self.missing[lane] -= 1;
    }

    /// Current cell values of one lane as ASCII, `'0'` for unresolved cells.
    pub fn lane_grid(&self, lane: usize) -> Grid {
        let mut array = [b'0'; DIM4];
        for (slot, c) in array.iter_mut().enumerate() {
            *c = mask_to_ascii(self.get(slot, lane));
        }
        Grid::from_ascii(array)
    }

    /// The solved grid of `lane`, if the lane is complete.
    pub fn extract(&self, lane: usize) -> Option<Grid> {
        if self.is_solved(lane) {
            Some(self.lane_grid(lane))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bits::MASK_ALL;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn cell_slot_table() {
        let s = CELL_SLOTS[0];
        assert_eq!((s.row, s.boxx, s.col), (ROW_BASE, BOX_BASE, COL_BASE));
        let s = CELL_SLOTS[40];
        assert_eq!((s.row, s.boxx, s.col), (ROW_BASE + 4, BOX_BASE + 4, COL_BASE + 4));
        let s = CELL_SLOTS[80];
        assert_eq!((s.row, s.boxx, s.col), (ROW_BASE + 8, BOX_BASE + 8, COL_BASE + 8));
        let s = CELL_SLOTS[33];
        assert_eq!((s.row, s.boxx, s.col), (ROW_BASE + 3, BOX_BASE + 5, COL_BASE + 6));
        assert_eq!(SLOT_COUNT, 108);
    }

    #[test]
    fn addressing_is_slot_major() {
        assert_eq!(offset::<16>(0, 3), 3);
        assert_eq!(offset::<16>(2, 0), 32);
        assert_eq!(offset::<1>(80, 0), 80);
        let mut state = BatchState::<4>::new();
        state.set(5, 2, 0b10);
        assert_eq!(state.data[5][2], 0b10);
        assert_eq!(state.data.as_flattened()[5 * 4 + 2], 0b10);
    }

    #[test]
    fn transform_is_bit_exact() {
        let a = crate::parse(PUZZLE).unwrap();
        let b = crate::parse(&"0".repeat(81)).unwrap();
        let mut state = BatchState::<2>::new();
        state.load(&[a.clone(), b]);
        for (slot, c) in PUZZLE.bytes().enumerate() {
            let expected = match c {
                b'0' => 0b1_1111_1111,
                d => 1 << (d - b'1'),
            };
            assert_eq!(state.get(slot, 0), expected);
            assert_eq!(state.get(slot, 1), MASK_ALL);
        }
        // Loading again overwrites the previous batch.
        state.load(&[a.clone(), a]);
        assert_eq!(state.get(0, 1), 1 << 4);
    }
}
