use super::bits::{is_single, Mask, MASK_ALL, MASK_NONE};
use super::layout::{BatchState, CELL_SLOTS, ROW_BASE, SLOT_COUNT};
use super::DIM4;

impl<const L: usize> BatchState<L> {
    /// Builds the row, box and column trackers from the loaded clues.
    ///
    /// A cell whose mask has a single bit is a clue; any other mask is reset
    /// to `0` (unresolved). Clue bits are removed from their trackers and
    /// counted off `missing`. A clue whose digit was already taken in one of
    /// its groups marks the lane as rejected.
    pub fn setup(&mut self) {
        for slot in ROW_BASE..SLOT_COUNT {
            self.data[slot] = [MASK_ALL; L];
        }
        self.missing = [DIM4 as u16; L];
        self.rejected = [false; L];

        for slots in CELL_SLOTS.iter() {
            let mut clues: [Mask; L] = self.data[slots.cell];
            for (lane, clue) in clues.iter_mut().enumerate() {
                if !is_single(*clue) {
                    *clue = MASK_NONE;
                    continue;
                }
                let available = self.data[slots.row][lane]
                    & self.data[slots.boxx][lane]
                    & self.data[slots.col][lane];
                if available & *clue == 0 {
                    self.rejected[lane] = true;
                }
                self.missing[lane] -= 1;
            }
            self.data[slots.cell] = clues;
            for &group in &[slots.row, slots.boxx, slots.col] {
                for (tracker, &clue) in self.data[group].iter_mut().zip(clues.iter()) {
                    *tracker &= !clue;
                }
            }
        }
    }

    /// Checks that every tracker is exactly the set of digits not committed
    /// in its group, and that `missing` counts the unresolved cells.
    pub fn trackers_consistent(&self, lane: usize) -> bool {
        let mut expected = [MASK_ALL; SLOT_COUNT - ROW_BASE];
        let mut missing = 0;
        for slots in CELL_SLOTS.iter() {
            let value = self.get(slots.cell, lane);
            if value == MASK_NONE {
                missing += 1;
            }
            for &group in &[slots.row, slots.boxx, slots.col] {
                expected[group - ROW_BASE] &= !value;
            }
        }
        missing == self.missing[lane]
            && expected
                .iter()
                .enumerate()
                .all(|(i, &m)| self.get(ROW_BASE + i, lane) == m)
    }
}
