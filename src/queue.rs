use super::layout::CellSlots;
use super::DIM4;

/// Default bound on the number of entries ever pushed per batch.
pub const DEFAULT_CAPACITY: usize = DIM4 * 2;

/// Append-only worklist of stalled cells with a read cursor.
///
/// Entries are never removed; popping advances the cursor. Once `capacity`
/// entries have been pushed the queue is saturated and refuses more work.
#[derive(Debug, Clone)]
pub struct StallQueue {
    entries: Vec<CellSlots>,
    head: usize,
    capacity: usize,
}

impl StallQueue {
    pub fn new(capacity: usize) -> Self {
        StallQueue {
            entries: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = 0;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries popped since the last `clear`.
    pub fn popped(&self) -> usize {
        self.head
    }

    pub fn is_saturated(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn is_drained(&self) -> bool {
        self.head >= self.entries.len()
    }

    /// Returns `false` when the queue is saturated.
    pub fn push(&mut self, cell: CellSlots) -> bool {
        if self.is_saturated() {
            return false;
        }
        self.entries.push(cell);
        true
    }

    /// Next entry, or `None` once drained or saturated.
    pub fn pop(&mut self) -> Option<CellSlots> {
        if self.is_drained() || self.is_saturated() {
            return None;
        }
        let cell = self.entries[self.head];
        self.head += 1;
        Some(cell)
    }
}

impl Default for StallQueue {
    fn default() -> Self {
        StallQueue::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::CELL_SLOTS;

    #[test]
    fn drains_in_order() {
        let mut q = StallQueue::new(4);
        assert!(q.push(CELL_SLOTS[3]));
        assert!(q.push(CELL_SLOTS[7]));
        assert_eq!(q.pop(), Some(CELL_SLOTS[3]));
        assert!(q.push(CELL_SLOTS[3]));
        assert_eq!(q.pop(), Some(CELL_SLOTS[7]));
        assert_eq!(q.pop(), Some(CELL_SLOTS[3]));
        assert_eq!(q.pop(), None);
        assert!(q.is_drained());
        assert_eq!(q.popped(), 3);
    }

    #[test]
    fn saturation_stops_work() {
        let mut q = StallQueue::new(2);
        assert!(q.push(CELL_SLOTS[0]));
        assert!(q.push(CELL_SLOTS[1]));
        assert!(!q.push(CELL_SLOTS[2]));
        assert!(q.is_saturated());
        assert_eq!(q.pop(), None);

        q.clear();
        assert!(!q.is_saturated());
        assert!(q.is_drained());
        assert!(q.push(CELL_SLOTS[2]));
        assert_eq!(q.pop(), Some(CELL_SLOTS[2]));
    }
}
