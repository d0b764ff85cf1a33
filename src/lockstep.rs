use super::layout::{BatchState, CellSlots, CELL_SLOTS};
use super::lanes::{Lanes, LANES};
use super::queue::StallQueue;

/// Default number of full passes over the cells before switching to the
/// stall queue.
pub const DEFAULT_ROUNDS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockstepReport {
    /// Cells resolved across all lanes.
    pub commits: u32,
    /// Stall queue entries re-evaluated in reactive mode.
    pub queue_popped: usize,
    pub saturated: bool,
}

pub type VectorState = BatchState<LANES>;

impl BatchState<LANES> {
    /// One cell step for all lanes:
    /// `bits = (row & box & col) | value`, committed where it has exactly one
    /// bit. Returns the new cell values and the number of newly resolved lanes.
    #[inline(always)]
    fn step_cell(&mut self, slots: &CellSlots) -> (Lanes, u32) {
        let zero = Lanes::zero();
        let one = Lanes::splat(1);

        let value = Lanes::from(self.data[slots.cell]);
        let row = Lanes::from(self.data[slots.row]);
        let boxx = Lanes::from(self.data[slots.boxx]);
        let col = Lanes::from(self.data[slots.col]);

        let bits = row & boxx & col | value;
        let single = (bits & bits.wrapping_sub(one))
            .lanes_eq(zero)
            .and_not(bits.lanes_eq(zero));
        let bits = bits & single;
        let fresh = value.lanes_eq(zero) & single;

        let value = value | bits;
        self.data[slots.cell] = value.into();
        self.data[slots.row] = row.and_not(bits).into();
        self.data[slots.boxx] = boxx.and_not(bits).into();
        self.data[slots.col] = col.and_not(bits).into();
        // `fresh` is all ones (-1) in newly resolved lanes.
        self.missing = Lanes::from(self.missing).wrapping_add(fresh).into();

        let commits = LANES as u32 - fresh.zero_lanes().count_ones();
        (value, commits)
    }

    /// Runs `rounds` full passes over every cell, then drains the stall queue.
    ///
    /// During the last pass every cell still empty in some lane is queued.
    /// Popped cells are stepped again and requeued while still empty, until
    /// the queue drains or saturates.
    pub fn propagate_lockstep(&mut self, rounds: usize, queue: &mut StallQueue) -> LockstepReport {
        queue.clear();
        let mut commits = 0;

        for round in 0..rounds {
            let last = round + 1 == rounds;
            for slots in CELL_SLOTS.iter() {
                let (value, n) = self.step_cell(slots);
                commits += n;
                if last && value.any_zero() {
                    queue.push(*slots);
                }
            }
        }

        while let Some(slots) = queue.pop() {
            let (value, n) = self.step_cell(&slots);
            commits += n;
            if value.any_zero() {
                queue.push(slots);
            }
        }

        LockstepReport {
            commits,
            queue_popped: queue.popped(),
            saturated: queue.is_saturated(),
        }
    }

    /// Bit `i` set iff lane `i` still has unset cells and valid clues.
    pub fn pending_lanes(&self) -> u16 {
        let done = Lanes::from(self.missing).zero_lanes();
        let rejected = self
            .rejected
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r)
            .fold(0u16, |acc, (i, _)| acc | 1 << i);
        !(done | rejected)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{sample, WIKI};
    use crate::{parse, Grid};

    fn batch_of(grids: &[Grid]) -> [Grid; LANES] {
        let mut batch: [Grid; LANES] = Default::default();
        for (slot, g) in batch.iter_mut().zip(grids.iter().cycle()) {
            *slot = g.clone();
        }
        batch
    }

    #[test]
    fn thirty_clue_puzzle_needs_no_fallback() {
        let (puzzle, solution) = (parse(WIKI.0).unwrap(), parse(WIKI.1).unwrap());
        let mut state = VectorState::from_puzzles(&batch_of(&[puzzle]));
        let mut queue = StallQueue::default();
        let report = state.propagate_lockstep(DEFAULT_ROUNDS, &mut queue);

        assert!(!report.saturated);
        assert_eq!(report.commits, 51 * LANES as u32);
        assert_eq!(state.pending_lanes(), 0);
        for lane in 0..LANES {
            assert_eq!(state.extract(lane), Some(solution.clone()));
            assert!(state.trackers_consistent(lane));
        }
    }

    #[test]
    fn each_round_makes_progress() {
        let puzzle = parse(WIKI.0).unwrap();
        let mut previous = 51;
        for &(rounds, expected) in &[(1, 45), (2, 33), (3, 15)] {
            let mut state = VectorState::from_puzzles(&batch_of(&[puzzle.clone()]));
            state.propagate_lockstep(rounds, &mut StallQueue::new(0));
            assert_eq!(state.missing(0), expected);
            assert!(expected < previous);
            previous = expected;
        }
    }

    #[test]
    fn solved_state_is_a_fixed_point() {
        let puzzle = parse(WIKI.0).unwrap();
        let mut state = VectorState::from_puzzles(&batch_of(&[puzzle]));
        let mut queue = StallQueue::default();
        state.propagate_lockstep(DEFAULT_ROUNDS, &mut queue);

        let before = state;
        let report = state.propagate_lockstep(DEFAULT_ROUNDS, &mut queue);
        assert_eq!(report.commits, 0);
        assert_eq!(report.queue_popped, 0);
        assert_eq!(state, before);
    }

    #[test]
    fn commits_only_forced_digits() {
        let records = sample();
        let puzzles: Vec<Grid> = records.iter().map(|r| r.puzzle.clone()).collect();
        let mut state = VectorState::from_puzzles(&batch_of(&puzzles[..LANES]));
        state.propagate_lockstep(DEFAULT_ROUNDS, &mut StallQueue::default());

        for (lane, record) in records[..LANES].iter().enumerate() {
            assert!(state.trackers_consistent(lane));
            let partial = state.lane_grid(lane);
            for (got, want) in partial.as_bytes().iter().zip(record.solution.as_bytes()) {
                assert!(*got == b'0' || got == want);
            }
            let pending = state.pending_lanes() >> lane & 1 != 0;
            assert_eq!(pending, state.missing(lane) > 0);
        }
    }

    #[test]
    fn empty_board_saturates_queue() {
        let empty = parse(&"0".repeat(81)).unwrap();
        let puzzle = parse(WIKI.0).unwrap();
        let mut grids = vec![puzzle; LANES];
        grids[5] = empty;
        let mut state = VectorState::from_puzzles(&batch_of(&grids));
        let report = state.propagate_lockstep(DEFAULT_ROUNDS, &mut StallQueue::default());

        assert!(report.saturated);
        assert_eq!(report.queue_popped, 81);
        assert_eq!(state.missing(5), 81);
        let pending = state.pending_lanes();
        for lane in 0..LANES {
            assert_eq!(pending >> lane & 1 != 0, state.missing(lane) > 0);
        }
        assert_ne!(pending & 1 << 5, 0);
    }

    #[test]
    fn rejected_lanes_are_not_pending() {
        let mut s = String::from(WIKI.0);
        s.replace_range(2..3, "5");
        let mut grids = vec![parse(WIKI.0).unwrap(); LANES];
        grids[0] = parse(&s).unwrap();
        let mut state = VectorState::from_puzzles(&batch_of(&grids));
        state.propagate_lockstep(DEFAULT_ROUNDS, &mut StallQueue::default());
        assert!(state.is_rejected(0));
        assert_eq!(state.pending_lanes() & 1, 0);
        assert_eq!(state.extract(0), None);
    }
}
