use super::bits::{is_pair, is_single, iter_bits, mask_to_digit, Mask, MASK_NONE};
use super::layout::{BatchState, CellSlots, CELL_SLOTS};
use failure_derive::Fail;
use log::trace;

/// How the branch cell is chosen once propagation stalls.
///
/// Both strategies take the first unresolved cell with exactly two
/// candidates when there is one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuessStrategy {
    /// Give up on the lane when no two-candidate cell exists.
    NakedPair,
    /// Otherwise branch on the first cell with the fewest candidates.
    FewestCandidates,
}

impl Default for GuessStrategy {
    fn default() -> Self {
        GuessStrategy::FewestCandidates
    }
}

#[derive(Debug, Fail)]
#[fail(display = "unknown guess strategy '{}' (expected 'pair' or 'fewest')", _0)]
pub struct UnknownStrategyError(String);

impl std::str::FromStr for GuessStrategy {
    type Err = UnknownStrategyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pair" => Ok(GuessStrategy::NakedPair),
            "fewest" => Ok(GuessStrategy::FewestCandidates),
            _ => Err(UnknownStrategyError(s.to_owned())),
        }
    }
}

impl<const L: usize> BatchState<L> {
    /// Commits naked singles in `lane` until a full scan makes no progress.
    /// Returns `false` if an unresolved cell has no candidate left.
    pub fn propagate_lane(&mut self, lane: usize) -> bool {
        loop {
            let mut progress = false;
            for slots in CELL_SLOTS.iter() {
                if self.get(slots.cell, lane) != MASK_NONE {
                    continue;
                }
                let bits = self.candidates(slots, lane);
                if bits == MASK_NONE {
                    return false;
                }
                if is_single(bits) {
                    self.commit(slots, lane, bits);
                    progress = true;
                }
            }
            if !progress || self.missing[lane] == 0 {
                return true;
            }
        }
    }

    fn find_branch(&self, lane: usize, strategy: GuessStrategy) -> Option<(CellSlots, Mask)> {
        let mut fewest: Option<(CellSlots, Mask)> = None;
        for slots in CELL_SLOTS.iter() {
            if self.get(slots.cell, lane) != MASK_NONE {
                continue;
            }
            let bits = self.candidates(slots, lane);
            if is_pair(bits) {
                return Some((*slots, bits));
            }
            if fewest.map_or(true, |(_, m)| bits.count_ones() < m.count_ones()) {
                fewest = Some((*slots, bits));
            }
        }
        match strategy {
            GuessStrategy::NakedPair => None,
            GuessStrategy::FewestCandidates => fewest,
        }
    }

    /// Solves one lane by propagation and depth-first guessing.
    ///
    /// Before each guess the whole state is copied, since the lane's data is
    /// interleaved with the other lanes. Candidates are tried lowest digit
    /// first; `guesses` counts every candidate tried.
    pub fn solve_lane(&mut self, lane: usize, strategy: GuessStrategy, guesses: &mut u64) -> bool {
        if self.rejected[lane] || !self.propagate_lane(lane) {
            return false;
        }
        if self.missing[lane] == 0 {
            return true;
        }
        let (slots, bits) = match self.find_branch(lane, strategy) {
            Some(branch) => branch,
            None => return false,
        };

        let snapshot = *self;
        let mut candidates = iter_bits(bits).peekable();
        while let Some(bit) = candidates.next() {
            *guesses += 1;
            trace!("lane {}: guess {} at cell {}", lane, mask_to_digit(bit), slots.cell);
            self.commit(&slots, lane, bit);
            if candidates.peek().is_none() {
                return self.solve_lane(lane, strategy, guesses);
            }
            if self.solve_lane(lane, strategy, guesses) {
                return true;
            }
            *self = snapshot;
        }
        false
    }
}
