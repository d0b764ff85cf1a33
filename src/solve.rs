use super::fallback::GuessStrategy;
use super::lanes::LANES;
use super::layout::BatchState;
use super::lockstep::{VectorState, DEFAULT_ROUNDS};
use super::queue::{StallQueue, DEFAULT_CAPACITY};
use super::Grid;
use log::debug;
use std::convert::TryInto;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    No,
    Found(Grid),
}

impl Default for Solution {
    fn default() -> Self {
        Solution::No
    }
}

impl Solution {
    pub fn grid(&self) -> Option<&Grid> {
        match self {
            Solution::Found(grid) => Some(grid),
            Solution::No => None,
        }
    }
}

impl From<Option<Grid>> for Solution {
    fn from(grid: Option<Grid>) -> Self {
        grid.map_or(Solution::No, Solution::Found)
    }
}

/// Tuning knobs. None of them affect which solution is found for a puzzle
/// with a unique solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Full lockstep passes before the stall queue takes over.
    pub rounds: usize,
    pub queue_capacity: usize,
    pub guess: GuessStrategy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            rounds: DEFAULT_ROUNDS,
            queue_capacity: DEFAULT_CAPACITY,
            guess: GuessStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub batches: u64,
    pub singles: u64,
    pub lockstep_commits: u64,
    pub queue_pops: u64,
    pub saturated_batches: u64,
    pub fallback_lanes: u64,
    pub guesses: u64,
    pub unsolved: u64,
}

/// Owns the storage for one in-flight batch and reuses it across calls.
pub struct Solver {
    config: SolverConfig,
    state: VectorState,
    queue: StallQueue,
    stats: Stats,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(SolverConfig::default())
    }
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Solver {
            config,
            state: VectorState::new(),
            queue: StallQueue::new(config.queue_capacity),
            stats: Stats::default(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Solves `LANES` puzzles together. Lanes the lockstep engine leaves
    /// unfinished are completed one by one by the scalar fallback.
    pub fn solve_batch(&mut self, puzzles: &[Grid; LANES]) -> [Solution; LANES] {
        self.state.load(puzzles);
        self.state.setup();

        let report = self
            .state
            .propagate_lockstep(self.config.rounds, &mut self.queue);
        self.stats.batches += 1;
        self.stats.lockstep_commits += u64::from(report.commits);
        self.stats.queue_pops += report.queue_popped as u64;
        if report.saturated {
            self.stats.saturated_batches += 1;
        }

        let pending = self.state.pending_lanes();
        for lane in (0..LANES).filter(|&lane| pending >> lane & 1 != 0) {
            debug!(
                "batch {}: lane {} falls back with {} cells missing",
                self.stats.batches,
                lane,
                self.state.missing(lane)
            );
            self.stats.fallback_lanes += 1;
            self.state
                .solve_lane(lane, self.config.guess, &mut self.stats.guesses);
        }

        let mut solutions: [Solution; LANES] = Default::default();
        for (lane, solution) in solutions.iter_mut().enumerate() {
            *solution = self.state.extract(lane).into();
            if *solution == Solution::No {
                self.stats.unsolved += 1;
            }
        }
        solutions
    }

    /// Solves a single puzzle with the scalar engine alone.
    pub fn solve_one(&mut self, puzzle: &Grid) -> Solution {
        let mut state = BatchState::<1>::from_puzzles(&[puzzle.clone()]);
        self.stats.singles += 1;
        state.solve_lane(0, self.config.guess, &mut self.stats.guesses);
        let solution = Solution::from(state.extract(0));
        if solution == Solution::No {
            self.stats.unsolved += 1;
        }
        solution
    }

    /// Full batches go through `solve_batch`, the remainder through
    /// `solve_one`.
    pub fn solve_all(&mut self, puzzles: &[Grid]) -> Vec<Solution> {
        let mut solutions = Vec::with_capacity(puzzles.len());
        let mut chunks = puzzles.chunks_exact(LANES);
        for chunk in &mut chunks {
            let batch: &[Grid; LANES] = match chunk.try_into() {
                Ok(batch) => batch,
                Err(_) => unreachable!(),
            };
            solutions.extend(self.solve_batch(batch).iter().cloned());
        }
        for puzzle in chunks.remainder() {
            solutions.push(self.solve_one(puzzle));
        }
        solutions
    }
}

pub fn solve(problem: &Grid) -> Solution {
    Solver::default().solve_one(problem)
}
