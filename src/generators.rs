use log::{debug, trace};
use rand::Rng;
use std::error::Error;
use std::fmt;

use crate::coordinates::MazeCoordinate;
use crate::grid::{GridError, MazeGrid};

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenerationError {
    /// A run is already in progress and was left untouched.
    AlreadyRunning,
    Grid(GridError),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GenerationError::AlreadyRunning => f.write_str("maze generation is already running"),
            GenerationError::Grid(ref e) => write!(f, "maze grid error: {}", e),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            GenerationError::AlreadyRunning => None,
            GenerationError::Grid(ref e) => Some(e),
        }
    }
}

impl From<GridError> for GenerationError {
    fn from(e: GridError) -> GenerationError {
        GenerationError::Grid(e)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum RunState {
    /// Never started, finished or cancelled.
    Idle,
    Running,
}

/// What a single call to `RecursiveBacktracker::step` did.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum StepOutcome {
    /// Carved a passage from the cell on top of the stack into a newly visited neighbour.
    Advanced {
        from: MazeCoordinate,
        to: MazeCoordinate,
    },
    /// The cell had no unvisited neighbours and was popped.
    Backtracked(MazeCoordinate),
    /// No run is active. Nothing was done.
    Finished,
}

/// Recursive backtracker (randomised depth first search) maze generation, one step at a time.
///
/// The search starts in cell (0, 0). Each step looks at the cell on top of the stack: if it has
/// unvisited neighbours one is chosen at random, the wall to it is carved and it is pushed,
/// otherwise the cell is popped. The run is over when the stack empties, at which point every
/// cell is visited and the carved walls form a spanning tree of the maze cells: a perfect maze.
///
/// A `w * h` maze takes exactly `2 * w * h - 1` steps, one advance per tree edge plus one
/// backtrack per cell.
///
/// Pacing is left to the caller. Call `step` from a timer or animation frame, or just
/// `run_to_completion`.
#[derive(Debug)]
pub struct RecursiveBacktracker<'g, R: Rng> {
    grid: &'g mut MazeGrid,
    rng: R,
    stack: Vec<MazeCoordinate>,
    state: RunState,
    steps_taken: usize,
}

impl<'g, R: Rng> RecursiveBacktracker<'g, R> {
    pub fn new(grid: &'g mut MazeGrid, rng: R) -> RecursiveBacktracker<'g, R> {
        let capacity = grid.cells_count().0;
        RecursiveBacktracker {
            grid,
            rng,
            stack: Vec::with_capacity(capacity),
            state: RunState::Idle,
            steps_taken: 0,
        }
    }

    /// Begin a new run from cell (0, 0), forgetting any previous visits.
    ///
    /// Walls carved by earlier runs stay carved, use a fresh grid for a fresh maze.
    pub fn start_generation(&mut self) -> Result<(), GenerationError> {
        if self.state == RunState::Running {
            return Err(GenerationError::AlreadyRunning);
        }

        self.grid.reset_visited();
        self.stack.clear();
        self.steps_taken = 0;

        let start = MazeCoordinate::new(0, 0);
        self.grid.mark_visited(start)?;
        self.stack.push(start);
        self.state = RunState::Running;

        debug!("starting maze generation {:?}", self.grid);
        Ok(())
    }

    /// Advance the depth first search by one step.
    ///
    /// Calling this without an active run is harmless and reports `Finished`.
    pub fn step(&mut self) -> Result<StepOutcome, GenerationError> {
        if self.state != RunState::Running {
            return Ok(StepOutcome::Finished);
        }

        let current = match self.stack.last() {
            Some(&coord) => coord,
            None => {
                self.finish();
                return Ok(StepOutcome::Finished);
            }
        };

        let neighbours = self.grid.unvisited_neighbours(current)?;
        let outcome = if neighbours.is_empty() {
            let _ = self.stack.pop();
            StepOutcome::Backtracked(current)
        } else {
            let chosen = neighbours[self.rng.gen_range(0..neighbours.len())];
            self.grid.mark_visited(chosen)?;
            self.grid.remove_wall_between(current, chosen)?;
            self.stack.push(chosen);
            StepOutcome::Advanced { from: current, to: chosen }
        };

        self.steps_taken += 1;
        trace!("step {}: {:?}", self.steps_taken, outcome);

        // The run is over as soon as the stack empties, not on the next call.
        if self.stack.is_empty() {
            self.finish();
        }
        Ok(outcome)
    }

    /// Step until the maze is complete, starting a run first if none is active.
    ///
    /// Returns the number of steps taken by the run.
    pub fn run_to_completion(&mut self) -> Result<usize, GenerationError> {
        if self.state == RunState::Idle {
            self.start_generation()?;
        }
        while self.step()? != StepOutcome::Finished {}
        Ok(self.steps_taken)
    }

    /// Abandon the current run.
    ///
    /// Every wall carved so far joins two visited cells, so the grid is left holding a valid,
    /// if partial, tree of passages.
    pub fn cancel(&mut self) {
        if self.state == RunState::Running {
            debug!("maze generation cancelled after {} steps", self.steps_taken);
        }
        self.stack.clear();
        self.state = RunState::Idle;
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// The current search path, start cell first.
    #[inline]
    pub fn stack(&self) -> &[MazeCoordinate] {
        &self.stack
    }

    /// Steps taken by the current or most recent run.
    #[inline]
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    #[inline]
    pub fn grid(&self) -> &MazeGrid {
        self.grid
    }

    fn finish(&mut self) {
        self.state = RunState::Idle;
        debug!("maze generation finished after {} steps", self.steps_taken);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;
    use crate::coordinates::WallCoordinate;
    use crate::grid_displays::RecordingObserver;
    use crate::units::{Height, PassagesCount, Width};

    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn grid(w: usize, h: usize) -> MazeGrid {
        MazeGrid::new(Width(w), Height(h)).expect("valid dimensions")
    }

    fn seeded(seed: u64) -> XorShiftRng {
        XorShiftRng::seed_from_u64(seed)
    }

    // Every gen_range draws zero, so the first candidate neighbour is always chosen.
    fn first_choice() -> StepRng {
        StepRng::new(0, 0)
    }

    fn mc(x: u32, y: u32) -> MazeCoordinate {
        MazeCoordinate::new(x, y)
    }

    fn trace_run<R: Rng>(generator: &mut RecursiveBacktracker<R>) -> Vec<StepOutcome> {
        generator.start_generation().expect("idle generator");
        let mut outcomes = vec![];
        loop {
            match generator.step().expect("valid step") {
                StepOutcome::Finished => break,
                outcome => outcomes.push(outcome),
            }
        }
        outcomes
    }

    #[test]
    fn step_without_a_run_is_finished() {
        let mut g = grid(3, 3);
        let mut generator = RecursiveBacktracker::new(&mut g, seeded(1));
        assert_eq!(generator.step(), Ok(StepOutcome::Finished));
        assert_eq!(generator.state(), RunState::Idle);
        assert_eq!(generator.grid().visited_count(), 0);
    }

    #[test]
    fn start_marks_the_origin() {
        let mut g = grid(3, 3);
        let mut generator = RecursiveBacktracker::new(&mut g, seeded(1));
        generator.start_generation().unwrap();
        assert!(generator.is_running());
        assert_eq!(generator.stack(), &[mc(0, 0)]);
        assert_eq!(generator.grid().is_visited(mc(0, 0)), Ok(true));
        assert_eq!(generator.grid().visited_count(), 1);
    }

    #[test]
    fn restart_while_running_is_refused() {
        let mut g = grid(4, 4);
        let mut generator = RecursiveBacktracker::new(&mut g, seeded(7));
        generator.start_generation().unwrap();
        for _ in 0..5 {
            generator.step().unwrap();
        }
        let stack_before = generator.stack().to_vec();
        let visited_before = generator.grid().visited_count();

        assert_eq!(generator.start_generation(), Err(GenerationError::AlreadyRunning));
        assert!(generator.is_running());
        assert_eq!(generator.stack(), &stack_before[..]);
        assert_eq!(generator.grid().visited_count(), visited_before);
        assert_eq!(generator.steps_taken(), 5);
    }

    #[test]
    fn single_cell_maze() {
        let mut g = grid(1, 1);
        let mut generator = RecursiveBacktracker::new(&mut g, seeded(3));
        let outcomes = trace_run(&mut generator);
        assert_eq!(outcomes, vec![StepOutcome::Backtracked(mc(0, 0))]);
        assert!(!generator.is_running());
        assert!(generator.stack().is_empty());
        assert_eq!(generator.grid().passages_count(), PassagesCount(0));
        assert_eq!(generator.step(), Ok(StepOutcome::Finished));
    }

    #[test]
    fn first_choice_two_by_two_trace() {
        let recorder = RecordingObserver::new();
        let mut g = MazeGrid::with_observer(Width(2), Height(2), Box::new(recorder.clone())).unwrap();
        recorder.clear();

        let mut generator = RecursiveBacktracker::new(&mut g, first_choice());
        let outcomes = trace_run(&mut generator);
        assert_eq!(outcomes,
                   vec![StepOutcome::Advanced { from: mc(0, 0), to: mc(1, 0) },
                        StepOutcome::Advanced { from: mc(1, 0), to: mc(1, 1) },
                        StepOutcome::Advanced { from: mc(1, 1), to: mc(0, 1) },
                        StepOutcome::Backtracked(mc(0, 1)),
                        StepOutcome::Backtracked(mc(1, 1)),
                        StepOutcome::Backtracked(mc(1, 0)),
                        StepOutcome::Backtracked(mc(0, 0))]);
        assert_eq!(generator.steps_taken(), 7);
        drop(generator);

        let wc = |x, y| WallCoordinate::new(x, y);
        assert_eq!(recorder.cleared_walls(), vec![wc(2, 1), wc(3, 2), wc(2, 3)]);
        assert_eq!(g.passages_count(), PassagesCount(3));
        assert!(!g.is_wall_present(wc(2, 1)));
        assert!(!g.is_wall_present(wc(3, 2)));
        assert!(!g.is_wall_present(wc(2, 3)));
        assert!(g.is_wall_present(wc(1, 2)));
        assert!(analysis::is_perfect_maze(&g));
    }

    #[test]
    fn run_to_completion_visits_everything() {
        let mut g = grid(12, 7);
        let steps = RecursiveBacktracker::new(&mut g, seeded(42))
            .run_to_completion()
            .expect("generation");
        assert_eq!(steps, 2 * 12 * 7 - 1);
        assert!(g.is_fully_visited());
        assert_eq!(g.passages_count(), PassagesCount(12 * 7 - 1));
        assert!(analysis::is_perfect_maze(&g));
    }

    #[test]
    fn stack_holds_only_visited_cells() {
        let mut g = grid(6, 5);
        let mut generator = RecursiveBacktracker::new(&mut g, seeded(11));
        generator.start_generation().unwrap();
        while generator.is_running() {
            generator.step().unwrap();
            for &coord in generator.stack() {
                assert_eq!(generator.grid().is_visited(coord), Ok(true));
            }
            if generator.is_running() {
                assert_eq!(generator.stack()[0], mc(0, 0));
            }
        }
        assert!(generator.stack().is_empty());
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let run = |seed| {
            let mut g = grid(9, 6);
            let outcomes = trace_run(&mut RecursiveBacktracker::new(&mut g, seeded(seed)));
            (outcomes, g.cleared_walls().collect::<Vec<WallCoordinate>>())
        };
        assert_eq!(run(2024), run(2024));
    }

    #[test]
    fn cancel_leaves_a_consistent_grid() {
        let mut g = grid(5, 5);
        let mut generator = RecursiveBacktracker::new(&mut g, seeded(5));
        generator.start_generation().unwrap();
        for _ in 0..10 {
            generator.step().unwrap();
        }
        generator.cancel();
        assert_eq!(generator.state(), RunState::Idle);
        assert!(generator.stack().is_empty());
        assert_eq!(generator.step(), Ok(StepOutcome::Finished));

        // carved walls form a tree over the visited cells
        let visited = generator.grid().visited_count();
        assert_eq!(generator.grid().passages_count(), PassagesCount(visited - 1));
        assert!(analysis::passages_are_acyclic(generator.grid()));

        // a new run can start after cancelling
        assert_eq!(generator.start_generation(), Ok(()));
        assert_eq!(generator.grid().visited_count(), 1);
    }

    #[test]
    fn quickcheck_perfect_mazes() {
        fn prop(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = (w as usize % 16, h as usize % 16);
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let mut g = grid(w, h);
            let mut generator = RecursiveBacktracker::new(&mut g, XorShiftRng::seed_from_u64(seed));
            let outcomes = trace_run(&mut generator);
            let advances = outcomes.iter()
                .filter(|outcome| match outcome {
                    StepOutcome::Advanced { .. } => true,
                    _ => false,
                })
                .count();
            drop(generator);

            TestResult::from_bool(outcomes.len() == 2 * w * h - 1 && advances == w * h - 1 &&
                                  g.is_fully_visited() &&
                                  g.passages_count() == PassagesCount(w * h - 1) &&
                                  analysis::is_perfect_maze(&g))
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn quickcheck_neighbours_stay_in_bounds() {
        fn prop(w: u8, h: u8, steps: u8, seed: u64) -> TestResult {
            let (w, h) = (w as usize % 10, h as usize % 10);
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let mut g = grid(w, h);
            {
                let mut generator = RecursiveBacktracker::new(&mut g, XorShiftRng::seed_from_u64(seed));
                generator.start_generation().unwrap();
                for _ in 0..steps {
                    generator.step().unwrap();
                }
            }
            let all_ok = g.iter().all(|coord| {
                g.unvisited_neighbours(coord)
                    .unwrap()
                    .iter()
                    .all(|&n| g.is_valid_coordinate(n) && g.is_visited(n) == Ok(false))
            });
            TestResult::from_bool(all_ok)
        }
        quickcheck(prop as fn(u8, u8, u8, u64) -> TestResult);
    }
}
