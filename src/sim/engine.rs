//! Board engine: move validation and resolution
//!
//! Owns the board and the player position. A move is accepted only while the
//! run is active, only to a rook-step neighbor, and only when the submitted
//! value equals that neighbor's answer.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::{Board, Cell};
use super::grid::GridPos;
use super::problem::generate_problem;
use super::state::RunState;
use crate::tuning::{Tuning, TuningError};

/// Why a submission did not move the player
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    #[error("input is not a positive whole number")]
    InvalidInput,
    #[error("no adjacent tile has that answer")]
    NoMatch,
    #[error("the run is not active")]
    NotRunning,
}

/// Result of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Moved { from: GridPos, to: GridPos },
    Rejected(Rejection),
}

impl MoveOutcome {
    pub const fn accepted(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }

    pub const fn new_position(&self) -> Option<GridPos> {
        match self {
            MoveOutcome::Moved { to, .. } => Some(*to),
            MoveOutcome::Rejected(_) => None,
        }
    }

    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            MoveOutcome::Moved { .. } => None,
            MoveOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

/// Parse raw player text into an answer.
///
/// Accepts only surrounding whitespace plus a non-empty run of ASCII digits
/// that fits in a `u32`. Signs, letters and inner spaces are rejected.
pub fn parse_answer(raw: &str) -> Option<u32> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Clone)]
pub struct BoardEngine {
    board: Board,
    rng: Pcg32,
    seed: u64,
    tuning: Tuning,
}

impl BoardEngine {
    /// Create an engine with a freshly generated board.
    ///
    /// Without a seed one is drawn from the thread RNG, and can be read back
    /// with [`BoardEngine::seed`] to replay the run. Fails if `tuning` does
    /// not pass [`Tuning::validate`].
    pub fn new(seed: Option<u64>, tuning: Tuning) -> Result<Self, TuningError> {
        Ok(Self::generate(seed, tuning.validate()?))
    }

    /// Start from an explicit board. Later refills draw from `seed`.
    pub fn from_board(board: Board, seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        Ok(Self {
            board,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            tuning: tuning.validate()?,
        })
    }

    /// Regenerate the board and move the player back to the center
    pub fn initialize(&mut self, seed: Option<u64>) -> &Board {
        *self = Self::generate(seed, self.tuning);
        &self.board
    }

    // `tuning` is already validated
    fn generate(seed: Option<u64>, tuning: Tuning) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let board = Board::generate(&mut rng, &tuning);
        log::debug!("Board initialized with seed {seed}");
        Self {
            board,
            rng,
            seed,
            tuning,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> GridPos {
        self.board.player()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        self.board.cell(pos)
    }

    /// Positions the player can move to, in search order
    pub fn neighbors(&self) -> impl Iterator<Item = GridPos> + use<> {
        self.board.player().neighbors()
    }

    /// Submit raw player text
    pub fn submit_input(&mut self, run: &mut RunState, raw: &str) -> MoveOutcome {
        if !run.is_running() {
            return MoveOutcome::Rejected(Rejection::NotRunning);
        }
        match parse_answer(raw) {
            Some(value) => self.submit_answer(run, value),
            None => {
                log::debug!("Rejected malformed input {raw:?}");
                MoveOutcome::Rejected(Rejection::InvalidInput)
            }
        }
    }

    /// Move to the adjacent tile whose answer is `value`, if any
    pub fn submit_answer(&mut self, run: &mut RunState, value: u32) -> MoveOutcome {
        if !run.is_running() {
            return MoveOutcome::Rejected(Rejection::NotRunning);
        }

        let target = self.neighbors().find(|&pos| {
            self.board
                .problem_at(pos)
                .is_some_and(|p| p.answer() == value)
        });
        let Some(to) = target else {
            log::debug!("No neighbor of {} answers {value}", self.player());
            return MoveOutcome::Rejected(Rejection::NoMatch);
        };

        let rng = &mut self.rng;
        let tuning = &self.tuning;
        let from = self
            .board
            .relocate_player(to, |used| generate_problem(rng, used, tuning));
        debug_assert!(self.board.check_invariants().is_ok());

        run.increase_score(self.tuning.move_score_reward);
        run.increase_health(self.tuning.move_health_reward);
        log::debug!("Moved {from} -> {to}, health {}", run.health());

        MoveOutcome::Moved { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::tests::layout;
    use proptest::prelude::*;

    // Player at the center; up=(0,1) is 7, down=(2,1) is 8, left=(1,0) is 4,
    // right=(1,2) is 5. Corners hold 1, 3, 6, 9.
    fn fixed_engine() -> BoardEngine {
        let board = layout([1, 7, 3, 4, 0, 5, 6, 8, 9]);
        BoardEngine::from_board(board, 42, Tuning::default()).unwrap()
    }

    #[test]
    fn test_initialize_places_player_at_center() {
        let mut engine = BoardEngine::new(Some(5), Tuning::default()).unwrap();
        engine.submit_answer(&mut RunState::default(), 0);
        let board = engine.initialize(Some(6));

        assert_eq!(board.player(), GridPos::new(1, 1));
        assert_eq!(board.problems().count(), 8);
        assert_eq!(board.answers().len(), 8);
        assert_eq!(engine.seed(), 6);
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = BoardEngine::new(Some(77), Tuning::default()).unwrap();
        let b = BoardEngine::new(Some(77), Tuning::default()).unwrap();
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_move_to_matching_neighbor() {
        let mut engine = fixed_engine();
        let mut run = RunState::default();

        let outcome = engine.submit_answer(&mut run, 7);

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: GridPos::new(1, 1),
                to: GridPos::new(0, 1),
            }
        );
        assert!(outcome.accepted());
        assert_eq!(outcome.new_position(), Some(GridPos::new(0, 1)));
        assert_eq!(engine.player(), GridPos::new(0, 1));
        assert!(engine.board().problem_at(GridPos::new(0, 1)).is_none());

        let refill = engine.board().problem_at(GridPos::new(1, 1)).unwrap();
        assert!(refill.answer() > 0);
        engine.board().check_invariants().unwrap();

        assert_eq!(run.health(), 101);
        assert_eq!(run.score(), 1);
    }

    #[test]
    fn test_non_adjacent_answer_is_rejected() {
        let mut engine = fixed_engine();
        let mut run = RunState::default();
        let before = engine.board().clone();

        // 1, 3, 6, 9 sit on the diagonals
        for value in [1, 3, 6, 9] {
            let outcome = engine.submit_answer(&mut run, value);
            assert_eq!(outcome, MoveOutcome::Rejected(Rejection::NoMatch));
        }

        assert_eq!(engine.board(), &before);
        assert_eq!(run, RunState::default());
    }

    #[test]
    fn test_absent_answer_is_rejected() {
        let mut engine = fixed_engine();
        let mut run = RunState::default();
        assert_eq!(
            engine.submit_answer(&mut run, 0),
            MoveOutcome::Rejected(Rejection::NoMatch)
        );
        assert_eq!(
            engine.submit_answer(&mut run, 1000),
            MoveOutcome::Rejected(Rejection::NoMatch)
        );
        assert_eq!(run.score(), 0);
    }

    #[test]
    fn test_stopped_run_rejects_everything() {
        let mut engine = fixed_engine();
        let mut run = RunState::default();
        run.decrease_health(100);
        let before = engine.board().clone();

        assert_eq!(
            engine.submit_answer(&mut run, 7),
            MoveOutcome::Rejected(Rejection::NotRunning)
        );
        assert_eq!(
            engine.submit_input(&mut run, "garbage"),
            MoveOutcome::Rejected(Rejection::NotRunning)
        );
        assert_eq!(engine.board(), &before);
        assert_eq!(run.health(), 0);
    }

    #[test]
    fn test_submit_input_parses_and_moves() {
        let mut engine = fixed_engine();
        let mut run = RunState::default();

        assert_eq!(
            engine.submit_input(&mut run, "  5\n").new_position(),
            Some(GridPos::new(1, 2))
        );
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let mut engine = fixed_engine();
        let mut run = RunState::default();
        let before = engine.board().clone();

        for raw in ["", "   ", "x7", "7x", "+7", "-7", "7 5", "4.0", "99999999999"] {
            assert_eq!(
                engine.submit_input(&mut run, raw),
                MoveOutcome::Rejected(Rejection::InvalidInput),
                "input {raw:?}"
            );
        }
        assert_eq!(engine.board(), &before);
        assert_eq!(run, RunState::default());
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("12"), Some(12));
        assert_eq!(parse_answer("\t007 "), Some(7));
        assert_eq!(parse_answer("0"), Some(0));
        assert_eq!(parse_answer("١٢"), None);
        assert_eq!(parse_answer("4294967296"), None);
    }

    #[test]
    fn test_rewards_follow_tuning() {
        let tuning = Tuning {
            move_health_reward: 3,
            move_score_reward: 10,
            ..Tuning::default()
        };
        let board = layout([1, 7, 3, 4, 0, 5, 6, 8, 9]);
        let mut engine = BoardEngine::from_board(board, 1, tuning).unwrap();
        let mut run = RunState::default();

        engine.submit_answer(&mut run, 4);
        assert_eq!(run.health(), 103);
        assert_eq!(run.score(), 10);
    }

    #[test]
    fn test_invalid_tuning_is_refused() {
        let inverted = Tuning {
            operand_min: 5,
            operand_max: 2,
            ..Tuning::default()
        };
        assert!(matches!(
            BoardEngine::new(Some(1), inverted),
            Err(TuningError::InvalidOperandRange { min: 5, max: 2 })
        ));

        let board = layout([1, 7, 3, 4, 0, 5, 6, 8, 9]);
        let zero_period = Tuning {
            tick_period_ms: 0,
            ..Tuning::default()
        };
        assert!(matches!(
            BoardEngine::from_board(board, 1, zero_period),
            Err(TuningError::ZeroTickPeriod)
        ));
    }

    #[test]
    fn test_neighbors_from_corner() {
        let board = layout([0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let engine = BoardEngine::from_board(board, 1, Tuning::default()).unwrap();
        let neighbors: Vec<_> = engine.neighbors().collect();
        assert_eq!(neighbors, vec![GridPos::new(1, 0), GridPos::new(0, 1)]);
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_for_any_play(
            seed in any::<u64>(),
            values in prop::collection::vec(0u32..25, 0..200),
        ) {
            let mut engine = BoardEngine::new(Some(seed), Tuning::default()).unwrap();
            let mut run = RunState::default();

            for value in values {
                let board_before = engine.board().clone();
                let run_before = run.clone();
                let from = engine.player();

                match engine.submit_answer(&mut run, value) {
                    MoveOutcome::Moved { from: moved_from, to } => {
                        prop_assert_eq!(moved_from, from);
                        prop_assert!(from.is_adjacent(to));
                        prop_assert_eq!(engine.player(), to);
                        prop_assert_eq!(run.score(), run_before.score() + 1);
                        prop_assert_eq!(run.health(), run_before.health() + 1);
                    }
                    MoveOutcome::Rejected(_) => {
                        prop_assert_eq!(engine.board(), &board_before);
                        prop_assert_eq!(&run, &run_before);
                    }
                }

                prop_assert!(engine.board().check_invariants().is_ok());
                prop_assert_eq!(engine.board().answers().len(), 8);
                let occupied: Vec<_> = engine
                    .board()
                    .iter()
                    .filter(|(_, cell)| cell.is_player())
                    .map(|(pos, _)| pos)
                    .collect();
                prop_assert_eq!(occupied, vec![engine.player()]);
            }
        }

        #[test]
        fn prop_any_text_never_panics(seed in any::<u64>(), raw in ".*") {
            let mut engine = BoardEngine::new(Some(seed), Tuning::default()).unwrap();
            let mut run = RunState::default();
            let outcome = engine.submit_input(&mut run, &raw);
            if !outcome.accepted() {
                prop_assert_eq!(run, RunState::default());
            }
            prop_assert!(engine.board().check_invariants().is_ok());
        }
    }
}
