//! The problem grid
//!
//! Exactly one cell holds the player and every other cell holds a problem.
//! Answers are pairwise distinct across the whole board, so any submitted
//! value names at most one tile.

use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::GridPos;
use super::problem::{Problem, generate_problem};
use crate::consts::{CELL_COUNT, GRID_SIZE};
use crate::tuning::Tuning;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no player cell")]
    NoPlayer,
    #[error("board has more than one player cell: {first} and {second}")]
    MultiplePlayers { first: GridPos, second: GridPos },
    #[error("answer {answer} appears at both {first} and {second}")]
    DuplicateAnswer {
        answer: u32,
        first: GridPos,
        second: GridPos,
    },
}

/// Contents of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// The player's tile, shows no problem
    Player,
    Problem(Problem),
}

impl Cell {
    pub const fn problem(&self) -> Option<&Problem> {
        match self {
            Cell::Player => None,
            Cell::Problem(problem) => Some(problem),
        }
    }

    pub const fn is_player(&self) -> bool {
        matches!(self, Cell::Player)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Layout")]
pub struct Board {
    cells: [Cell; CELL_COUNT],
    player: GridPos,
}

/// Serialized cells; the player position is recovered from them
#[derive(Deserialize)]
struct Layout {
    cells: [Cell; CELL_COUNT],
}

impl TryFrom<Layout> for Board {
    type Error = BoardError;

    fn try_from(layout: Layout) -> Result<Self, Self::Error> {
        Self::from_cells(layout.cells)
    }
}

impl Board {
    /// Fresh board with the player at the center
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Self {
        let player = GridPos::center();
        let mut cells = [Cell::Player; CELL_COUNT];
        let mut used = BTreeSet::new();

        for pos in GridPos::all().filter(|&pos| pos != player) {
            let problem = generate_problem(rng, &used, tuning);
            used.insert(problem.answer());
            cells[pos.index()] = Cell::Problem(problem);
        }

        Self { cells, player }
    }

    /// Build a board from an explicit row-major layout, checking invariants
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Result<Self, BoardError> {
        let mut player = None;
        for pos in GridPos::all() {
            if cells[pos.index()].is_player() {
                if let Some(first) = player {
                    return Err(BoardError::MultiplePlayers { first, second: pos });
                }
                player = Some(pos);
            }
        }
        let player = player.ok_or(BoardError::NoPlayer)?;

        let board = Self { cells, player };
        board.check_invariants()?;
        Ok(board)
    }

    pub fn player(&self) -> GridPos {
        self.player
    }

    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        self.cells.get(pos.in_bounds().then_some(pos.index())?)
    }

    pub fn problem_at(&self, pos: GridPos) -> Option<&Problem> {
        self.cell(pos).and_then(Cell::problem)
    }

    /// All cells with their positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Cell)> {
        GridPos::all().zip(self.cells.iter())
    }

    /// Every problem with its position
    pub fn problems(&self) -> impl Iterator<Item = (GridPos, &Problem)> {
        self.iter()
            .filter_map(|(pos, cell)| cell.problem().map(|p| (pos, p)))
    }

    pub fn answers(&self) -> BTreeSet<u32> {
        self.problems().map(|(_, p)| p.answer()).collect()
    }

    /// Move the player to `to` and refill the vacated cell.
    ///
    /// `refill` sees the answers of every other problem cell, so it can keep
    /// the board unique. Returns the vacated position.
    pub(crate) fn relocate_player(
        &mut self,
        to: GridPos,
        refill: impl FnOnce(&BTreeSet<u32>) -> Problem,
    ) -> GridPos {
        let from = self.player;
        self.cells[to.index()] = Cell::Player;
        self.player = to;

        // `from` still reads as Player here, so it is excluded along with `to`
        let used = self.answers();
        self.cells[from.index()] = Cell::Problem(refill(&used));
        from
    }

    /// Verify occupancy and answer uniqueness
    pub fn check_invariants(&self) -> Result<(), BoardError> {
        let mut seen: Vec<(u32, GridPos)> = Vec::with_capacity(CELL_COUNT);
        let mut player = None;

        for (pos, cell) in self.iter() {
            match cell {
                Cell::Player => {
                    if let Some(first) = player {
                        return Err(BoardError::MultiplePlayers { first, second: pos });
                    }
                    player = Some(pos);
                }
                Cell::Problem(problem) => {
                    let answer = problem.answer();
                    if let Some(&(_, first)) = seen.iter().find(|(a, _)| *a == answer) {
                        return Err(BoardError::DuplicateAnswer {
                            answer,
                            first,
                            second: pos,
                        });
                    }
                    seen.push((answer, pos));
                }
            }
        }

        match player {
            Some(pos) if pos == self.player => Ok(()),
            _ => Err(BoardError::NoPlayer),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if col > 0 {
                    write!(f, " |")?;
                }
                match self.problem_at(GridPos::new(row, col)) {
                    Some(problem) => write!(f, " {:^7}", problem.to_string())?,
                    None => write!(f, " {:^7}", "[P]")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
