//! Grid coordinates and rook-step adjacency

use serde::{Deserialize, Serialize};

use crate::consts::{CELL_COUNT, GRID_SIZE};

/// A cell position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: u8,
    pub col: u8,
}

impl GridPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// The starting cell, `(N/2, N/2)`
    pub const fn center() -> Self {
        Self::new(GRID_SIZE / 2, GRID_SIZE / 2)
    }

    pub const fn in_bounds(self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    /// Row-major index into a `CELL_COUNT` array
    pub const fn index(self) -> usize {
        self.row as usize * GRID_SIZE as usize + self.col as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        let size = GRID_SIZE as usize;
        Some(Self::new((index / size) as u8, (index % size) as u8))
    }

    /// Every in-bounds position, row-major
    pub fn all() -> impl Iterator<Item = GridPos> {
        (0..CELL_COUNT).filter_map(Self::from_index)
    }

    /// The neighbor one step in `direction`, if it is on the board
    pub fn step(self, direction: Direction) -> Option<GridPos> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let next = GridPos::new(row, col);
        next.in_bounds().then_some(next)
    }

    /// Orthogonal neighbors in search order, skipping the board edge
    pub fn neighbors(self) -> impl Iterator<Item = GridPos> {
        Direction::ALL.into_iter().filter_map(move |dir| self.step(dir))
    }

    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        u32::from(self.row.abs_diff(other.row)) + u32::from(self.col.abs_diff(other.col))
    }

    pub fn is_adjacent(self, other: GridPos) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rook-step directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbor search order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` displacement
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}
