//! The board module contains the engine of the game. Every operation here is a pure function of a
//! [`Grid`]: moves hand back a fresh grid along with the points they earned, spawning draws from an
//! injected [`Source`], and the terminal checks only ever read.
//!
//! The per-line slide and merge lives in the `line` submodule; this module only decides which
//! lines a direction touches and in which orientation.

mod line;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::random::Source;
use line::Edge;

/// The side length of the square grid.
pub const SIZE: usize = 4;

/// The tile value that counts as a win.
pub const WINNING_TILE: u32 = 2048;

/// The largest tile a grid can be built with. Two of them still merge without leaving `u32`.
pub const MAX_TILE: u32 = 1 << 30;

/// A single square of the grid: either empty, or holding a power of two no smaller than 2.
pub type Cell = Option<u32>;

/// A direction in which all the tiles of the grid are pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// This variant pushes every column toward the bottom row.
    Down,
    /// This variant pushes every row toward the first column.
    Left,
    /// This variant pushes every row toward the last column.
    Right,
    /// This variant pushes every column toward the top row.
    Up,
}

impl Direction {
    /// All four directions, in the order the terminal front end lists them.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// This function tells which end of a line this direction packs the tiles against.
    const fn edge(self) -> Edge {
        match self {
            Self::Left | Self::Up => Edge::Near,
            Self::Right | Self::Down => Edge::Far,
        }
    }

    /// This function is true for the two directions that work on columns instead of rows.
    const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// The error returned when a grid is built out of values that can never appear on a board.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// This variant is used when a cell holds something other than zero or a power of two between
    /// 2 and [`MAX_TILE`].
    #[error("{value} at row {row}, column {column} is not a tile value")]
    InvalidTile {
        /// The column of the offending cell.
        column: usize,
        /// The row of the offending cell.
        row: usize,
        /// The value found in the cell.
        value: u32,
    },
}

/// The 4x4 board, stored row-major. A grid is a plain value: every operation returns a new one and
/// leaves the receiver untouched.
///
/// With serde, a grid reads and writes as four rows of plain numbers, zero for an empty cell, and
/// goes through [`Grid::from_rows`] on the way in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[[u32; SIZE]; SIZE]", into = "[[u32; SIZE]; SIZE]")]
pub struct Grid([[Cell; SIZE]; SIZE]);

impl Grid {
    /// This function returns a grid with every cell empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self([[None; SIZE]; SIZE])
    }

    /// This function builds a grid from plain numbers, where a zero stands for an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTile`] for the first cell, in row-major order, whose value is neither
    /// zero nor a power of two between 2 and [`MAX_TILE`].
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Result<Self, Error> {
        let mut grid = Self::empty();

        for (row, (values, cells)) in rows.iter().zip(&mut grid.0).enumerate() {
            for (column, (&value, cell)) in values.iter().zip(cells).enumerate() {
                if value == 0 {
                    continue;
                }
                if value < 2 || value > MAX_TILE || !value.is_power_of_two() {
                    return Err(Error::InvalidTile { column, row, value });
                }
                *cell = Some(value);
            }
        }

        Ok(grid)
    }

    /// This function starts a game board: two tiles dropped onto an empty grid.
    pub fn initialize<R: Source + ?Sized>(rng: &mut R) -> Self {
        Self::empty().spawn_random_tile(rng).spawn_random_tile(rng)
    }

    /// This function gives read access to the rows of the grid.
    #[must_use]
    pub const fn rows(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.0
    }

    /// This function returns the content of a cell, or `None` when it is empty or out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.0
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .flatten()
    }

    /// This function lists the coordinates of the empty cells as `(row, column)` pairs, in
    /// row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|&(_, cell)| cell.is_none())
                    .map(move |(column, _)| (row, column))
            })
            .collect()
    }

    /// This function counts the empty cells.
    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.cells().filter(Option::is_none).count()
    }

    /// This function returns the largest tile on the grid, if there is any tile at all.
    #[must_use]
    pub fn max_tile(&self) -> Option<u32> {
        self.cells().flatten().max()
    }

    /// This function adds up every tile on the grid.
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.cells().flatten().map(u64::from).sum()
    }

    /// This function places a new tile on one of the empty cells, chosen uniformly. The new tile is
    /// a 2 nine times out of ten and a 4 otherwise. A full grid comes back unchanged.
    #[must_use]
    pub fn spawn_random_tile<R: Source + ?Sized>(self, rng: &mut R) -> Self {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return self;
        }

        let Some(&(row, column)) = empty.get(rng.below(empty.len())) else {
            return self;
        };
        let value = if rng.below(10) < 9 { 2 } else { 4 };

        let mut grid = self;
        if let Some(cell) = grid.0.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = Some(value);
        }
        grid
    }

    /// This function pushes every tile of the grid in `direction`, merging equal neighbours, and
    /// returns the resulting grid with the points earned. The points are the sum of the tiles
    /// created by merges.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Shift {
        let lines = if direction.is_vertical() {
            self.transpose()
        } else {
            self
        };

        let mut slid = Self::empty();
        let mut score: u32 = 0;
        for (target, &source) in slid.0.iter_mut().zip(&lines.0) {
            let (cells, gained) = line::slide(source, direction.edge());
            *target = cells;
            score = score.saturating_add(gained);
        }

        let grid = if direction.is_vertical() {
            slid.transpose()
        } else {
            slid
        };

        Shift { grid, score }
    }

    /// This function tells whether any move can still change the grid: there is an empty cell, or
    /// two horizontally or vertically adjacent cells hold the same tile.
    #[must_use]
    pub fn can_move(&self) -> bool {
        self.count_empty() > 0 || self.has_adjacent_pair() || self.transpose().has_adjacent_pair()
    }

    /// This function is the negation of [`Grid::can_move`].
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        !self.can_move()
    }

    /// This function tells whether the winning tile is on the grid.
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.cells().any(|cell| cell == Some(WINNING_TILE))
    }

    /// This function walks every cell in row-major order.
    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.0.iter().flatten().copied()
    }

    /// This function is true when some row holds two equal tiles side by side.
    fn has_adjacent_pair(&self) -> bool {
        self.0.iter().any(|cells| {
            cells
                .windows(2)
                .any(|pair| matches!(*pair, [Some(left), Some(right)] if left == right))
        })
    }

    /// This function swaps rows and columns, so column work can reuse the row code.
    fn transpose(&self) -> Self {
        Self(std::array::from_fn(|row| {
            std::array::from_fn(|column| self.get(column, row))
        }))
    }
}

impl TryFrom<[[u32; SIZE]; SIZE]> for Grid {
    type Error = Error;

    fn try_from(rows: [[u32; SIZE]; SIZE]) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for [[u32; SIZE]; SIZE] {
    fn from(grid: Grid) -> Self {
        grid.0.map(|cells| cells.map(|cell| cell.unwrap_or(0)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, cells) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(formatter)?;
            }
            for cell in cells {
                match *cell {
                    Some(value) => write!(formatter, "{value:>5}")?,
                    None => write!(formatter, "{:>5}", ".")?,
                }
            }
        }
        Ok(())
    }
}

/// The outcome of pushing the tiles of a grid in one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift {
    /// The grid after the move, before any new tile is spawned.
    pub grid: Grid,
    /// The sum of the tiles created by merges during the move.
    pub score: u32,
}

impl Shift {
    /// This function tells whether the move left `before` exactly as it was. Such a move earns
    /// nothing and must not have any effect on the game.
    #[must_use]
    pub fn is_noop(&self, before: &Grid) -> bool {
        self.grid == *before
    }
}
