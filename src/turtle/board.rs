use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::common::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board width should be greater than zero, got {0}")]
    InvalidWidth(i32),
    #[error("Board height should be greater than zero, got {0}")]
    InvalidHeight(i32),
    #[error("Position {0:?} is outside of the board")]
    OutOfBounds(Position),
}

/// Mine storage. Mines can be planted but never removed.
#[derive(Debug, Default, Clone)]
pub struct MineField {
    mines: HashSet<Position>,
}

impl MineField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mine(&mut self, position: Position) {
        // duplicates are fine
        self.mines.insert(position);
    }

    pub fn has_mine(&self, position: &Position) -> bool {
        self.mines.contains(position)
    }

    pub fn len(&self) -> usize {
        self.mines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mines.is_empty()
    }
}

/// `x` runs over the height, `y` over the width.
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    target: Position,
    mines: MineField,
}

impl Board {
    pub fn new(
        width: i32,
        height: i32,
        target: Position,
        mines: MineField,
    ) -> Result<Self, BoardError> {
        if width <= 0 {
            return Err(BoardError::InvalidWidth(width));
        }
        if height <= 0 {
            return Err(BoardError::InvalidHeight(height));
        }

        let board = Self {
            width,
            height,
            target,
            mines,
        };
        board.check(&target)?;

        Ok(board)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn mines(&self) -> &MineField {
        &self.mines
    }

    pub fn contains(&self, position: &Position) -> bool {
        (0..self.height).contains(&position.x) && (0..self.width).contains(&position.y)
    }

    pub fn has_mine(&self, position: &Position) -> Result<bool, BoardError> {
        self.check(position)?;
        Ok(self.mines.has_mine(position))
    }

    pub fn add_mine(&mut self, position: Position) -> Result<(), BoardError> {
        self.check(&position)?;
        debug!("mine planted at {:?}", position.point());
        self.mines.set_mine(position);
        Ok(())
    }

    fn check(&self, position: &Position) -> Result<(), BoardError> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds(*position))
        }
    }
}
