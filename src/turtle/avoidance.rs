use super::{
    board::Board,
    common::{Direction, Position},
};

/// Heading change requested by a strategy, relative to the current course.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub enum Turn {
    #[default]
    Keep,
    Right,
    Around,
    Left,
}

impl Turn {
    /// Clockwise quarter turns, in `0..4`.
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Turn::Keep => 0,
            Turn::Right => 1,
            Turn::Around => 2,
            Turn::Left => 3,
        }
    }

    /// Decodes a turn written as "where North would end up".
    pub fn from_signal(signal: Direction) -> Self {
        match signal {
            Direction::Void | Direction::North => Turn::Keep,
            Direction::East => Turn::Right,
            Direction::South => Turn::Around,
            Direction::West => Turn::Left,
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    pub position: Position,
    pub turn: Turn,
}

impl Correction {
    pub fn keep(position: Position) -> Self {
        Self {
            position,
            turn: Turn::Keep,
        }
    }

    pub fn from_signalled(position: Position) -> Self {
        Self {
            position,
            turn: Turn::from_signal(position.heading),
        }
    }
}

/// Implementations are shared across threads and must not keep mutable state.
pub trait BoundaryAvoidance: Send + Sync {
    fn fix(&self, position: Position, board: &Board) -> Correction;
}

impl<F> BoundaryAvoidance for F
where
    F: Fn(Position, &Board) -> Correction + Send + Sync,
{
    fn fix(&self, position: Position, board: &Board) -> Correction {
        self(position, board)
    }
}

/// Wraps a strategy that answers with a bare position and encodes its turn
/// request in the heading.
#[derive(Debug, Clone, Copy)]
pub struct Signalled<F>(pub F);

impl<F> BoundaryAvoidance for Signalled<F>
where
    F: Fn(Position, &Board) -> Position + Send + Sync,
{
    fn fix(&self, position: Position, board: &Board) -> Correction {
        Correction::from_signalled((self.0)(position, board))
    }
}

fn clip(value: i32, max: i32) -> i32 {
    value.clamp(0, max)
}

fn bounce(value: i32, max: i32) -> i32 {
    let value = if value > max {
        // one step to reach the wall, one more for the rebound
        value - 2
    } else if value < 0 {
        1
    } else {
        value
    };
    clip(value, max)
}

fn is_outside(position: &Position, board: &Board) -> bool {
    position.x < 0 || position.x >= board.height() || position.y < 0 || position.y >= board.width()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClipStrategy;

impl BoundaryAvoidance for ClipStrategy {
    fn fix(&self, position: Position, board: &Board) -> Correction {
        Correction::keep(Position {
            x: clip(position.x, board.height() - 1),
            y: clip(position.y, board.width() - 1),
            ..position
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BounceStrategy;

impl BoundaryAvoidance for BounceStrategy {
    fn fix(&self, position: Position, board: &Board) -> Correction {
        Correction::keep(Position {
            x: bounce(position.x, board.height() - 1),
            y: bounce(position.y, board.width() - 1),
            ..position
        })
    }
}

/// Clips, then turns left after a collision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnLeftStrategy;

impl BoundaryAvoidance for TurnLeftStrategy {
    fn fix(&self, position: Position, board: &Board) -> Correction {
        let turn = if is_outside(&position, board) {
            Turn::Left
        } else {
            Turn::Keep
        };

        Correction {
            position: ClipStrategy.fix(position, board).position,
            turn,
        }
    }
}
