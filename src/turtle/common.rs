use std::hash::{Hash, Hasher};

/// `x` grows southwards, `y` eastwards. `Void` never moves anything.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
    #[default]
    Void,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn vector(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::Void => (0, 0),
        }
    }

    pub fn rotate_right(&self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::Void => Direction::Void,
        }
    }

    pub fn rotate_left(&self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
            Direction::Void => Direction::Void,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }
}

pub type Displacement = Direction;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Command {
    TurnLeft,
    TurnRight,
    Advance,
    /// Placeholder for a symbol the converter did not recognise.
    Skip,
}

impl Command {
    pub const TURN_LEFT: char = 'L';
    pub const TURN_RIGHT: char = 'R';
    pub const ADVANCE: char = 'M';

    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            Self::TURN_LEFT => Command::TurnLeft,
            Self::TURN_RIGHT => Command::TurnRight,
            Self::ADVANCE => Command::Advance,
            _ => Command::Skip,
        }
    }

    pub fn is_rotation_symbol(symbol: char) -> bool {
        symbol == Self::TURN_LEFT || symbol == Self::TURN_RIGHT
    }
}

/// Equality and hashing ignore the heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub heading: Direction,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            heading: Direction::Void,
        }
    }

    pub fn with_heading(x: i32, y: i32, heading: Direction) -> Self {
        Self { x, y, heading }
    }

    pub fn point(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn moved(&self, step: Displacement) -> Self {
        let (dx, dy) = step.vector();
        // saturate so far-off positions still reach the strategy
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            heading: step,
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.point() == other.point()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.point().hash(state);
    }
}
