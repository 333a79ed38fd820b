// width height / mines as y,x pairs / exit y x / start y x heading / moves...

use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use super::{
    board::{Board, BoardError, MineField},
    common::{Command, Direction, Position},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The configuration is incomplete")]
    NotReady,
    #[error("Inconsistent configuration: {0}")]
    Inconsistent(String),
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone)]
pub struct TrialConfig {
    board: Board,
    start: Position,
    moves: Vec<String>,
}

impl TrialConfig {
    pub fn new(board: Board, start: Position, moves: Vec<String>) -> Self {
        Self {
            board,
            start,
            moves,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn target(&self) -> Position {
        self.board.target()
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn add_moves(&mut self, moves: String) {
        self.moves.push(moves);
    }
}

impl FromStr for TrialConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut builder = ConfigBuilder::new();
        for line in s.lines() {
            builder.feed(line);
        }
        builder.build()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Section {
    #[default]
    Size,
    Mines,
    Target,
    Start,
    Moves,
}

impl Section {
    fn next(self) -> Self {
        match self {
            Section::Size => Section::Mines,
            Section::Mines => Section::Target,
            Section::Target => Section::Start,
            Section::Start | Section::Moves => Section::Moves,
        }
    }
}

/// Feeding never fails; problems surface from [`ConfigBuilder::build`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    section: Section,
    width: i32,
    height: i32,
    mines: Vec<Position>,
    target: Position,
    start: Position,
    moves: Vec<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, raw: &str) {
        let line = match sanitize(raw) {
            Some(line) => line,
            None => return,
        };

        let accepted = match self.section {
            Section::Size => self.parse_size(&line),
            Section::Mines => self.parse_mines(&line),
            Section::Target => self.parse_target(&line),
            Section::Start => self.parse_start(&line),
            Section::Moves => self.parse_moves(&line),
        };

        if accepted {
            self.section = self.section.next();
        } else {
            debug!("line {:?} rejected while reading {:?}", line, self.section);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.section == Section::Moves && !self.moves.is_empty()
    }

    /// Resets the builder on success.
    pub fn build(&mut self) -> Result<TrialConfig, ConfigError> {
        if !self.is_ready() {
            return Err(ConfigError::NotReady);
        }
        self.validate()?;

        let mut board = Board::new(self.width, self.height, self.target, MineField::new())?;
        for mine in &self.mines {
            board.add_mine(*mine)?;
        }

        let config = TrialConfig::new(board, self.start, std::mem::take(&mut self.moves));
        info!(
            "configuration ready: {}x{} board, {} mines, {} move lines",
            self.width,
            self.height,
            config.board().mines().len(),
            config.moves().len()
        );
        *self = Self::default();

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.height <= 0 {
            return Err(ConfigError::Inconsistent(format!(
                "Invalid board height {}",
                self.height
            )));
        }
        if self.width <= 0 {
            return Err(ConfigError::Inconsistent(format!(
                "Invalid board width {}",
                self.width
            )));
        }

        let mut problems = vec![];
        if !self.is_inside(&self.start) {
            problems.push(format!(
                "Starting position ({}, {}) is outside of the board {}x{}",
                self.start.x, self.start.y, self.width, self.height
            ));
        }
        if !self.is_inside(&self.target) {
            problems.push(format!(
                "Exit position ({}, {}) is outside of the board {}x{}",
                self.target.x, self.target.y, self.width, self.height
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Inconsistent(problems.join("; ")))
        }
    }

    fn is_inside(&self, position: &Position) -> bool {
        (0..self.height).contains(&position.x) && (0..self.width).contains(&position.y)
    }

    fn parse_size(&mut self, line: &str) -> bool {
        let parts: Vec<_> = line.split(' ').collect();
        match parse_pair(&parts) {
            Some((width, height)) => {
                self.width = width;
                self.height = height;
                true
            }
            None => false,
        }
    }

    fn parse_mines(&mut self, line: &str) -> bool {
        for pair in line.split(' ') {
            let parts: Vec<_> = pair.split(',').collect();
            // a broken pair does not spoil the whole line
            if let Some((y, x)) = parse_pair(&parts) {
                self.mines.push(Position::new(x, y));
            }
        }
        !self.mines.is_empty()
    }

    fn parse_target(&mut self, line: &str) -> bool {
        let parts: Vec<_> = line.split(' ').collect();
        match parse_pair(&parts) {
            Some((y, x)) => {
                self.target = Position::new(x, y);
                true
            }
            None => false,
        }
    }

    fn parse_start(&mut self, line: &str) -> bool {
        let parts: Vec<_> = line.split(' ').collect();
        if parts.len() < 3 {
            return false;
        }
        let heading = match single_char(parts[2]).and_then(Direction::from_symbol) {
            Some(heading) => heading,
            None => return false,
        };
        match parse_pair(&parts[..2]) {
            Some((y, x)) => {
                self.start = Position::with_heading(x, y, heading);
                true
            }
            None => false,
        }
    }

    fn parse_moves(&mut self, line: &str) -> bool {
        let is_move = |c: char| {
            c == Command::ADVANCE || c == Command::TURN_LEFT || c == Command::TURN_RIGHT
        };
        if !line.chars().any(is_move) {
            return false;
        }
        self.moves
            .push(line.chars().filter(|c| !c.is_whitespace()).collect());
        true
    }
}

fn parse_pair(parts: &[&str]) -> Option<(i32, i32)> {
    match parts {
        [a, b, ..] => Some((parse_coordinate(a)?, parse_coordinate(b)?)),
        _ => None,
    }
}

fn parse_coordinate(s: &str) -> Option<i32> {
    let value: u32 = s.parse().ok()?;
    i32::try_from(value).ok()
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn sanitize(raw: &str) -> Option<String> {
    let line = raw.trim().trim_matches(',').trim();
    let meaningful =
        |c: char| c.is_ascii_digit() || c == ',' || "RLMNSEW".contains(c.to_ascii_uppercase());
    if line.is_empty() || !line.chars().any(meaningful) {
        return None;
    }

    let line = line
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let line = line
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    Some(line)
}
