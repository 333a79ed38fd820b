use std::fmt;

use tracing::{debug, info, warn};

use crate::turtle::{
    map_absolute, strict_command, tokenize, tokenize_with, until_error, Command, Position,
    SharedStrategy, TokenError, TrialConfig,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    MineHit(Position),
    /// The boundary strategy let the turtle off the board.
    OutOfBounds(Position),
    StillInDanger,
    /// Strict mode only.
    Rejected(TokenError),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::MineHit(_) => write!(f, "Mine Hit"),
            Outcome::OutOfBounds(p) => write!(f, "Out of Bounds at ({}, {})", p.x, p.y),
            Outcome::StillInDanger => write!(f, "Still in Danger"),
            Outcome::Rejected(error) => write!(f, "Rejected: {}", error),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialSummary {
    pub outcomes: Vec<Outcome>,
    pub mines_hit: usize,
    pub exits_reached: usize,
}

pub struct TrialRunner<'a> {
    config: &'a TrialConfig,
    strategy: SharedStrategy,
    strict: bool,
    verbose: bool,
}

impl<'a> TrialRunner<'a> {
    pub fn new(config: &'a TrialConfig, strategy: SharedStrategy) -> Self {
        Self {
            config,
            strategy,
            strict: false,
            verbose: false,
        }
    }

    /// Unknown symbols end the command string instead of being skipped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn run<R>(&self, mut reporter: R) -> TrialSummary
    where
        R: FnMut(&str),
    {
        let mut summary = TrialSummary::default();

        for (index, moves) in self.config.moves().iter().enumerate() {
            let movement = index + 1;
            if self.verbose {
                reporter(&format!("Start of movement {} processing", movement));
            }

            let outcome = self.run_one(movement, moves, &mut reporter);
            info!("movement {} ({:?}): {}", movement, moves, outcome);

            match outcome {
                Outcome::Success => summary.exits_reached += 1,
                Outcome::MineHit(_) => summary.mines_hit += 1,
                Outcome::OutOfBounds(_) | Outcome::Rejected(_) => {
                    warn!("movement {} aborted: {}", movement, outcome)
                }
                Outcome::StillInDanger => {}
            }

            reporter(&format!("Movement {}: {}", movement, outcome));
            summary.outcomes.push(outcome);
        }

        reporter(&format!(
            "Completed {} movements. Mines hit: {}, exits reached: {}",
            summary.outcomes.len(),
            summary.mines_hit,
            summary.exits_reached
        ));

        summary
    }

    fn run_one<R>(&self, movement: usize, moves: &str, reporter: &mut R) -> Outcome
    where
        R: FnMut(&str),
    {
        if !self.strict {
            return self.walk(tokenize(moves), movement, reporter);
        }

        let mut error = None;
        let outcome = self.walk(
            until_error(tokenize_with(moves, strict_command), &mut error),
            movement,
            reporter,
        );
        match (outcome, error) {
            (Outcome::StillInDanger, Some(error)) => Outcome::Rejected(error),
            (outcome, _) => outcome,
        }
    }

    /// Pulls positions until something happens to the turtle.
    fn walk<I, R>(&self, commands: I, movement: usize, reporter: &mut R) -> Outcome
    where
        I: Iterator<Item = Command>,
        R: FnMut(&str),
    {
        let board = self.config.board();
        let trajectory =
            map_absolute(commands, self.config.start()).avoiding(&*self.strategy, board);

        for position in trajectory {
            debug!("movement {} at {:?}", movement, position.point());
            if self.verbose {
                reporter(&format!(
                    "Movement {}: at ({}, {}).",
                    movement, position.x, position.y
                ));
            }

            match board.has_mine(&position) {
                Err(_) => return Outcome::OutOfBounds(position),
                Ok(true) => return Outcome::MineHit(position),
                Ok(false) => {}
            }

            if position == board.target() {
                return Outcome::Success;
            }

            if self.verbose {
                reporter(&format!("Movement {}: so far so good.", movement));
            }
        }

        Outcome::StillInDanger
    }
}
