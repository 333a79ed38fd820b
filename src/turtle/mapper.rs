use tracing::debug;

use super::{
    avoidance::{BoundaryAvoidance, Turn},
    board::Board,
    common::{Command, Direction, Displacement, Position},
};

/// Clockwise quarter turns from the North-based frame to the board frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rotation {
    quarter_turns: u8,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation { quarter_turns: 0 };

    pub fn from_heading(heading: Direction) -> Self {
        Self::IDENTITY.then(Turn::from_signal(heading))
    }

    pub fn quarter_turns(&self) -> u8 {
        self.quarter_turns
    }

    pub fn then(self, turn: Turn) -> Self {
        Self {
            quarter_turns: (self.quarter_turns + turn.quarter_turns()) % 4,
        }
    }

    pub fn apply(&self, step: Displacement) -> Displacement {
        match self.quarter_turns {
            0 => step,
            1 => step.rotate_right(),
            2 => step.rotate_right().rotate_right(),
            _ => step.rotate_left(),
        }
    }
}

#[derive(Debug)]
pub struct RelativePath<I> {
    commands: I,
    current: Displacement,
}

impl<I> Iterator for RelativePath<I>
where
    I: Iterator<Item = Command>,
{
    type Item = Displacement;

    fn next(&mut self) -> Option<Self::Item> {
        for command in self.commands.by_ref() {
            match command {
                Command::TurnRight => self.current = self.current.rotate_right(),
                Command::TurnLeft => self.current = self.current.rotate_left(),
                Command::Advance => return Some(self.current),
                Command::Skip => {}
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.commands.size_hint().1)
    }
}

/// One unit displacement per advance. Callers pass [`Direction::North`] as `origin`.
pub fn map_relative<I>(commands: I, origin: Direction) -> RelativePath<I::IntoIter>
where
    I: IntoIterator<Item = Command>,
{
    RelativePath {
        commands: commands.into_iter(),
        current: origin,
    }
}

pub struct AbsolutePath<'a, I> {
    steps: RelativePath<I>,
    position: Position,
    rotation: Rotation,
    started: bool,
    avoidance: Option<(&'a dyn BoundaryAvoidance, &'a Board)>,
}

impl<'a, I> AbsolutePath<'a, I> {
    pub fn avoiding<'b>(
        self,
        strategy: &'b dyn BoundaryAvoidance,
        board: &'b Board,
    ) -> AbsolutePath<'b, I> {
        AbsolutePath {
            steps: self.steps,
            position: self.position,
            rotation: self.rotation,
            started: self.started,
            avoidance: Some((strategy, board)),
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}

impl<I> Iterator for AbsolutePath<'_, I>
where
    I: Iterator<Item = Command>,
{
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(self.position);
        }

        let step = self.rotation.apply(self.steps.next()?);
        let candidate = self.position.moved(step);

        self.position = match self.avoidance {
            None => candidate,
            Some((strategy, board)) => {
                let correction = strategy.fix(candidate, board);
                if correction.position != candidate || correction.turn != Turn::Keep {
                    debug!(
                        "boundary hit at {:?}, moved to {:?}, turn {:?}",
                        candidate.point(),
                        correction.position.point(),
                        correction.turn
                    );
                }
                self.rotation = self.rotation.then(correction.turn);
                Position::with_heading(
                    correction.position.x,
                    correction.position.y,
                    correction_heading(step, correction.turn),
                )
            }
        };

        Some(self.position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let first = usize::from(!self.started);
        let (_, upper) = self.steps.size_hint();
        (first, upper.and_then(|u| u.checked_add(first)))
    }
}

fn correction_heading(step: Displacement, turn: Turn) -> Direction {
    Rotation::IDENTITY.then(turn).apply(step)
}

/// The first item is always `start`. Without a strategy positions may leave the board.
pub fn map_absolute<I>(commands: I, start: Position) -> AbsolutePath<'static, I::IntoIter>
where
    I: IntoIterator<Item = Command>,
{
    AbsolutePath {
        steps: map_relative(commands, Direction::North),
        position: start,
        rotation: Rotation::from_heading(start.heading),
        started: false,
        avoidance: None,
    }
}

#[cfg(test)]
mod tests {
    use crate::turtle::{
        avoidance::{
            BounceStrategy, BoundaryAvoidance, ClipStrategy, Correction, Signalled, Turn,
            TurnLeftStrategy,
        },
        board::{Board, MineField},
        common::{Command, Direction, Position},
        path_gen::generate_path,
        tokenizer::tokenize,
    };

    use super::{map_absolute, map_relative, Rotation};

    #[test]
    fn test_rotation_tag_composition() {
        let r = Rotation::IDENTITY;
        assert_eq!(r.then(Turn::Right), Rotation::from_heading(Direction::East));
        assert_eq!(
            r.then(Turn::Right).then(Turn::Right),
            Rotation::from_heading(Direction::South)
        );
        assert_eq!(
            Rotation::from_heading(Direction::South).then(Turn::Right),
            Rotation::from_heading(Direction::West)
        );
        assert_eq!(
            Rotation::from_heading(Direction::West).then(Turn::Right),
            Rotation::IDENTITY
        );
        assert_eq!(
            Rotation::from_heading(Direction::East).then(Turn::Left),
            Rotation::IDENTITY
        );
        assert_eq!(r.then(Turn::Left), Rotation::from_heading(Direction::West));
        assert_eq!(
            Rotation::from_heading(Direction::South).then(Turn::Keep),
            Rotation::from_heading(Direction::South)
        );
        assert_eq!(Rotation::from_heading(Direction::Void), Rotation::IDENTITY);
    }

    #[test]
    fn test_rotation_takes_north_to_heading() {
        for heading in Direction::ALL {
            assert_eq!(Rotation::from_heading(heading).apply(Direction::North), heading);
        }
    }

    #[test]
    fn test_relative_mapper_final_heading() {
        let cases = [
            (Direction::North, "MMMMMM"),
            (Direction::East, "MRMMLRLR"),
            (Direction::South, "LMMLM"),
            (Direction::West, "MRMRMMRMM"),
        ];
        for (expected, path) in cases {
            let last = map_relative(tokenize(path), Direction::North).last();
            assert_eq!(last, Some(expected), "path {}", path);
        }
    }

    #[test]
    fn test_relative_mapper_counts_advances() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..20 {
            let path = generate_path(&mut rng, 20);
            let trimmed = path.trim_end_matches(['L', 'R']);
            let advances = trimmed.chars().filter(|c| *c == 'M').count();
            assert_eq!(
                map_relative(tokenize(&path), Direction::North).count(),
                advances
            );
        }
    }

    #[test]
    fn test_relative_mapper_accepts_empty_data() {
        assert_eq!(map_relative(tokenize(""), Direction::North).count(), 0);
        assert_eq!(
            map_relative(tokenize("LLLRRRLRLR"), Direction::North).count(),
            0
        );
        // rotations alone never yield, even when not trimmed
        let turns = [Command::TurnLeft, Command::TurnRight, Command::Skip];
        assert_eq!(map_relative(turns, Direction::North).count(), 0);
    }

    #[test]
    fn test_absolute_mapper() {
        let path = "MMLMMLMRMLLM";
        let start = Position::with_heading(0, 0, Direction::South);
        let trace: Vec<_> = map_absolute(tokenize(path), start)
            .map(|p| p.point())
            .collect();
        assert_eq!(
            trace,
            vec![
                // two steps to the south
                (0, 0),
                (1, 0),
                (2, 0),
                // two steps to the east
                (2, 1),
                (2, 2),
                // north, east, west
                (1, 2),
                (1, 3),
                (1, 2)
            ]
        );
    }

    #[test]
    fn test_absolute_mapper_with_clip() {
        let board = create_board(10, 10);
        let start = Position::with_heading(0, 0, Direction::South);
        let trace: Vec<_> = map_absolute(tokenize("MMLMMLMRMLLM"), start)
            .avoiding(&ClipStrategy, &board)
            .map(|p| p.point())
            .collect();
        assert_eq!(
            trace,
            vec![
                (0, 0),
                (1, 0),
                (2, 0),
                (2, 1),
                (2, 2),
                (1, 2),
                (1, 3),
                (1, 2)
            ]
        );
    }

    #[test]
    fn test_absolute_mapper_with_bounce() {
        let board = create_board(10, 10);
        let start = Position::with_heading(8, 0, Direction::South);
        let trace: Vec<_> = map_absolute(tokenize("MMLMMLMRMLLM"), start)
            .avoiding(&BounceStrategy, &board)
            .map(|p| p.point())
            .collect();
        // (10, 0) is off the board and rebounds to (8, 0) instead of stopping at (9, 0)
        assert_eq!(&trace[..3], &[(8, 0), (9, 0), (8, 0)]);
        assert_eq!(trace.len(), 8);
        assert!(trace.iter().all(|&(x, y)| (0..10).contains(&x) && (0..10).contains(&y)));
    }

    #[test]
    fn test_absolute_mapper_hits_mine_in_scenario() {
        let mut mines = MineField::new();
        for (x, y) in [(1, 1), (1, 3), (3, 3)] {
            mines.set_mine(Position::new(x, y));
        }
        let board = Board::new(5, 4, Position::new(2, 4), mines).unwrap();
        let start = Position::with_heading(1, 0, Direction::North);
        let trace: Vec<_> = map_absolute(tokenize("RMLMM"), start)
            .avoiding(&ClipStrategy, &board)
            .collect();

        assert_eq!(trace[0], Position::new(1, 0));
        assert_eq!(trace[1], Position::new(1, 1));
        assert_eq!(board.has_mine(&trace[1]), Ok(true));
        // the mapper itself keeps going
        assert_eq!(trace.len(), 4);
        assert_eq!(trace[2], Position::new(0, 1));
        assert_eq!(trace[3], Position::new(0, 1));
    }

    #[test]
    fn test_absolute_mapper_with_turn_left() {
        let board = create_board(3, 3);
        let start = Position::with_heading(0, 0, Direction::North);
        let mut path = map_absolute(tokenize("MMM"), start).avoiding(&TurnLeftStrategy, &board);

        assert_eq!(path.next(), Some(Position::new(0, 0)));
        // north is off the board: stay and turn to face west
        let bumped = path.next().unwrap();
        assert_eq!(bumped, Position::new(0, 0));
        assert_eq!(bumped.heading, Direction::West);
        assert_eq!(path.rotation(), Rotation::from_heading(Direction::West));
        // west is off the board as well: turn again, now facing south
        assert_eq!(path.next(), Some(Position::new(0, 0)));
        assert_eq!(path.rotation(), Rotation::from_heading(Direction::South));
        assert_eq!(path.next(), Some(Position::new(1, 0)));
        assert_eq!(path.next(), None);
    }

    #[test]
    fn test_custom_turn_applies_to_following_steps() {
        let board = create_board(10, 10);
        // a strategy that requests a U-turn once the turtle reaches row 2
        let u_turn = |p: Position, _: &Board| {
            if p.x == 2 {
                Correction {
                    position: p,
                    turn: Turn::Around,
                }
            } else {
                Correction::keep(p)
            }
        };
        let start = Position::with_heading(0, 5, Direction::South);
        let trace: Vec<_> = map_absolute(tokenize("MMMM"), start)
            .avoiding(&u_turn as &dyn BoundaryAvoidance, &board)
            .map(|p| p.point())
            .collect();
        assert_eq!(trace, vec![(0, 5), (1, 5), (2, 5), (1, 5), (0, 5)]);
    }

    #[test]
    fn test_heading_signalled_strategy_turns_the_turtle() {
        let board = create_board(10, 10);
        let u_turn = Signalled(|p: Position, _: &Board| {
            if p.x == 2 {
                Position::with_heading(p.x, p.y, Direction::South)
            } else {
                Position::new(p.x, p.y)
            }
        });
        let start = Position::with_heading(0, 5, Direction::South);
        let trace: Vec<_> = map_absolute(tokenize("MMMM"), start)
            .avoiding(&u_turn, &board)
            .map(|p| p.point())
            .collect();
        assert_eq!(trace, vec![(0, 5), (1, 5), (2, 5), (1, 5), (0, 5)]);
    }

    #[test]
    fn test_far_off_start_is_clipped_back() {
        let board = create_board(10, 10);
        for start in [
            Position::with_heading(i32::MAX, 0, Direction::South),
            Position::with_heading(0, i32::MIN, Direction::West),
        ] {
            let trace: Vec<_> = map_absolute(tokenize("M"), start)
                .avoiding(&ClipStrategy, &board)
                .collect();
            assert_eq!(trace.len(), 2);
            assert_eq!(trace[0], start);
        }

        let start = Position::with_heading(i32::MAX, 0, Direction::South);
        let mut path = map_absolute(tokenize("M"), start).avoiding(&ClipStrategy, &board);
        path.next();
        assert_eq!(path.next(), Some(Position::new(9, 0)));
    }

    #[test]
    fn test_without_strategy_positions_may_leave_the_board() {
        let start = Position::with_heading(0, 0, Direction::West);
        let trace: Vec<_> = map_absolute(tokenize("MM"), start).collect();
        assert_eq!(trace, vec![Position::new(0, 0), Position::new(0, -1), Position::new(0, -2)]);
    }

    #[test]
    fn test_empty_path_yields_start_only() {
        let start = Position::with_heading(3, 3, Direction::East);
        let trace: Vec<_> = map_absolute(tokenize("RRL"), start).collect();
        assert_eq!(trace, vec![start]);
    }

    #[test]
    fn test_absolute_length_is_advances_plus_one() {
        let board = create_board(4, 6);
        let mut rng = fastrand::Rng::with_seed(7);
        for heading in Direction::ALL {
            let path = generate_path(&mut rng, 50);
            let advances = map_relative(tokenize(&path), Direction::North).count();
            let start = Position::with_heading(2, 2, heading);
            let trace: Vec<_> = map_absolute(tokenize(&path), start)
                .avoiding(&TurnLeftStrategy, &board)
                .collect();
            assert_eq!(trace.len(), advances + 1);
            assert_eq!(trace[0], start);
            assert!(trace.iter().all(|p| board.contains(p)));
        }
    }

    fn create_board(width: i32, height: i32) -> Board {
        Board::new(width, height, Position::new(0, 0), MineField::new()).unwrap()
    }
}
