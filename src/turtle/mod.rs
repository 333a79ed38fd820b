mod avoidance;
mod board;
mod common;
mod config;
mod mapper;
mod path_gen;
mod registry;
mod tokenizer;

pub use avoidance::{
    BounceStrategy, BoundaryAvoidance, ClipStrategy, Correction, Signalled, Turn,
    TurnLeftStrategy,
};
pub use board::{Board, BoardError, MineField};
pub use common::{Command, Direction, Displacement, Position};
pub use config::{ConfigBuilder, ConfigError, TrialConfig};
pub use mapper::{map_absolute, map_relative, AbsolutePath, RelativePath, Rotation};
pub use path_gen::generate_path;
pub use registry::{AvoidanceError, SharedStrategy, StrategyKind, StrategyRegistry};
pub use tokenizer::{
    strict_command, tokenize, tokenize_with, until_error, TokenError, Tokens, TokensWith,
};
