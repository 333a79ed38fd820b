use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use thiserror::Error;
use tracing::debug;

use super::avoidance::{BounceStrategy, BoundaryAvoidance, ClipStrategy, TurnLeftStrategy};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum StrategyKind {
    Clip,
    Bounce,
    TurnLeft,
    /// Only available through a caller-supplied factory.
    Custom,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Clip,
        StrategyKind::Bounce,
        StrategyKind::TurnLeft,
        StrategyKind::Custom,
    ];
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvoidanceError {
    #[error("Strategy {0:?} is not supported")]
    Unsupported(StrategyKind),
}

pub type SharedStrategy = Arc<dyn BoundaryAvoidance>;

/// Each kind is built at most once and shared afterwards.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: RwLock<HashMap<StrategyKind, SharedStrategy>>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategies = self
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("StrategyRegistry")
            .field("cached", &strategies.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StrategyKind) -> Result<SharedStrategy, AvoidanceError> {
        self.get_or_create(kind, None::<fn() -> SharedStrategy>)
    }

    /// Like [`StrategyRegistry::get`], but an uncached kind is built by `factory`.
    ///
    /// `Custom` always needs a factory, even when an instance is cached.
    pub fn get_or_create<F>(
        &self,
        kind: StrategyKind,
        factory: Option<F>,
    ) -> Result<SharedStrategy, AvoidanceError>
    where
        F: FnOnce() -> SharedStrategy,
    {
        if kind == StrategyKind::Custom && factory.is_none() {
            return Err(AvoidanceError::Unsupported(kind));
        }

        if let Some(strategy) = self.cached(kind) {
            return Ok(strategy);
        }

        let created = match factory {
            Some(factory) => factory(),
            None => Self::builtin(kind)?,
        };

        let mut strategies = self
            .strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // another thread may have won the race in between
        let strategy = strategies.entry(kind).or_insert_with(|| {
            debug!("boundary strategy {:?} registered", kind);
            created
        });

        Ok(Arc::clone(strategy))
    }

    pub fn is_cached(&self, kind: StrategyKind) -> bool {
        self.cached(kind).is_some()
    }

    fn cached(&self, kind: StrategyKind) -> Option<SharedStrategy> {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    fn builtin(kind: StrategyKind) -> Result<SharedStrategy, AvoidanceError> {
        match kind {
            StrategyKind::Clip => Ok(Arc::new(ClipStrategy)),
            StrategyKind::Bounce => Ok(Arc::new(BounceStrategy)),
            StrategyKind::TurnLeft => Ok(Arc::new(TurnLeftStrategy)),
            StrategyKind::Custom => Err(AvoidanceError::Unsupported(kind)),
        }
    }
}
