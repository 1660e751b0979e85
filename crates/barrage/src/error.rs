//! Unified error type for Barrage.

use barrage_pool::PoolError;
use barrage_state::StateError;

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BarrageError {
    /// A pool could not produce a member.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// A state machine was wired or driven with a bad label.
    #[error(transparent)]
    State(#[from] StateError),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}
