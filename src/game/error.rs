use thiserror::Error;

/// Rejected game configuration
///
/// Raised once, when an engine or session is built. Nothing during play is an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("grid {width}x{height} does not fit signed 32-bit coordinates")]
    GridTooLarge { width: usize, height: usize },

    #[error("food reward must be positive")]
    ZeroReward,

    #[error("{name} must be positive")]
    ZeroInterval { name: &'static str },

    #[error("minimum tick interval ({min_ms} ms) exceeds initial tick interval ({initial_ms} ms)")]
    FloorAboveInitial { min_ms: u64, initial_ms: u64 },
}
