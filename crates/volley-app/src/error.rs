use thiserror::Error;

use volley_core::error::ConfigError;

/// Errors surfaced by the runner's control surface.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,

    #[error("simulation not started")]
    NotStarted,

    /// The game loop thread is gone.
    #[error("game loop channel closed")]
    ChannelClosed,

    #[error("shared state lock poisoned")]
    LockPoisoned,

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
