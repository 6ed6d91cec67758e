use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The pipeline's capture and inference stages were already moved into
    /// their worker threads.
    #[error("pose pipeline already started")]
    PipelineStarted,

    #[error("activity has already run; re-entry is not supported")]
    AlreadyRan,

    #[error("activity has no scenes")]
    NoScenes,

    #[error("logger already started")]
    LoggerStarted,

    #[error("logger not started")]
    LoggerNotStarted,

    /// A frame's flattened length no longer matches the logger's table,
    /// whose column count is fixed by the first frame it received.
    #[error("pose frame width mismatch: expected {expected} columns, got {got}")]
    WidthMismatch { expected: usize, got: usize },

    #[error("camera error: {0}")]
    Camera(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("frontend error: {0}")]
    Frontend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
