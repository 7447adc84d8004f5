use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("invalid status '{0}': expected one of TODO, IN_PROGRESS, BLOCKED, DONE")]
    InvalidStatus(String),

    #[error("stdout is not a terminal: the dashboard needs an interactive terminal")]
    NotATerminal,

    #[error("drag-and-drop unavailable: terminal refused mouse capture ({0})")]
    DragDropUnavailable(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;
