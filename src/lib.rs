pub mod app;
pub mod config;
pub mod drag;
pub mod error;
pub mod kanban_board;
pub mod project;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{BoardError, Result};
