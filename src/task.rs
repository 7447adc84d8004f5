use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Board column a task sits in. Declaration order is the column order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Blocked,
    Done,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Todo,
        Status::InProgress,
        Status::Blocked,
        Status::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "TODO",
            Status::InProgress => "IN_PROGRESS",
            Status::Blocked => "BLOCKED",
            Status::Done => "DONE",
        }
    }

    /// Column heading.
    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "TODO",
            Status::InProgress => "IN PROGRESS",
            Status::Blocked => "BLOCKED",
            Status::Done => "DONE",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Status::Todo => 0,
            Status::InProgress => 1,
            Status::Blocked => 2,
            Status::Done => 3,
        }
    }

    /// Neighbouring column, clamped at both ends of the board.
    pub fn step(self, direction: isize) -> Status {
        let last = Self::ALL.len() as isize - 1;
        let index = (self.index() as isize + direction).clamp(0, last) as usize;
        Self::ALL[index]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BoardError::InvalidStatus(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Id of the owning project. Not checked against the catalog.
    pub project: String,
    pub status: Status,
}

impl Task {
    pub fn new(id: &str, title: &str, project: &str, status: Status) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            project: project.to_string(),
            status,
        }
    }
}

/// Tasks a fresh board starts with.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new("T1", "Worship Band", "YC26", Status::Todo),
        Task::new("T2", "Decor", "YC26", Status::InProgress),
        Task::new("T3", "2026 Locations", "RENDEZVOUS", Status::Blocked),
    ]
}
