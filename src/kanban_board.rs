use crate::drag::DropResult;
use crate::task::{Status, Task};

/// What a finished drag did to the task collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released outside every column.
    Cancelled,
    /// Dropped back onto the column it came from.
    Unchanged { id: String, status: Status },
    Moved { id: String, from: Status, to: Status },
    /// No task carries the dragged id.
    Unknown { id: String },
}

/// Applies the end of a drag to `tasks`.
///
/// Returns the replacement collection whenever the drop landed on a column
/// and matched a task, including same-column drops. Only `status` changes;
/// positions are never recorded.
pub fn apply_drop(tasks: &[Task], result: &DropResult) -> (DropOutcome, Option<Vec<Task>>) {
    let Some(destination) = result.destination else {
        return (DropOutcome::Cancelled, None);
    };
    let id = result.draggable_id.clone();
    let Some(from) = tasks.iter().find(|t| t.id == id).map(|t| t.status) else {
        return (DropOutcome::Unknown { id }, None);
    };
    let to = destination.droppable_id;

    let next = tasks
        .iter()
        .map(|t| {
            if t.id == id {
                Task { status: to, ..t.clone() }
            } else {
                t.clone()
            }
        })
        .collect();

    let outcome = if from == to {
        DropOutcome::Unchanged { id, status: to }
    } else {
        DropOutcome::Moved { id, from, to }
    };
    (outcome, Some(next))
}

/// Tasks in one column, in collection order.
pub fn tasks_by_status(tasks: &[Task], status: Status) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Keyboard cursor over the board.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KanbanBoard {
    pub selected_status: Status,
    pub selected_task: usize,
}

impl KanbanBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_column(&mut self, direction: isize, tasks: &[Task]) {
        self.selected_status = self.selected_status.step(direction);
        self.clamp(tasks);
    }

    pub fn move_task(&mut self, direction: isize, tasks: &[Task]) {
        let count = tasks_by_status(tasks, self.selected_status).len();
        if count == 0 {
            self.selected_task = 0;
            return;
        }
        let last = count as isize - 1;
        self.selected_task = (self.selected_task as isize + direction).clamp(0, last) as usize;
    }

    /// Points the cursor at a task, wherever it currently sits.
    pub fn select(&mut self, id: &str, tasks: &[Task]) {
        let Some(task) = tasks.iter().find(|t| t.id == id) else {
            return;
        };
        self.selected_status = task.status;
        self.selected_task = tasks_by_status(tasks, task.status)
            .iter()
            .position(|t| t.id == id)
            .unwrap_or(0);
    }

    /// Keeps the row index inside the selected column after the column
    /// shrinks.
    pub fn clamp(&mut self, tasks: &[Task]) {
        let count = tasks_by_status(tasks, self.selected_status).len();
        self.selected_task = self.selected_task.min(count.saturating_sub(1));
    }

    pub fn selected<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        tasks_by_status(tasks, self.selected_status)
            .get(self.selected_task)
            .copied()
    }
}
