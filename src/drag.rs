//! Drag-and-drop primitive for the board.
//!
//! Cards are draggables identified by task id, columns are droppables
//! identified by their [`Status`]. A gesture ends in a [`DropResult`]
//! whose destination is `None` when the card was released outside every
//! column or the drag was cancelled.

use crate::task::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub droppable_id: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub draggable_id: String,
    pub destination: Option<Destination>,
}

impl DropResult {
    pub fn onto(draggable_id: &str, droppable_id: Status) -> Self {
        Self {
            draggable_id: draggable_id.to_string(),
            destination: Some(Destination { droppable_id }),
        }
    }

    pub fn cancelled(draggable_id: &str) -> Self {
        Self {
            draggable_id: draggable_id.to_string(),
            destination: None,
        }
    }
}

/// Input device that started a gesture. Only that device may move or
/// release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    Mouse,
    Keyboard,
}

/// A card in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    pub draggable_id: String,
    pub source: Status,
    /// Column currently under the card, if any.
    pub over: Option<Status>,
    pub origin: DragOrigin,
}

/// Tracks the single gesture that may be in flight.
///
/// Only a [`TerminalSession`](crate::ui::TerminalSession) with mouse capture
/// hands one out:
///
/// ```compile_fail
/// let drag = ministry_board::drag::DragController::new();
/// ```
#[derive(Debug)]
pub struct DragController {
    active: Option<DragGesture>,
}

impl DragController {
    pub(crate) fn new() -> Self {
        Self { active: None }
    }

    pub fn active(&self) -> Option<&DragGesture> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_dragging_with(&self, origin: DragOrigin) -> bool {
        self.active.as_ref().is_some_and(|g| g.origin == origin)
    }

    /// Starts a gesture over its source column. Returns false and keeps the
    /// current gesture if one is already in flight.
    pub fn pick_up(&mut self, draggable_id: &str, source: Status, origin: DragOrigin) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(DragGesture {
            draggable_id: draggable_id.to_string(),
            source,
            over: Some(source),
            origin,
        });
        true
    }

    pub fn hover(&mut self, over: Option<Status>) {
        if let Some(gesture) = self.active.as_mut() {
            gesture.over = over;
        }
    }

    /// Moves the hover target one column left or right. A card hovering
    /// nowhere re-enters at its source column.
    pub fn step(&mut self, direction: isize) {
        if let Some(gesture) = self.active.as_mut() {
            let from = gesture.over.unwrap_or(gesture.source);
            gesture.over = Some(from.step(direction));
        }
    }

    /// Releases the card over whatever it is hovering.
    pub fn drop(&mut self) -> Option<DropResult> {
        self.active.take().map(|gesture| DropResult {
            draggable_id: gesture.draggable_id,
            destination: gesture.over.map(|droppable_id| Destination { droppable_id }),
        })
    }

    pub fn cancel(&mut self) -> Option<DropResult> {
        self.active
            .take()
            .map(|gesture| DropResult::cancelled(&gesture.draggable_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_reports_hovered_column() {
        let mut drag = DragController::new();
        assert!(drag.pick_up("T3", Status::Blocked, DragOrigin::Keyboard));
        drag.hover(Some(Status::Done));
        assert_eq!(drag.drop(), Some(DropResult::onto("T3", Status::Done)));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn drop_outside_columns_has_no_destination() {
        let mut drag = DragController::new();
        drag.pick_up("T1", Status::Todo, DragOrigin::Keyboard);
        drag.hover(None);
        assert_eq!(drag.drop(), Some(DropResult::cancelled("T1")));
    }

    #[test]
    fn drop_without_moving_targets_source() {
        let mut drag = DragController::new();
        drag.pick_up("T2", Status::InProgress, DragOrigin::Keyboard);
        assert_eq!(
            drag.drop(),
            Some(DropResult::onto("T2", Status::InProgress))
        );
    }

    #[test]
    fn cancel_discards_hover() {
        let mut drag = DragController::new();
        drag.pick_up("T2", Status::InProgress, DragOrigin::Keyboard);
        drag.step(1);
        assert_eq!(drag.cancel(), Some(DropResult::cancelled("T2")));
        assert_eq!(drag.drop(), None);
    }

    #[test]
    fn gesture_remembers_its_origin() {
        let mut drag = DragController::new();
        drag.pick_up("T1", Status::Todo, DragOrigin::Mouse);
        assert!(drag.is_dragging_with(DragOrigin::Mouse));
        assert!(!drag.is_dragging_with(DragOrigin::Keyboard));
        drag.drop();
        assert!(!drag.is_dragging_with(DragOrigin::Mouse));
    }

    #[test]
    fn only_one_gesture_at_a_time() {
        let mut drag = DragController::new();
        assert!(drag.pick_up("T1", Status::Todo, DragOrigin::Keyboard));
        assert!(!drag.pick_up("T2", Status::InProgress, DragOrigin::Keyboard));
        assert_eq!(drag.active().unwrap().draggable_id, "T1");
    }

    #[test]
    fn step_clamps_and_reenters_from_source() {
        let mut drag = DragController::new();
        drag.pick_up("T1", Status::Todo, DragOrigin::Keyboard);
        drag.step(-1);
        assert_eq!(drag.active().unwrap().over, Some(Status::Todo));
        drag.hover(None);
        drag.step(1);
        assert_eq!(drag.active().unwrap().over, Some(Status::InProgress));
    }

    #[test]
    fn idle_controller_ignores_input() {
        let mut drag = DragController::new();
        drag.hover(Some(Status::Done));
        drag.step(1);
        assert_eq!(drag.drop(), None);
        assert_eq!(drag.cancel(), None);
    }
}
