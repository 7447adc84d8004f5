use crate::drag::{DragController, DragOrigin, DropResult};
use crate::kanban_board::{apply_drop, DropOutcome, KanbanBoard};
use crate::project::ProjectMap;
use crate::storage::{KeyValueStore, Storage};
use crate::task::{Status, Task};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::{debug, info, warn};

/// Owner of both collections. Every mutation goes through `set_tasks` or
/// `set_projects`, which persist before returning.
#[derive(Debug)]
pub struct AppState<S> {
    tasks: Vec<Task>,
    projects: ProjectMap,
    storage: Storage<S>,
}

impl<S: KeyValueStore> AppState<S> {
    /// Loads both blobs (or their defaults) without writing anything.
    pub fn load(storage: Storage<S>) -> Self {
        let tasks = storage.load_tasks();
        let projects = storage.load_projects();
        info!(tasks = tasks.len(), projects = projects.len(), "loaded dashboard state");
        Self {
            tasks,
            projects,
            storage,
        }
    }

    /// Loads both blobs and writes them back once, for sessions that may
    /// mutate the board.
    pub fn mount(storage: Storage<S>) -> Self {
        let mut state = Self::load(storage);
        state.persist_tasks();
        state.persist_projects();
        state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn projects(&self) -> &ProjectMap {
        &self.projects
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.persist_tasks();
    }

    pub fn set_projects(&mut self, projects: ProjectMap) {
        self.projects = projects;
        self.persist_projects();
    }

    /// End-of-drag handler for the board.
    pub fn on_drag_end(&mut self, result: &DropResult) -> DropOutcome {
        let (outcome, next) = apply_drop(&self.tasks, result);
        match &outcome {
            DropOutcome::Cancelled => debug!(task = %result.draggable_id, "drag cancelled"),
            DropOutcome::Unchanged { id, status } => {
                debug!(task = %id, %status, "dropped onto its own column")
            }
            DropOutcome::Moved { id, from, to } => info!(task = %id, %from, %to, "task moved"),
            DropOutcome::Unknown { id } => warn!(task = %id, "dropped card matches no task"),
        }
        if let Some(next) = next {
            self.set_tasks(next);
        }
        outcome
    }

    fn persist_tasks(&mut self) {
        if let Err(err) = self.storage.save_tasks(&self.tasks) {
            warn!(error = %err, "failed to save tasks");
        }
    }

    fn persist_projects(&mut self) {
        if let Err(err) = self.storage.save_projects(&self.projects) {
            warn!(error = %err, "failed to save projects");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Projects,
    Board,
}

impl View {
    pub fn toggle(self) -> View {
        match self {
            View::Projects => View::Board,
            View::Board => View::Projects,
        }
    }
}

/// Screen regions from the last draw, used to resolve mouse positions.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    pub sidebar: Vec<(Rect, View)>,
    pub columns: Vec<(Rect, Status)>,
    pub cards: Vec<(Rect, String)>,
}

impl HitMap {
    pub fn view_at(&self, position: Position) -> Option<View> {
        self.sidebar
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, view)| *view)
    }

    pub fn column_at(&self, position: Position) -> Option<Status> {
        self.columns
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, status)| *status)
    }

    pub fn card_at(&self, position: Position) -> Option<&str> {
        self.cards
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, id)| id.as_str())
    }
}

/// The dashboard shell: state, navigation, board cursor and drag provider.
pub struct App<S> {
    pub state: AppState<S>,
    pub view: View,
    pub board: KanbanBoard,
    pub drag: DragController,
    pub hit_map: HitMap,
    pub should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(state: AppState<S>, drag: DragController) -> Self {
        Self {
            state,
            view: View::Projects,
            board: KanbanBoard::new(),
            drag,
            hit_map: HitMap::default(),
            should_quit: false,
        }
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            // A view switch abandons any card in flight.
            if let Some(result) = self.drag.cancel() {
                self.state.on_drag_end(&result);
            }
            debug!(?view, "switched view");
            self.view = view;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.view == View::Board && self.drag.is_dragging() {
            self.handle_drag_key(key.code);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') | KeyCode::Char('p') => self.set_view(View::Projects),
            KeyCode::Char('2') | KeyCode::Char('b') => self.set_view(View::Board),
            KeyCode::Tab => self.set_view(self.view.toggle()),
            code if self.view == View::Board => self.handle_board_key(code),
            _ => {}
        }
    }

    fn handle_board_key(&mut self, code: KeyCode) {
        let tasks = self.state.tasks();
        match code {
            KeyCode::Left => self.board.move_column(-1, tasks),
            KeyCode::Right => self.board.move_column(1, tasks),
            KeyCode::Up => self.board.move_task(-1, tasks),
            KeyCode::Down => self.board.move_task(1, tasks),
            KeyCode::Char(' ') => {
                if let Some(task) = self.board.selected(tasks) {
                    self.drag.pick_up(&task.id, task.status, DragOrigin::Keyboard);
                }
            }
            _ => {}
        }
    }

    fn handle_drag_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.drag.step(-1),
            KeyCode::Right => self.drag.step(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(result) = self.drag.drop() {
                    self.finish_drag(result);
                }
            }
            KeyCode::Esc => {
                if let Some(result) = self.drag.cancel() {
                    self.finish_drag(result);
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(view) = self.hit_map.view_at(position) {
                    self.set_view(view);
                    return;
                }
                if self.view != View::Board {
                    return;
                }
                let Some(id) = self.hit_map.card_at(position).map(str::to_string) else {
                    return;
                };
                let tasks = self.state.tasks();
                if let Some(task) = tasks.iter().find(|t| t.id == id) {
                    if self.drag.pick_up(&task.id, task.status, DragOrigin::Mouse) {
                        self.board.select(&id, tasks);
                    }
                }
            }
            // A keyboard gesture ignores the pointer until it is dropped.
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.drag.is_dragging_with(DragOrigin::Mouse) {
                    self.drag.hover(self.hit_map.column_at(position));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag.is_dragging_with(DragOrigin::Mouse) {
                    self.drag.hover(self.hit_map.column_at(position));
                    if let Some(result) = self.drag.drop() {
                        self.finish_drag(result);
                    }
                }
            }
            _ => {}
        }
    }

    fn finish_drag(&mut self, result: DropResult) {
        let outcome = self.state.on_drag_end(&result);
        let tasks = self.state.tasks();
        match outcome {
            DropOutcome::Moved { id, .. } | DropOutcome::Unchanged { id, .. } => {
                self.board.select(&id, tasks)
            }
            DropOutcome::Cancelled | DropOutcome::Unknown { .. } => self.board.clamp(tasks),
        }
    }
}
