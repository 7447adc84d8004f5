use crate::app::{App, HitMap, View};
use crate::drag::DragController;
use crate::error::{BoardError, Result};
use crate::kanban_board::tasks_by_status;
use crate::project::{active_projects, Project, ProjectMap};
use crate::storage::KeyValueStore;
use crate::task::{Status, Task};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use tracing::info;

const ACCENT: Color = Color::Cyan;
const DIM: Color = Color::DarkGray;
const SIDEBAR_WIDTH: u16 = 14;
const CARD_HEIGHT: u16 = 3;
const PROJECT_CARD_HEIGHT: u16 = 6;
const GRID_COLUMNS: usize = 3;

/// Raw-mode alternate screen with mouse capture. Mouse capture is the drag
/// provider: without it the board cannot be used, so entering fails before
/// anything is drawn. Dropping the session restores the terminal.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        let mut stdout = io::stdout();
        if !stdout.is_tty() {
            return Err(BoardError::NotATerminal);
        }
        let mut session = Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
        };
        // From here on `Drop` undoes whatever was set up.
        execute!(session.terminal.backend_mut(), EnableMouseCapture)
            .map_err(BoardError::DragDropUnavailable)?;
        enable_raw_mode()?;
        execute!(session.terminal.backend_mut(), EnterAlternateScreen)?;
        session.terminal.clear()?;
        Ok(session)
    }

    /// Hands out the drag controller backed by this session's mouse capture.
    /// Outside the crate this is the only way to get one.
    pub fn drag_controller(&self) -> DragController {
        DragController::new()
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Draw, wait for one event, handle it, repeat until quit.
pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    info!("dashboard started");
    while !app.should_quit {
        let mut hit_map = HitMap::default();
        terminal.draw(|f| hit_map = draw(f, app))?;
        app.hit_map = hit_map;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
    info!("dashboard closed");
    Ok(())
}

/// Renders the whole screen and returns where things landed.
pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) -> HitMap {
    let mut hit_map = HitMap::default();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.area());

    draw_sidebar(f, chunks[0], app.view, &mut hit_map);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(chunks[1].inner(Margin::new(1, 0)));

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Active Operations",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))),
        main[0],
    );

    match app.view {
        View::Projects => draw_projects(f, main[1], app.state.projects()),
        View::Board => draw_board(f, main[1], app, &mut hit_map),
    }

    f.render_widget(
        Paragraph::new(help_line(app)).style(Style::default().fg(DIM)),
        main[2],
    );
    hit_map
}

fn draw_sidebar(f: &mut Frame, area: Rect, view: View, hit_map: &mut HitMap) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            " M ",
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
        .centered(),
        rows[0],
    );

    for (row, (entry, label)) in rows[1..3]
        .iter()
        .zip([(View::Projects, "Projects"), (View::Board, "Board")])
    {
        let style = if entry == view {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DIM)
        };
        f.render_widget(Paragraph::new(Span::styled(label, style)).centered(), *row);
        hit_map.sidebar.push((*row, entry));
    }
}

/// Card color from a project's token; unknown tokens fall back to gray.
pub fn project_color(token: &str) -> Color {
    token.parse().unwrap_or(Color::Gray)
}

fn draw_projects(f: &mut Frame, area: Rect, projects: &ProjectMap) {
    let visible: Vec<&Project> = active_projects(projects).collect();
    let row_count = visible.len().div_ceil(GRID_COLUMNS);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(PROJECT_CARD_HEIGHT); row_count])
        .split(area);

    for (row, chunk) in rows.iter().zip(visible.chunks(GRID_COLUMNS)) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row);
        for (cell, project) in cells.iter().zip(chunk) {
            draw_project_card(f, *cell, project);
        }
    }
}

fn draw_project_card(f: &mut Frame, area: Rect, project: &Project) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DIM))
        .title(Line::from(vec![
            Span::styled("● ", Style::default().fg(project_color(&project.color))),
            Span::styled(
                project.label.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]));
    f.render_widget(
        Paragraph::new(project.desc.as_str())
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_board<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>, hit_map: &mut HitMap) {
    let tasks = app.state.tasks();
    let projects = app.state.projects();
    let gesture = app.drag.active();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, Status::ALL.len() as u32); Status::ALL.len()])
        .split(area);

    for (status, column) in Status::ALL.into_iter().zip(columns.iter()) {
        let in_column = tasks_by_status(tasks, status);
        let is_target = gesture.is_some_and(|g| g.over == Some(status));
        let border = if is_target {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if gesture.is_none() && app.board.selected_status == status {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(DIM)
        };
        let block = Block::default()
            .title(format!(" {} ({}) ", status.label(), in_column.len()))
            .borders(Borders::ALL)
            .border_style(border);
        let inner = block.inner(*column);
        f.render_widget(block, *column);
        hit_map.columns.push((*column, status));

        for (row, task) in in_column.iter().enumerate() {
            let y = inner.y + row as u16 * CARD_HEIGHT;
            if y + CARD_HEIGHT > inner.bottom() {
                break;
            }
            let card = Rect::new(inner.x, y, inner.width, CARD_HEIGHT);
            let dragged = gesture.is_some_and(|g| g.draggable_id == task.id);
            let selected = gesture.is_none()
                && app.board.selected_status == status
                && app.board.selected_task == row;
            draw_task_card(f, card, task, projects, dragged, selected);
            hit_map.cards.push((card, task.id.clone()));
        }
    }
}

fn draw_task_card(
    f: &mut Frame,
    area: Rect,
    task: &Task,
    projects: &ProjectMap,
    dragged: bool,
    selected: bool,
) {
    let tint = projects
        .get(&task.project)
        .map(|p| project_color(&p.color))
        .unwrap_or(DIM);
    let mut border = Style::default().fg(tint);
    let mut text = Style::default().fg(Color::White);
    if selected {
        border = border.add_modifier(Modifier::BOLD);
        text = text.add_modifier(Modifier::BOLD);
    }
    if dragged {
        border = border.add_modifier(Modifier::DIM);
        text = text.fg(DIM).add_modifier(Modifier::DIM);
    }
    f.render_widget(
        Paragraph::new(Span::styled(task.title.as_str(), text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border),
        ),
        area,
    );
}

fn help_line<S: KeyValueStore>(app: &App<S>) -> &'static str {
    match app.view {
        View::Projects => "1/p projects · 2/b board · tab switch · q quit",
        View::Board if app.drag.is_dragging() => {
            "←/→ choose column · enter/space drop · esc cancel"
        }
        View::Board => "←/→/↑/↓ select · space pick up · drag with mouse · tab switch · q quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::project::seed_projects;
    use crate::storage::{MemoryStore, Storage};
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::backend::TestBackend;
    use ratatui::layout::Position;

    fn app() -> App<MemoryStore> {
        App::new(
            AppState::load(Storage::new(MemoryStore::new())),
            DragController::new(),
        )
    }

    fn render(app: &mut App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        let mut hit_map = HitMap::default();
        terminal.draw(|f| hit_map = draw(f, app)).unwrap();
        app.hit_map = hit_map;
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn click(app: &mut App<MemoryStore>, kind: MouseEventKind, at: Position) {
        app.handle_mouse(MouseEvent {
            kind,
            column: at.x,
            row: at.y,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn center(rect: Rect) -> Position {
        Position::new(rect.x + rect.width / 2, rect.y + rect.height / 2)
    }

    #[test]
    fn catalog_shows_active_projects() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(screen.contains("Active Operations"));
        for label in ["Youth Councils 2026", "Rendezvous", "Leadership", "Administration"] {
            assert!(screen.contains(label), "missing {label}");
        }
        assert!(app.hit_map.columns.is_empty());
    }

    #[test]
    fn catalog_never_shows_archived_projects() {
        let mut app = app();
        let mut projects = seed_projects();
        projects["RENDEZVOUS"].archived = true;
        app.state.set_projects(projects);
        let screen = render(&mut app);
        assert!(!screen.contains("Rendezvous"));
        assert!(screen.contains("Youth Councils 2026"));
    }

    #[test]
    fn board_renders_columns_in_order() {
        let mut app = app();
        app.set_view(View::Board);
        let screen = render(&mut app);
        let heading = screen.lines().find(|l| l.contains("TODO (1)")).unwrap();
        let positions: Vec<_> = ["TODO (1)", "IN PROGRESS (1)", "BLOCKED (1)", "DONE (0)"]
            .iter()
            .map(|h| heading.find(h).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(screen.contains("2026 Locations"));
        let statuses: Vec<_> = app.hit_map.columns.iter().map(|(_, s)| *s).collect();
        assert_eq!(statuses, Status::ALL);
        assert_eq!(app.hit_map.cards.len(), 3);
    }

    #[test]
    fn mouse_drag_across_rendered_board() {
        let mut app = app();
        app.set_view(View::Board);
        render(&mut app);

        let card = app
            .hit_map
            .cards
            .iter()
            .find(|(_, id)| id == "T3")
            .map(|(rect, _)| *rect)
            .unwrap();
        let done = app.hit_map.columns[3].0;

        click(&mut app, MouseEventKind::Down(MouseButton::Left), center(card));
        click(&mut app, MouseEventKind::Drag(MouseButton::Left), center(done));
        let screen = render(&mut app);
        assert!(screen.contains("←/→ choose column"));
        click(&mut app, MouseEventKind::Up(MouseButton::Left), center(done));

        assert_eq!(app.state.tasks()[2].status, Status::Done);
        let screen = render(&mut app);
        assert!(screen.contains("DONE (1)"));
        assert!(screen.contains("BLOCKED (0)"));
    }

    #[test]
    fn sidebar_entries_are_clickable() {
        let mut app = app();
        render(&mut app);
        let board = app
            .hit_map
            .sidebar
            .iter()
            .find(|(_, v)| *v == View::Board)
            .map(|(rect, _)| *rect)
            .unwrap();
        click(&mut app, MouseEventKind::Down(MouseButton::Left), center(board));
        assert_eq!(app.view, View::Board);
    }

    #[test]
    fn project_color_parses_hex_tokens() {
        assert_eq!(project_color("#3B82F6"), Color::Rgb(0x3B, 0x82, 0xF6));
        assert_eq!(project_color("not-a-color"), Color::Gray);
    }
}
