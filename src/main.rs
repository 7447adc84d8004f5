use anyhow::Context;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use ministry_board::{
    app::{App, AppState},
    config,
    drag::DropResult,
    kanban_board::{tasks_by_status, DropOutcome},
    project::active_projects,
    storage::{FileStore, Storage},
    task::Status,
    ui::{self, TerminalSession},
    BoardError,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ministry-board",
    about = "Kanban dashboard for ministry projects and tasks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding the saved board (default: platform data dir)
    #[arg(long, global = true, env = config::DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, short = 'j', global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Tui,

    /// List projects that are not archived
    Projects,

    /// Print the board column by column
    Board,

    /// Move a task to another column, as if dropped there
    Move {
        /// Task id, e.g. T3
        task_id: String,
        /// Target column: TODO, IN_PROGRESS, BLOCKED or DONE
        status: Status,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref());

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            init_file_logging(&data_dir)?;
            run_tui(&data_dir)
        }
        Commands::Projects => {
            init_stderr_logging();
            print_projects(&open_state(&data_dir)?, cli.json)
        }
        Commands::Board => {
            init_stderr_logging();
            print_board(&open_state(&data_dir)?, cli.json)
        }
        Commands::Move { task_id, status } => {
            init_stderr_logging();
            move_task(&mut mount_state(&data_dir)?, &task_id, status)
        }
    }
}

fn open_store(data_dir: &Path) -> anyhow::Result<Storage<FileStore>> {
    let store = FileStore::open(data_dir)
        .with_context(|| format!("cannot open data dir {}", data_dir.display()))?;
    Ok(Storage::new(store))
}

/// Read-only commands never write, so a corrupt blob survives being printed.
fn open_state(data_dir: &Path) -> anyhow::Result<AppState<FileStore>> {
    Ok(AppState::load(open_store(data_dir)?))
}

fn mount_state(data_dir: &Path) -> anyhow::Result<AppState<FileStore>> {
    Ok(AppState::mount(open_store(data_dir)?))
}

/// `RUST_LOG` when set, else `default` for everything.
fn env_filter(default: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(Level::WARN))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// The dashboard owns the terminal, so its logs go to a file.
fn init_file_logging(data_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("cannot create data dir {}", data_dir.display()))?;
    let path = config::log_path(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(Level::INFO))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(data_dir: &Path) -> anyhow::Result<()> {
    // Fails before anything is drawn when there is no terminal to drag on.
    let mut session = TerminalSession::enter().context("cannot start the dashboard")?;
    let state = mount_state(data_dir)?;
    let mut app = App::new(state, session.drag_controller());

    let result = ui::run_app(session.terminal(), &mut app);
    // Restore the terminal before any error reaches the screen.
    drop(session);
    result.context("dashboard event loop failed")
}

fn print_projects(state: &AppState<FileStore>, json: bool) -> anyhow::Result<()> {
    let projects: Vec<_> = active_projects(state.projects()).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }
    for project in projects {
        println!("{:<14} {:<22} {}", project.id, project.label, project.desc);
    }
    Ok(())
}

fn print_board(state: &AppState<FileStore>, json: bool) -> anyhow::Result<()> {
    let tasks = state.tasks();
    if json {
        let columns: IndexMap<&str, Vec<_>> = Status::ALL
            .into_iter()
            .map(|status| (status.as_str(), tasks_by_status(tasks, status)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&columns)?);
        return Ok(());
    }
    for status in Status::ALL {
        let column = tasks_by_status(tasks, status);
        println!("{} ({}):", status.label(), column.len());
        for task in column {
            println!("  [{}] {} ({})", task.id, task.title, task.project);
        }
    }
    Ok(())
}

fn move_task(state: &mut AppState<FileStore>, task_id: &str, status: Status) -> anyhow::Result<()> {
    match state.on_drag_end(&DropResult::onto(task_id, status)) {
        DropOutcome::Moved { id, from, to } => println!("{id}: {from} -> {to}"),
        DropOutcome::Unchanged { id, status } => println!("{id}: already {status}"),
        DropOutcome::Unknown { id } => return Err(BoardError::TaskNotFound(id).into()),
        DropOutcome::Cancelled => {}
    }
    Ok(())
}
