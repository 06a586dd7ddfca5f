use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use hangar::app::App;
use hangar::config::{Config, Overrides};
use hangar::controller::Controller;
use hangar::event::{Event, EventHandler};
use hangar::models::Project;
use hangar::project;
use hangar::system::git::GitInspector;
use hangar::todos::TaskStore;
use hangar::{logging, ui};

const EVENT_TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "hangar", version, about = "Terminal dashboard for local projects")]
struct Cli {
    /// Config file (default: ~/.config/hangar/config.toml)
    #[arg(long, global = true, env = "HANGAR_CONFIG")]
    config: Option<PathBuf>,
    /// Active projects directory
    #[arg(long, global = true, env = "HANGAR_DIR")]
    hangar_dir: Option<PathBuf>,
    /// Archived projects directory
    #[arg(long, global = true, env = "HANGAR_STASH_DIR")]
    stash_dir: Option<PathBuf>,
    /// Directory holding per-project todo files
    #[arg(long, global = true, env = "HANGAR_TODOS_DIR")]
    todos_dir: Option<PathBuf>,
    /// Shared instructions document
    #[arg(long, global = true, env = "HANGAR_GUIDE")]
    guide: Option<PathBuf>,
    #[arg(long, global = true, env = "HANGAR_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the project table
    Ls {
        /// List archived projects instead of active ones
        #[arg(long)]
        stash: bool,
    },
    /// Print a project's todos
    Todos {
        /// Project directory name
        project: String,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            hangar_dir: self.hangar_dir.clone(),
            stash_dir: self.stash_dir.clone(),
            todos_dir: self.todos_dir.clone(),
            guide: self.guide.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), cli.overrides())?;

    // Logging is best effort.
    let _ = logging::init_logging(&config.log_dir);

    match cli.command {
        Some(Commands::Ls { stash }) => cmd_ls(&config, stash).await,
        Some(Commands::Todos { project }) => cmd_todos(&config, &project),
        None => run_tui(&config).await,
    }
}

fn format_ls_row(project: &Project) -> String {
    format!(
        "{} {:<24} {:<16} {:<10} todos:{} prs:{}",
        project.git_status.icon(),
        project.name,
        project.branch.as_deref().unwrap_or("-"),
        project.last_commit_label(),
        project.todo_count,
        project.pr_count,
    )
}

async fn cmd_ls(config: &Config, stash: bool) -> Result<()> {
    let base = if stash {
        &config.stash_dir
    } else {
        &config.hangar_dir
    };
    let inspector = GitInspector::new(config.git_timeout, config.gh_timeout);
    let tasks = TaskStore::new(&config.todos_dir);
    let projects = project::scan(base, &inspector, &tasks).await?;
    if projects.is_empty() {
        println!("No projects in {}", base.display());
    } else {
        for p in &projects {
            println!("{}", format_ls_row(p));
        }
    }
    Ok(())
}

fn cmd_todos(config: &Config, project: &str) -> Result<()> {
    if project.is_empty() || project.contains(['/', '\\']) {
        bail!("invalid project name: {project:?}");
    }
    let tasks = TaskStore::new(&config.todos_dir).load(project);
    if tasks.is_empty() {
        println!("No todos for {project}");
    } else {
        for task in &tasks {
            println!("{} {}", task.status.icon(), task.content);
        }
    }
    Ok(())
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

async fn run_tui(config: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, config).await;

    // Restore the terminal even when the loop failed.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(terminal: &mut Tui, config: &Config) -> Result<()> {
    let controller = Controller::from_config(config);
    let mut app = App::new();
    controller.refresh(&mut app).await;

    let mut events = EventHandler::new(EVENT_TICK_RATE);
    terminal.draw(|frame| ui::draw(frame, &app))?;

    while !app.should_quit {
        match events.next().await {
            Some(Event::Key(key)) => {
                if let Some(action) = app.handle_key(key) {
                    controller.perform(&mut app, action).await;
                }
            }
            Some(Event::Paste(text)) => app.handle_paste(&text),
            Some(Event::Tick) => continue,
            Some(Event::Resize) => {}
            None => break,
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;
    }
    Ok(())
}
