use std::sync::Arc;

use clap::{Parser, Subcommand};
use roomplan::camera::Point;
use roomplan::config::{ConfigError, StoreConfig, autosave_delay_from_env};
use roomplan::doc::FurnitureKind;
use roomplan::input::{Key, Tool};
use roomplan::project::{NewProject, Project, ProjectData, ProjectPatch};
use roomplan::services::session::EditorSession;
use roomplan::store::{MemoryProjectStore, ProjectStore, RestProjectStore, StoreError};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("store not configured: {0}")]
    Config(#[from] ConfigError),
    #[error("store request failed: {0}")]
    Store(#[from] StoreError),
    #[error("project not found: {0}")]
    NotFound(String),
    #[error("save failed; see log for details")]
    SaveFailed,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "roomplan", about = "Room layout projects CLI")]
struct Cli {
    /// Use an in-process store instead of the hosted backend.
    #[arg(long, env = "ROOMPLAN_OFFLINE")]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List projects, most recently updated first.
    List,
    /// Print one project as JSON.
    Show { id: String },
    /// Create an empty project.
    Create {
        #[arg(long, default_value = roomplan::consts::UNTITLED_PROJECT)]
        name: String,
    },
    Rename {
        id: String,
        #[arg(long)]
        name: String,
    },
    Delete { id: String },
    /// Draw a sample room through the editor and save it.
    Demo {
        #[arg(long, default_value = "Demo Room")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "failed to read .env");
        }
    }

    let cli = Cli::parse();
    let store = open_store(cli.offline)?;

    match cli.command {
        Command::List => run_list(store.as_ref()).await,
        Command::Show { id } => run_show(store.as_ref(), &id).await,
        Command::Create { name } => run_create(store.as_ref(), name).await,
        Command::Rename { id, name } => run_rename(store.as_ref(), &id, name).await,
        Command::Delete { id } => run_delete(store.as_ref(), &id).await,
        Command::Demo { name } => run_demo(store, name).await,
    }
}

fn open_store(offline: bool) -> Result<Arc<dyn ProjectStore>, CliError> {
    if offline {
        info!("offline mode; projects are not persisted");
        return Ok(Arc::new(MemoryProjectStore::new()));
    }
    let config = StoreConfig::from_env()?;
    info!(url = %config.url, table = %config.table, "using hosted store");
    Ok(Arc::new(RestProjectStore::new(&config)?))
}

async fn run_list(store: &dyn ProjectStore) -> Result<(), CliError> {
    let projects = store.list().await?;
    if projects.is_empty() {
        eprintln!("no projects");
    }
    for project in &projects {
        println!("{}\t{}\t{}", project.id, project.name, project.summary());
    }
    Ok(())
}

async fn run_show(store: &dyn ProjectStore, id: &str) -> Result<(), CliError> {
    let project = store.get(id).await?.ok_or_else(|| CliError::NotFound(id.to_owned()))?;
    print_project(&project)
}

async fn run_create(store: &dyn ProjectStore, name: String) -> Result<(), CliError> {
    let project = store.insert(&NewProject { name, data: ProjectData::default() }).await?;
    eprintln!("created project: {}", project.id);
    print_project(&project)
}

async fn run_rename(store: &dyn ProjectStore, id: &str, name: String) -> Result<(), CliError> {
    let patch = ProjectPatch { name: Some(name), data: None };
    let project = store
        .update(id, &patch)
        .await?
        .ok_or_else(|| CliError::NotFound(id.to_owned()))?;
    print_project(&project)
}

async fn run_delete(store: &dyn ProjectStore, id: &str) -> Result<(), CliError> {
    store.delete(id).await?;
    eprintln!("deleted project: {id}");
    Ok(())
}

async fn run_demo(store: Arc<dyn ProjectStore>, name: String) -> Result<(), CliError> {
    let mut session = EditorSession::with_autosave(store, autosave_delay_from_env());
    session.rename(name);

    session.edit(|core| core.set_tool(Tool::Wall));
    for (x, y) in [(100.0, 100.0), (500.0, 100.0), (500.0, 400.0), (100.0, 400.0)] {
        session.edit(|core| core.on_click(Point::new(x, y), true));
    }
    session.edit(|core| core.on_key(&Key::Enter));

    session.edit(|core| core.set_tool(Tool::Door));
    session.edit(|core| core.on_click(Point::new(300.0, 110.0), false));
    session.edit(|core| core.set_tool(Tool::Window));
    session.edit(|core| core.on_click(Point::new(490.0, 250.0), false));
    session.edit(|core| core.on_key(&Key::Escape));

    session.edit(|core| core.add_furniture(FurnitureKind::Bed));
    session.edit(|core| core.add_furniture(FurnitureKind::Table));
    if let Some(id) = session.engine().selection().map(str::to_owned) {
        session.edit(|core| core.drag_end(&id, Point::new(250.0, 250.0)));
    }

    let saved = session.save().await;
    session.shutdown().await;
    let project = saved.ok_or(CliError::SaveFailed)?;
    eprintln!("created project: {}", project.id);
    print_project(&project)
}

fn print_project(project: &Project) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(project)?;
    println!("{rendered}");
    Ok(())
}
