//! CLI entrypoint for plenum
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then hands control to the operator console.

mod console;

use anyhow::Result;
use clap::Parser;
use console::Console;
use plenum_application::ports::{EventSink, NullEventSink};
use plenum_application::{
    AgendaCommands, SessionCommands, SessionLocks, SessionQueries, VotingCommands,
};
use plenum_domain::{SessionId, SessionKind, TemplateId, TemplateMode};
use plenum_infrastructure::{
    ConfigLoader, InMemoryMemberRoster, InMemoryPropositionStore, InMemorySessionRepository,
    JsonlEventLog, SystemClock, TomlTemplateStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "plenum", about = "Legislative session control console", version)]
struct Cli {
    /// Path to a config file (overrides discovered configs)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip all config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Session number within the legislative period
    #[arg(short = 'n', long, default_value_t = 1)]
    number: u32,

    /// Session kind: ordinary, special or solemn (default from config)
    #[arg(short, long)]
    kind: Option<String>,

    /// Session identifier (defaults to sess-<number>)
    #[arg(long)]
    session_id: Option<String>,

    /// Agenda template to apply before the console starts
    #[arg(short, long)]
    template: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };
    config.validate()?;

    let kind: SessionKind = cli
        .kind
        .as_deref()
        .unwrap_or(&config.chamber.default_session_kind)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // === Dependency Injection ===
    let repo = Arc::new(InMemorySessionRepository::new());
    let clock = Arc::new(SystemClock);
    let locks = Arc::new(SessionLocks::new());
    let templates = Arc::new(TomlTemplateStore::new(&config.templates.dir));
    let propositions = Arc::new(InMemoryPropositionStore::default());
    let roster = Arc::new(InMemoryMemberRoster::default());
    let events: Arc<dyn EventSink> = match &config.logging.events_file {
        Some(path) => match JsonlEventLog::new(path) {
            Some(log) => {
                info!("Recording session events to {}", log.path().display());
                Arc::new(log)
            }
            None => Arc::new(NullEventSink),
        },
        None => Arc::new(NullEventSink),
    };

    let sessions = SessionCommands::new(
        repo.clone(),
        clock.clone(),
        events.clone(),
        locks.clone(),
    );
    let agenda = AgendaCommands::new(
        repo.clone(),
        clock.clone(),
        events.clone(),
        locks.clone(),
        templates.clone(),
        propositions.clone(),
    );
    let voting = VotingCommands::new(repo.clone(), clock.clone(), events.clone(), locks.clone());
    let queries = SessionQueries::new(repo.clone(), clock.clone());

    let session_id = SessionId::new(
        cli.session_id
            .unwrap_or_else(|| format!("sess-{}", cli.number)),
    );
    sessions
        .create(session_id.clone(), cli.number, kind, chrono::Utc::now())
        .await?;
    info!(session = %session_id, "session registered");

    if let Some(template) = &cli.template {
        agenda
            .apply_template(
                &session_id,
                &TemplateId::new(template.clone()),
                TemplateMode::Replace,
            )
            .await?;
        info!(template, "agenda template applied");
    }

    let console = Console::new(
        config.chamber.name.clone(),
        session_id,
        sessions,
        agenda,
        voting,
        queries,
        roster,
    );
    console.run().await
}
