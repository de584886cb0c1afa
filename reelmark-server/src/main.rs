//! # Reelmark Server
//!
//! Sync service for a streaming front end: remembers where each user stopped
//! watching, keeps a watch history, stores per-user preferences and relays
//! watch-party player status.
//!
//! The server is built on Axum and uses PostgreSQL for persistent storage.
//! A `DEV_MODE` instance without `DATABASE_URL` runs on in-memory storage.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Args as ClapArgs, Parser, Subcommand};
use reelmark_core::domain::ids::UserId;
use reelmark_core::domain::session::{SessionRecord, hash_token};
use reelmark_server::{
    infra::{
        app_state::AppState,
        config::{Config, ConfigLoad, ConfigLoader, ConfigLoaderOptions},
        player_status::spawn_sweeper,
        startup::{build_unit_of_work, connect},
    },
    routes,
};
use reelmark_core::application::unit_of_work::AppUnitOfWork;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "reelmark-server")]
#[command(about = "Playback progress, watch history and settings sync service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(long, env = "REELMARK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
    /// Create a bearer session for a user and print its token
    IssueSession(IssueSessionArgs),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[derive(ClapArgs, Debug)]
struct IssueSessionArgs {
    /// User the session authenticates as
    #[arg(long)]
    user: String,

    /// Session lifetime, e.g. `30d` or `12h`
    #[arg(long, default_value = "30d", value_parser = humantime::parse_duration)]
    ttl: Duration,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&cli.serve).await,
        Some(Command::IssueSession(args)) => {
            run_issue_session(&cli.serve, args).await
        }
        None => run_server(cli.serve).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: args.config.clone(),
        env_file: args.env_file.clone(),
    })
    .load()
    .context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration file loaded");
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let Some(url) = config.database.url.as_deref() else {
        bail!("DATABASE_URL is required to run migrations");
    };

    let db = connect(url, config.database.max_connections).await?;
    db.run_migrations()
        .await
        .context("failed to apply database migrations")?;
    Ok(())
}

async fn run_issue_session(
    args: &ServeArgs,
    session: IssueSessionArgs,
) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let Some(url) = config.database.url.as_deref() else {
        bail!("DATABASE_URL is required to issue sessions");
    };
    if session.user.trim().is_empty() {
        bail!("--user must not be empty");
    }

    let db = connect(url, config.database.max_connections).await?;
    let unit_of_work = AppUnitOfWork::postgres(&db);

    let token = hex::encode(rand::random::<[u8; 32]>());
    let now = Utc::now();
    let ttl = chrono::Duration::from_std(session.ttl)
        .context("session lifetime is out of range")?;
    let record = SessionRecord {
        id: Uuid::new_v4(),
        user_id: UserId::new(session.user),
        token_hash: hash_token(&token),
        created_at: now,
        expires_at: now + ttl,
    };

    unit_of_work
        .sessions
        .insert(record.clone())
        .await
        .context("failed to store session")?;
    info!(
        user_id = %record.user_id,
        session_id = %record.id,
        expires_at = %record.expires_at,
        "Session issued"
    );
    println!("{token}");
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(&args)?;
    let host = config.server.host.clone();
    let port = config.server.port;
    let sweep_interval = config.player_status.sweep_interval;

    let unit_of_work = build_unit_of_work(&config).await?;
    info!(backend = %unit_of_work.backend, "Storage ready");
    let state = AppState::new(unit_of_work, config);

    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(
        state.player_status.clone(),
        sweep_interval,
        shutdown.child_token(),
    );

    let app = routes::create_app(state);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    info!(address = %listener.local_addr()?, "Reelmark server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("server error")?;

    shutdown.cancel();
    if let Err(err) = sweeper.await {
        error!(error = %err, "Player status sweeper panicked");
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = token.cancelled() => {}
    }

    info!("Shutdown signal received");
    token.cancel();
}
