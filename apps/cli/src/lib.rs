//! # Fiado Terminal Library
//!
//! Core library for the fiado terminal application. `run` parses the
//! command line, opens the shop, and either runs one command or the shell.
//!
//! ## Module Organization
//! ```text
//! fiado_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap definitions (one-shot and shell lines)
//! ├── router.rs       ◄─── Command -> command function -> view / JSON
//! ├── shell.rs        ◄─── Interactive loop behind the PIN
//! ├── prompt.rs       ◄─── inquire prompts (line, masked PIN, s/n)
//! ├── view.rs         ◄─── Text rendering of responses
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState bundle
//! │   ├── config.rs   ◄─── Configuration state
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── shop.rs     ◄─── Products + customers behind one mutex
//! │   ├── session.rs  ◄─── PIN gate flag
//! │   └── insights.rs ◄─── Insight service + latest list
//! ├── commands/
//! │   ├── auth.rs     ◄─── login / logout
//! │   ├── product.rs  ◄─── catalog, sale, inventory
//! │   ├── customer.rs ◄─── fiado ledger and messages
//! │   └── ...
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Load .env, initialize logging ────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: warn,fiado=info,sqlx=warn (override with RUST_LOG)       │
//! │                                                                         │
//! │  2. Parse the command line, read configuration ───────────────────────► │
//! │                                                                         │
//! │  3. Determine Database Path ──────────────────────────────────────────► │
//! │     • --db, else FIADO_DB_PATH, else the platform data directory        │
//! │                                                                         │
//! │  4. Connect, migrate, load both collections (seed when absent) ───────► │
//! │                                                                         │
//! │  5. No subcommand: shell (asks for the PIN)                             │
//! │     Subcommand: check the PIN once, run it, exit                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod prompt;
pub mod router;
pub mod shell;
pub mod state;
pub mod view;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::auth;
use error::ApiError;
use router::Flags;
use state::{AppState, ConfigState};

/// Runs the application and returns the process exit code.
pub async fn run() -> ExitCode {
    // A missing .env is normal
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            router::report_error(&e, json);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<(), ApiError> {
    let config = ConfigState::from_env()?;

    let db_path = match cli.db.clone().or_else(|| config.db_path.clone()) {
        Some(path) => path,
        None => database_path()?,
    };
    info!(?db_path, "Database path determined");

    let app = AppState::open(config, db_path).await?;
    info!("Shop loaded");

    let flags = Flags {
        yes: cli.yes,
        json: cli.json,
    };

    match cli.command {
        None | Some(Command::Shell) => shell::run(&app, flags).await,
        Some(command) => {
            let entered = match cli.pin {
                Some(pin) => pin,
                None => prompt::read_pin("PIN:")?
                    .ok_or_else(|| ApiError::unauthorized("PIN não informado"))?,
            };
            auth::login(&app.config, &app.session, entered.trim())?;
            router::execute(&app, command, flags).await
        }
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fiado=trace` - Show trace for fiado crates only
/// - Default: warnings, plus INFO for fiado crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,fiado=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Platform data directory path for the database file.
///
/// - **macOS**: `~/Library/Application Support/com.fiado.pos/fiado.db`
/// - **Windows**: `%APPDATA%\fiado\pos\data\fiado.db`
/// - **Linux**: `~/.local/share/pos/fiado.db`
fn database_path() -> Result<PathBuf, ApiError> {
    let dirs = ProjectDirs::from("com", "fiado", "pos")
        .ok_or_else(|| ApiError::internal("Não foi possível determinar a pasta de dados"))?;

    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("fiado.db"))
}
