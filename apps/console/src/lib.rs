//! # Warehub Console Library
//!
//! Operator console for the scan-to-inventory workflow.
//!
//! ## Module Organization
//! ```text
//! warehub_console/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── Command line definition
//! ├── config.rs       ◄─── console.toml + WAREHUB_* overrides
//! ├── state/
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── workflow.rs ◄─── Scan workflow state
//! ├── commands/
//! │   ├── inventory.rs◄─── lookup, adjust, create, list
//! │   ├── scan.rs     ◄─── scan
//! │   └── config.rs   ◄─── config
//! ├── wedge.rs        ◄─── Keyboard-wedge scanner on stdin
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (stderr, so JSON on stdout stays clean)
//! 3. Load configuration
//! 4. Connect to the database & run migrations
//! 5. Build state and run the command

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;
pub mod wedge;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::ConsoleConfig;
use error::ApiError;
use state::{DbState, WorkflowState};
use warehub_db::{Database, DbConfig};
use warehub_scan::ScanNotice;

/// Exit code after Ctrl-C outside a scan (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Runs the console with the process arguments.
///
/// Startup failures are `Err`; a failed command is reported and turned into
/// a non-zero exit code.
pub async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ConsoleConfig::load(cli.config.clone()).context("loading configuration")?;
    if let Some(ref path) = cli.db {
        config.database.path = Some(path.clone());
    }

    if let Command::Config = cli.command {
        return Ok(finish(commands::config::show_config(&config), cli.json));
    }

    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path).max_connections(config.database.max_connections))
        .await
        .context("opening inventory database")?;
    let db_state = DbState::new(db);
    let workflow = WorkflowState::with_stdin_scanner(db_state.store());

    let code = dispatch(cli, &config, &db_state, &workflow).await;
    db_state.inner().close().await;
    Ok(code)
}

async fn dispatch(
    cli: Cli,
    config: &ConsoleConfig,
    db: &DbState,
    workflow: &WorkflowState,
) -> ExitCode {
    let json = cli.json;
    match cli.command {
        Command::Scan(args) => {
            let repeat = args.repeat || config.scan.repeat;
            run_scans(workflow, args.delta.get(), repeat, json).await
        }
        Command::Lookup { payload } => {
            finish(commands::inventory::lookup(workflow, &payload).await, json)
        }
        Command::Adjust { payload, delta } => {
            let result = match delta.get() {
                Some((operation, amount)) => {
                    commands::inventory::adjust(workflow, &payload, operation, amount).await
                }
                None => Err(ApiError::validation("--add or --subtract is required")),
            };
            finish(result, json)
        }
        Command::Create {
            name,
            barcode,
            sku,
            quantity,
        } => {
            let input = commands::inventory::CreateItemInput {
                name,
                barcode_text: barcode,
                sku,
                quantity,
            };
            finish(
                commands::inventory::create(db, &config.inventory, input).await,
                json,
            )
        }
        Command::List { query, limit } => {
            let limit = limit.unwrap_or(config.inventory.list_limit);
            finish(
                commands::inventory::list(db, query.as_deref(), limit).await,
                json,
            )
        }
        Command::Config => finish(commands::config::show_config(config), json),
    }
}

/// Scans until one scan is done (or, with `repeat`, until a cancel).
///
/// Ctrl-C cancels the scan in progress through `stop_scan`; outside a scan
/// it exits. Scanner failures are shown as notices, they are not command
/// errors.
async fn run_scans(
    workflow: &WorkflowState,
    delta: Option<(warehub_core::AdjustOperation, u32)>,
    repeat: bool,
    json: bool,
) -> ExitCode {
    let controller = workflow.workflow().controller().clone();

    let mut notices = controller.subscribe();
    let notifier = tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(ScanNotice::Failed { message, .. }) => eprintln!("scanner: {}", message),
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return,
            }
        }
    });

    let interrupt = tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("Ctrl-C handler unavailable");
                return;
            }
            if controller.state().is_active() {
                controller.stop_scan();
            } else {
                // The handler stays installed once registered; without this
                // a Ctrl-C between scans would be swallowed.
                warn!("Interrupted");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    });

    let code = loop {
        eprintln!("Scan a barcode (empty line cancels):");
        let result = commands::scan::scan(workflow, delta).await;
        let cancelled = matches!(result, Ok(ref report) if report.is_cancelled());
        let code = finish(result, json);

        if !repeat || cancelled {
            break code;
        }
    };

    interrupt.abort();
    notifier.abort();
    code
}

/// Prints a command result and maps it to an exit code.
fn finish<T>(result: Result<T, ApiError>, json: bool) -> ExitCode
where
    T: Serialize + std::fmt::Display,
{
    match result {
        Ok(value) => {
            if json {
                match serde_json::to_string_pretty(&value) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("error: cannot encode result: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("{}", value);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if json {
                match serde_json::to_string_pretty(&err) {
                    Ok(text) => eprintln!("{}", text),
                    Err(_) => eprintln!("{}", err),
                }
            } else {
                eprintln!("error: {}", err.message);
            }
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=warehub=trace` - Show trace for warehub crates only
/// - Default: `info,warehub=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,warehub=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
